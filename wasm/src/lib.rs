//! WebAssembly module for the agronomic estimate engine
//!
//! Dashboard widgets call these instead of carrying their own copies of the
//! crop constants. Records travel as JSON strings; `now_iso` is an RFC 3339
//! timestamp, and an empty string means the browser clock.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::agronomy::*;
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("agronomy engine loaded"));
}

fn to_js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to encode result: {}", e))
}

fn parse_now(now_iso: &str) -> Result<DateTime<Utc>, String> {
    if now_iso.trim().is_empty() {
        return Ok(browser_now());
    }
    DateTime::parse_from_rfc3339(now_iso.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("Invalid timestamp '{}': {}", now_iso, e))
}

#[cfg(target_arch = "wasm32")]
fn browser_now() -> DateTime<Utc> {
    let millis = js_sys::Date::now() as i64;
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn browser_now() -> DateTime<Utc> {
    Utc::now()
}

fn parse_records<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn estimate_json(crop_json: &str, farm_json: &str, now_iso: &str) -> Result<String, String> {
    let crop: Crop = parse_records(crop_json, "crop")?;
    let farm: Farm = parse_records(farm_json, "farm")?;
    to_json(&estimate(&crop, &farm, parse_now(now_iso)?))
}

fn portfolio_json(crops_json: &str, farms_json: &str, now_iso: &str) -> Result<String, String> {
    let crops: Vec<Crop> = parse_records(crops_json, "crops")?;
    let farms: Vec<Farm> = parse_records(farms_json, "farms")?;
    let estimates = estimate_all(&crops, &farms, parse_now(now_iso)?);
    to_json(&aggregate(&estimates, &farms))
}

fn alerts_json(crops_json: &str, farms_json: &str, now_iso: &str) -> Result<String, String> {
    let crops: Vec<Crop> = parse_records(crops_json, "crops")?;
    let farms: Vec<Farm> = parse_records(farms_json, "farms")?;
    let now = parse_now(now_iso)?;
    let estimates = estimate_all(&crops, &farms, now);
    to_json(&rank_estimates(&estimates, &AlertThresholds::default(), now))
}

fn stage_json(planting_date: &str, now_iso: &str, cycle_days: i32) -> Result<String, String> {
    let planted = parse_planting_date(planting_date)
        .ok_or_else(|| format!("Invalid planting date '{}'", planting_date))?;
    to_json(&classify_stage(planted, parse_now(now_iso)?, i64::from(cycle_days)))
}

/// Trait-table row matched for a crop name, as JSON
#[wasm_bindgen]
pub fn lookup_crop_traits(crop_name: &str) -> Result<String, JsValue> {
    to_json(&lookup_traits(crop_name)).map_err(to_js_error)
}

/// Water need (mm/ha) after the soil multiplier. Inputs that are not finite
/// or exceed the decimal range read as zero.
#[wasm_bindgen]
pub fn adjust_water_need(base_water_mm: f64, soil_type: &str) -> f64 {
    let base = Decimal::try_from(base_water_mm).unwrap_or(Decimal::ZERO);
    adjust_water(base, soil_type).to_f64().unwrap_or(0.0)
}

/// Growth stage and harvest countdown for a planting date, as JSON
#[wasm_bindgen]
pub fn classify_growth_stage(
    planting_date: &str,
    now_iso: &str,
    cycle_days: i32,
) -> Result<String, JsValue> {
    stage_json(planting_date, now_iso, cycle_days).map_err(to_js_error)
}

/// Estimate one crop on its farm, as JSON
#[wasm_bindgen]
pub fn estimate_crop(crop_json: &str, farm_json: &str, now_iso: &str) -> Result<String, JsValue> {
    estimate_json(crop_json, farm_json, now_iso).map_err(to_js_error)
}

/// Portfolio summary for arrays of crops and farms, as JSON
#[wasm_bindgen]
pub fn summarize_portfolio(
    crops_json: &str,
    farms_json: &str,
    now_iso: &str,
) -> Result<String, JsValue> {
    portfolio_json(crops_json, farms_json, now_iso).map_err(to_js_error)
}

/// Generated and ranked alerts for arrays of crops and farms, as JSON
#[wasm_bindgen]
pub fn rank_alerts_json(
    crops_json: &str,
    farms_json: &str,
    now_iso: &str,
) -> Result<String, JsValue> {
    alerts_json(crops_json, farms_json, now_iso).map_err(to_js_error)
}
