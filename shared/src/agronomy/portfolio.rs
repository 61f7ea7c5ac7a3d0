//! Farm and portfolio aggregation
//!
//! Reduces per-crop estimates into farm-level and farmer-level summaries.
//! Only valid estimates of active crops are counted; everything else is
//! reported in `excluded_count` and left out of every sum and ratio.

use std::collections::HashSet;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::estimator::{CropEstimate, Estimate};
use super::quantity::{saturating_mul, saturating_sum};
use super::soil::is_efficient_irrigation;
use crate::models::Farm;
use crate::types::{HealthStatus, RecordStatus};

/// Tonnes of CO2 sequestered per planted hectare
pub const CARBON_TONS_PER_HECTARE: Decimal = Decimal::from_parts(25, 0, 0, false, 1);

/// Distinct crops at which the diversity ratio saturates
const DIVERSITY_SATURATION: i64 = 3;

/// Score before health, diversity and irrigation contributions
const BASE_SUSTAINABILITY_SCORE: i64 = 40;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SoilHealthLabel {
    Excellent,
    Good,
    Fair,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BiodiversityLabel {
    High,
    Medium,
    Low,
}

impl BiodiversityLabel {
    pub fn from_distinct_crops(distinct: usize) -> Self {
        match distinct {
            n if n >= 4 => BiodiversityLabel::High,
            n if n >= 2 => BiodiversityLabel::Medium,
            _ => BiodiversityLabel::Low,
        }
    }
}

/// Summary of one farm's counted crops
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmSummary {
    pub farm_id: Uuid,
    pub farm_name: String,
    pub status: RecordStatus,
    pub crop_count: usize,
    pub planted_area_hectares: Decimal,
    pub total_area_hectares: Option<Decimal>,
    pub total_yield: Decimal,
    pub total_water: Decimal,
    pub avg_yield_per_hectare: Decimal,
    pub efficient_irrigation: bool,
    /// Planted area exceeds the farm's recorded total area
    pub over_committed: bool,
}

/// Farmer-level sustainability and production summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSummary {
    pub crop_count: usize,
    pub excluded_count: usize,
    pub farm_count: usize,
    pub distinct_crop_count: usize,
    pub avg_yield_per_hectare: Decimal,
    pub total_yield: Decimal,
    pub total_water: Decimal,
    pub total_planted_area_hectares: Decimal,
    pub carbon_offset_tons: Decimal,
    pub water_saved_percent: u32,
    pub health_ratio: Decimal,
    pub diversity_ratio: Decimal,
    pub irrigation_efficiency_ratio: Decimal,
    pub soil_health_label: SoilHealthLabel,
    pub biodiversity_label: BiodiversityLabel,
    pub overall_sustainability_score: u32,
    pub farms: Vec<FarmSummary>,
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn neutral_ratio() -> Decimal {
    Decimal::new(5, 1)
}

/// `part / whole`, or the neutral midpoint when `whole` is zero
fn ratio(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        neutral_ratio()
    } else {
        Decimal::from(part as u64) / Decimal::from(whole as u64)
    }
}

fn mean(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count as u64)
    }
}

/// Valid estimates of active crops
pub fn counted_estimates(estimates: &[Estimate]) -> impl Iterator<Item = &CropEstimate> {
    estimates
        .iter()
        .filter_map(Estimate::figures)
        .filter(|e| e.crop_status.is_active())
}

pub fn soil_health_label(health_ratio: Decimal, diversity_ratio: Decimal) -> SoilHealthLabel {
    if health_ratio > Decimal::new(8, 1) && diversity_ratio > Decimal::new(6, 1) {
        SoilHealthLabel::Excellent
    } else if health_ratio > Decimal::new(6, 1) || diversity_ratio > Decimal::new(4, 1) {
        SoilHealthLabel::Good
    } else {
        SoilHealthLabel::Fair
    }
}

/// clamp(round(40 + 30·health + 20·diversity + 10·irrigation), 0, 100)
pub fn sustainability_score(
    health_ratio: Decimal,
    diversity_ratio: Decimal,
    irrigation_ratio: Decimal,
) -> u32 {
    let raw = Decimal::from(BASE_SUSTAINABILITY_SCORE)
        + Decimal::from(30) * health_ratio
        + Decimal::from(20) * diversity_ratio
        + Decimal::from(10) * irrigation_ratio;
    round_half_up(raw, 0)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u32()
        .unwrap_or(0)
}

/// 10% baseline plus up to 40% for efficient irrigation, capped at 50
pub fn water_saved_percent(irrigation_ratio: Decimal) -> u32 {
    let raw = Decimal::TEN + Decimal::from(40) * irrigation_ratio;
    round_half_up(raw, 0)
        .clamp(Decimal::ZERO, Decimal::from(50))
        .to_u32()
        .unwrap_or(0)
}

fn summarize_farm(farm: &Farm, estimates: &[&CropEstimate]) -> FarmSummary {
    let crops: Vec<&CropEstimate> = estimates
        .iter()
        .copied()
        .filter(|e| e.farm_id == farm.id)
        .collect();

    let planted = saturating_sum(crops.iter().map(|e| e.area_hectares));
    let total_yield = saturating_sum(crops.iter().map(|e| e.total_yield));
    let yield_per_ha_sum = saturating_sum(crops.iter().map(|e| e.yield_per_hectare));

    FarmSummary {
        farm_id: farm.id,
        farm_name: farm.name.clone(),
        status: farm.status,
        crop_count: crops.len(),
        planted_area_hectares: planted,
        total_area_hectares: farm.total_area_hectares,
        total_yield,
        total_water: saturating_sum(crops.iter().map(|e| e.total_water)),
        avg_yield_per_hectare: mean(yield_per_ha_sum, crops.len()),
        efficient_irrigation: is_efficient_irrigation(
            farm.irrigation_type.as_deref().unwrap_or_default(),
        ),
        over_committed: farm
            .total_area_hectares
            .map(|total| planted > total)
            .unwrap_or(false),
    }
}

/// Aggregate a farmer's crop estimates and farms into a portfolio summary.
/// An empty portfolio yields zero totals and neutral ratios.
pub fn aggregate(estimates: &[Estimate], farms: &[Farm]) -> PortfolioSummary {
    let counted: Vec<&CropEstimate> = counted_estimates(estimates).collect();
    let crop_count = counted.len();

    let distinct: HashSet<String> = counted.iter().map(|e| e.name_key()).collect();
    let healthy = counted
        .iter()
        .filter(|e| e.health_status != HealthStatus::Diseased)
        .count();
    let efficient = counted.iter().filter(|e| e.has_efficient_irrigation()).count();

    let health_ratio = ratio(healthy, crop_count);
    let irrigation_efficiency_ratio = ratio(efficient, crop_count);
    let diversity_ratio = if crop_count == 0 {
        neutral_ratio()
    } else {
        let distinct_count = Decimal::from(distinct.len() as u64);
        (distinct_count / Decimal::from(DIVERSITY_SATURATION)).min(Decimal::ONE)
    };

    let total_planted = saturating_sum(counted.iter().map(|e| e.area_hectares));
    let yield_per_ha_sum = saturating_sum(counted.iter().map(|e| e.yield_per_hectare));

    PortfolioSummary {
        crop_count,
        excluded_count: estimates.len() - crop_count,
        farm_count: farms.len(),
        distinct_crop_count: distinct.len(),
        avg_yield_per_hectare: mean(yield_per_ha_sum, crop_count),
        total_yield: saturating_sum(counted.iter().map(|e| e.total_yield)),
        total_water: saturating_sum(counted.iter().map(|e| e.total_water)),
        total_planted_area_hectares: total_planted,
        carbon_offset_tons: round_half_up(
            saturating_mul(total_planted, CARBON_TONS_PER_HECTARE),
            1,
        ),
        water_saved_percent: water_saved_percent(irrigation_efficiency_ratio),
        health_ratio,
        diversity_ratio,
        irrigation_efficiency_ratio,
        soil_health_label: soil_health_label(health_ratio, diversity_ratio),
        biodiversity_label: BiodiversityLabel::from_distinct_crops(distinct.len()),
        overall_sustainability_score: sustainability_score(
            health_ratio,
            diversity_ratio,
            irrigation_efficiency_ratio,
        ),
        farms: farms.iter().map(|farm| summarize_farm(farm, &counted)).collect(),
    }
}
