//! Per-crop estimator
//!
//! Composes the trait table, soil adjustment and growth classifier into one
//! crop's yield, water and stage estimate. Estimation never fails outright:
//! unusable records come back as [`Estimate::Invalid`] so callers can leave
//! them out of totals.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::growth::{classify_stage, parse_planting_date, GrowthStage};
use super::quantity::saturating_mul;
use super::soil::{
    classify_irrigation, classify_soil, IrrigationClass, SoilClass, DEFAULT_SOIL_TYPE,
};
use super::traits::lookup_traits;
use crate::models::{Crop, Farm};
use crate::types::{HealthStatus, RecordStatus};

/// Largest planted area accepted for a single crop, in hectares
pub const MAX_PLANTED_AREA_HECTARES: i64 = 1_000_000;

/// Why a crop record could not be estimated
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum InvalidInput {
    #[error("planted area must be greater than zero")]
    NonPositiveArea,
    #[error("planted area exceeds 1,000,000 hectares")]
    AreaOutOfRange,
    #[error("planting date is missing")]
    MissingPlantingDate,
    #[error("planting date '{value}' is not a valid date")]
    UnparseablePlantingDate { value: String },
    #[error("farm {farm_id} was not supplied")]
    UnknownFarm { farm_id: Uuid },
}

/// Figures for a crop that could be estimated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropEstimate {
    pub crop_id: Uuid,
    pub farm_id: Uuid,
    pub crop_name: String,
    pub crop_status: RecordStatus,
    pub health_status: HealthStatus,
    /// Trait-table group the name matched
    pub trait_key: String,
    pub area_hectares: Decimal,
    pub yield_per_hectare: Decimal,
    pub total_yield: Decimal,
    /// Soil-adjusted water need per hectare, in mm
    pub water_per_hectare: Decimal,
    pub total_water: Decimal,
    pub soil_class: SoilClass,
    pub irrigation: IrrigationClass,
    pub planting_date: NaiveDate,
    pub growth_stage: GrowthStage,
    pub days_since_planting: i64,
    pub days_to_harvest: i64,
    pub cycle_days: i64,
    pub expected_harvest_date: Option<NaiveDate>,
}

impl CropEstimate {
    pub fn has_efficient_irrigation(&self) -> bool {
        self.irrigation == IrrigationClass::Efficient
    }

    /// Key used for biodiversity counting
    pub fn name_key(&self) -> String {
        self.crop_name.trim().to_lowercase()
    }
}

/// A crop excluded from estimation, with the reason
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectedCrop {
    pub crop_id: Uuid,
    pub farm_id: Uuid,
    pub crop_name: String,
    pub reason: InvalidInput,
}

/// Outcome of estimating one crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Estimate {
    Valid(CropEstimate),
    Invalid(RejectedCrop),
}

impl Estimate {
    pub fn is_valid(&self) -> bool {
        matches!(self, Estimate::Valid(_))
    }

    pub fn crop_id(&self) -> Uuid {
        match self {
            Estimate::Valid(e) => e.crop_id,
            Estimate::Invalid(r) => r.crop_id,
        }
    }

    pub fn figures(&self) -> Option<&CropEstimate> {
        match self {
            Estimate::Valid(e) => Some(e),
            Estimate::Invalid(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&InvalidInput> {
        match self {
            Estimate::Valid(_) => None,
            Estimate::Invalid(r) => Some(&r.reason),
        }
    }
}

fn reject(crop: &Crop, reason: InvalidInput) -> Estimate {
    Estimate::Invalid(RejectedCrop {
        crop_id: crop.id,
        farm_id: crop.farm_id,
        crop_name: crop.name.clone(),
        reason,
    })
}

fn checked_planting_date(crop: &Crop) -> Result<NaiveDate, InvalidInput> {
    let raw = match crop.planting_date.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Err(InvalidInput::MissingPlantingDate),
    };
    parse_planting_date(raw).ok_or_else(|| InvalidInput::UnparseablePlantingDate {
        value: raw.to_string(),
    })
}

fn checked_area(crop: &Crop) -> Result<Decimal, InvalidInput> {
    let area = crop.planted_area_hectares;
    if area <= Decimal::ZERO {
        return Err(InvalidInput::NonPositiveArea);
    }
    if area > Decimal::from(MAX_PLANTED_AREA_HECTARES) {
        return Err(InvalidInput::AreaOutOfRange);
    }
    Ok(area)
}

/// Estimate one crop on its farm at `now`
pub fn estimate(crop: &Crop, farm: &Farm, now: DateTime<Utc>) -> Estimate {
    let area = match checked_area(crop) {
        Ok(area) => area,
        Err(reason) => return reject(crop, reason),
    };
    let planting_date = match checked_planting_date(crop) {
        Ok(date) => date,
        Err(reason) => return reject(crop, reason),
    };

    let traits = lookup_traits(&crop.name);
    let soil_class = classify_soil(farm.soil_type.as_deref().unwrap_or(DEFAULT_SOIL_TYPE));
    let irrigation = classify_irrigation(farm.irrigation_type.as_deref().unwrap_or_default());
    let water_per_hectare = saturating_mul(traits.water_per_hectare, soil_class.water_factor());
    let reading = classify_stage(planting_date, now, traits.cycle_days);

    Estimate::Valid(CropEstimate {
        crop_id: crop.id,
        farm_id: crop.farm_id,
        crop_name: crop.name.clone(),
        crop_status: crop.status,
        health_status: crop.health_status,
        trait_key: traits.key,
        area_hectares: area,
        yield_per_hectare: traits.yield_per_hectare,
        total_yield: saturating_mul(traits.yield_per_hectare, area),
        water_per_hectare,
        total_water: saturating_mul(water_per_hectare, area),
        soil_class,
        irrigation,
        planting_date,
        growth_stage: reading.stage,
        days_since_planting: reading.days_since_planting,
        days_to_harvest: reading.days_to_harvest,
        cycle_days: traits.cycle_days,
        expected_harvest_date: u64::try_from(traits.cycle_days)
            .ok()
            .and_then(|days| planting_date.checked_add_days(Days::new(days))),
    })
}

/// Estimate every crop, resolving each crop's farm by id.
/// Output order follows `crops`.
pub fn estimate_all(crops: &[Crop], farms: &[Farm], now: DateTime<Utc>) -> Vec<Estimate> {
    crops
        .iter()
        .map(|crop| match farms.iter().find(|farm| farm.id == crop.farm_id) {
            Some(farm) => estimate(crop, farm, now),
            None => reject(crop, InvalidInput::UnknownFarm { farm_id: crop.farm_id }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    fn farm(soil: &str, irrigation: &str) -> Farm {
        Farm {
            id: Uuid::from_u128(1),
            farmer_id: None,
            name: "North Field".to_string(),
            location: None,
            total_area_hectares: Some(Decimal::from(10)),
            soil_type: Some(soil.to_string()),
            irrigation_type: Some(irrigation.to_string()),
            status: RecordStatus::Active,
        }
    }

    fn crop(name: &str, area: Decimal, days_ago: i64) -> Crop {
        Crop {
            id: Uuid::from_u128(100),
            farm_id: Uuid::from_u128(1),
            farmer_id: None,
            name: name.to_string(),
            variety: None,
            planted_area_hectares: area,
            planting_date: Some((now() - Duration::days(days_ago)).date_naive().to_string()),
            status: RecordStatus::Active,
            health_status: HealthStatus::Healthy,
        }
    }

    #[test]
    fn test_basmati_rice_on_sandy_drip_farm() {
        let estimate = estimate(
            &crop("Basmati Rice", Decimal::from(2), 40),
            &farm("Sandy", "Drip"),
            now(),
        );
        let e = estimate.figures().expect("valid estimate");

        assert_eq!(e.yield_per_hectare, Decimal::new(55, 1));
        assert_eq!(e.total_yield, Decimal::from(11));
        assert_eq!(e.water_per_hectare, Decimal::from(1440));
        assert_eq!(e.total_water, Decimal::from(2880));
        assert_eq!(e.growth_stage, GrowthStage::Vegetative);
        assert_eq!(e.days_since_planting, 40);
        assert_eq!(e.days_to_harvest, 80);
        assert!(e.has_efficient_irrigation());
    }

    #[test]
    fn test_missing_soil_defaults_to_loamy() {
        let mut f = farm("", "");
        f.soil_type = None;
        let estimate = estimate(&crop("Cotton", Decimal::ONE, 10), &f, now());
        let e = estimate.figures().expect("valid estimate");
        assert_eq!(e.water_per_hectare, Decimal::from(700));
        assert_eq!(e.soil_class, SoilClass::Other);
    }

    #[test]
    fn test_zero_area_is_flagged() {
        let estimate = estimate(&crop("Wheat", Decimal::ZERO, 10), &farm("Clay", "Flood"), now());
        assert_eq!(estimate.rejection(), Some(&InvalidInput::NonPositiveArea));
    }

    #[test]
    fn test_negative_and_huge_areas_are_flagged() {
        let f = farm("Clay", "Flood");
        let negative = estimate(&crop("Wheat", Decimal::from(-3), 10), &f, now());
        assert_eq!(negative.rejection(), Some(&InvalidInput::NonPositiveArea));

        let too_big = Decimal::from(MAX_PLANTED_AREA_HECTARES + 1);
        let huge = estimate(&crop("Wheat", too_big, 10), &f, now());
        assert_eq!(huge.rejection(), Some(&InvalidInput::AreaOutOfRange));
    }

    #[test]
    fn test_planting_date_problems_are_flagged() {
        let f = farm("Clay", "Flood");

        let mut missing = crop("Wheat", Decimal::ONE, 10);
        missing.planting_date = None;
        assert_eq!(
            estimate(&missing, &f, now()).rejection(),
            Some(&InvalidInput::MissingPlantingDate)
        );

        let mut garbled = crop("Wheat", Decimal::ONE, 10);
        garbled.planting_date = Some("last spring".to_string());
        assert!(matches!(
            estimate(&garbled, &f, now()).rejection(),
            Some(InvalidInput::UnparseablePlantingDate { .. })
        ));
    }

    #[test]
    fn test_estimate_all_flags_unknown_farm() {
        let mut orphan = crop("Maize", Decimal::ONE, 10);
        orphan.farm_id = Uuid::from_u128(999);
        let estimates = estimate_all(&[orphan], &[farm("Clay", "Flood")], now());
        assert!(matches!(
            estimates[0].rejection(),
            Some(InvalidInput::UnknownFarm { .. })
        ));
    }

    #[test]
    fn test_expected_harvest_date() {
        let estimate = estimate(&crop("Paddy", Decimal::ONE, 0), &farm("Loamy", "Flood"), now());
        let e = estimate.figures().expect("valid estimate");
        assert_eq!(
            e.expected_harvest_date,
            Some(now().date_naive() + Duration::days(120))
        );
    }

    #[test]
    fn test_json_shape_is_tagged() {
        let valid = estimate(&crop("Corn", Decimal::ONE, 5), &farm("Loamy", "Drip"), now());
        let json = serde_json::to_value(&valid).unwrap();
        assert_eq!(json["status"], "valid");
        assert_eq!(json["growth_stage"], "Seedling");

        let invalid = estimate(&crop("Corn", Decimal::ZERO, 5), &farm("Loamy", "Drip"), now());
        let json = serde_json::to_value(&invalid).unwrap();
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["reason"]["code"], "non_positive_area");
    }
}
