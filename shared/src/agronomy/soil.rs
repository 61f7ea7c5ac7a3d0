//! Soil and irrigation adjustments

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::quantity::saturating_mul;

/// Soil type assumed when a farm has none recorded
pub const DEFAULT_SOIL_TYPE: &str = "loamy";

/// Soil class derived from the farm's free-text soil type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoilClass {
    /// Drains fast, needs more water
    Sandy,
    /// Retains water
    Clay,
    Other,
}

impl SoilClass {
    /// Multiplier applied to a crop's base water need
    pub fn water_factor(&self) -> Decimal {
        match self {
            SoilClass::Sandy => Decimal::new(12, 1),
            SoilClass::Clay => Decimal::new(9, 1),
            SoilClass::Other => Decimal::ONE,
        }
    }
}

impl std::fmt::Display for SoilClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilClass::Sandy => write!(f, "Sandy"),
            SoilClass::Clay => write!(f, "Clay"),
            SoilClass::Other => write!(f, "Other"),
        }
    }
}

/// Classify a soil description; "sandy" is tested before "clay"
pub fn classify_soil(soil_type: &str) -> SoilClass {
    let soil = soil_type.to_lowercase();
    if soil.contains("sandy") {
        SoilClass::Sandy
    } else if soil.contains("clay") {
        SoilClass::Clay
    } else {
        SoilClass::Other
    }
}

/// Adjust a per-hectare water need for soil type. Results beyond the
/// `Decimal` range pin to `Decimal::MAX` (or `MIN` for negative input).
pub fn adjust_water(base_water_per_ha: Decimal, soil_type: &str) -> Decimal {
    saturating_mul(base_water_per_ha, classify_soil(soil_type).water_factor())
}

/// Irrigation method class
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationClass {
    /// Drip or sprinkler
    Efficient,
    Conventional,
}

/// Classify an irrigation description by drip/sprinkler keyword
pub fn classify_irrigation(irrigation_type: &str) -> IrrigationClass {
    let irrigation = irrigation_type.to_lowercase();
    if irrigation.contains("drip") || irrigation.contains("sprinkler") {
        IrrigationClass::Efficient
    } else {
        IrrigationClass::Conventional
    }
}

pub fn is_efficient_irrigation(irrigation_type: &str) -> bool {
    classify_irrigation(irrigation_type) == IrrigationClass::Efficient
}
