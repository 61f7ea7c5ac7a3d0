//! Farm records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{GpsCoordinates, RecordStatus};

/// A farm owned by a farmer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Farm {
    pub id: Uuid,
    #[serde(default)]
    pub farmer_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub location: Option<FarmLocation>,
    /// Total area in hectares
    #[serde(default)]
    pub total_area_hectares: Option<Decimal>,
    /// Free text such as "Sandy Loam" or "Heavy Clay"
    #[serde(default)]
    pub soil_type: Option<String>,
    /// Free text such as "Drip" or "Flood"
    #[serde(default)]
    pub irrigation_type: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Where a farm is: either a postal address or a coordinate pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FarmLocation {
    Coordinates(GpsCoordinates),
    Address(String),
}
