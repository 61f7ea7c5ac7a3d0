//! Crop records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{HealthStatus, RecordStatus};

/// A crop planted on one of a farmer's farms, as read from the data store.
///
/// `planting_date` is kept as the stored text: the estimator decides whether
/// it is usable instead of the whole record failing to deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Crop {
    pub id: Uuid,
    pub farm_id: Uuid,
    #[serde(default)]
    pub farmer_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub variety: Option<String>,
    /// Planted area in hectares
    pub planted_area_hectares: Decimal,
    #[serde(default)]
    pub planting_date: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub health_status: HealthStatus,
}

impl Crop {
    /// Key used for biodiversity counting: trimmed, lower-cased name
    pub fn name_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}
