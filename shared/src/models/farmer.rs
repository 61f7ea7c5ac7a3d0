//! Farmer profile

use serde::{Deserialize, Serialize};

/// A farmer as known to the dashboard.
///
/// `id` is the identity provider's opaque user id; `farmer_code` is the
/// human-readable code farms and crops are filed under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FarmerProfile {
    pub id: String,
    pub farmer_code: String,
    #[serde(default)]
    pub display_name: Option<String>,
}
