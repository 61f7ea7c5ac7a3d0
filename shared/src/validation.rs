//! Validation utilities for farm and crop records
//!
//! Record-level checks used at the request boundary. Values the estimator
//! can handle on its own (zero areas, unreadable planting dates) are not
//! rejected here; they come back as flagged estimates instead.

use std::collections::HashSet;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Crop, Farm, FarmLocation};
use crate::types::GpsCoordinates;

/// Maximum length of a crop or farm name
pub const MAX_NAME_LENGTH: usize = 100;

// ============================================================================
// Crop Validations
// ============================================================================

/// Validate a crop or farm name
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err("Name must be at most 100 characters");
    }
    Ok(())
}

// ============================================================================
// Farm Validations
// ============================================================================

/// Validate a farm's total area, if recorded
pub fn validate_farm_area(total_area_hectares: Option<Decimal>) -> Result<(), &'static str> {
    match total_area_hectares {
        Some(area) if area < Decimal::ZERO => Err("Farm area cannot be negative"),
        _ => Ok(()),
    }
}

/// Validate latitude/longitude ranges
pub fn validate_coordinates(coordinates: &GpsCoordinates) -> Result<(), &'static str> {
    if coordinates.latitude < Decimal::from(-90) || coordinates.latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if coordinates.longitude < Decimal::from(-180) || coordinates.longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a farm record's name, area and location
pub fn validate_farm(farm: &Farm) -> Result<(), (&'static str, &'static str)> {
    validate_name(&farm.name).map_err(|msg| ("name", msg))?;
    validate_farm_area(farm.total_area_hectares).map_err(|msg| ("total_area_hectares", msg))?;
    if let Some(FarmLocation::Coordinates(coordinates)) = &farm.location {
        validate_coordinates(coordinates).map_err(|msg| ("location", msg))?;
    }
    Ok(())
}

/// Validate a crop record's name. Area and planting date are left to the estimator.
pub fn validate_crop(crop: &Crop) -> Result<(), (&'static str, &'static str)> {
    validate_name(&crop.name).map_err(|msg| ("name", msg))
}

/// Check that no id appears twice
pub fn validate_unique_ids<I>(ids: I) -> Result<(), &'static str>
where
    I: IntoIterator<Item = Uuid>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err("Duplicate record id");
        }
    }
    Ok(())
}

// ============================================================================
// Farmer Validations
// ============================================================================

/// Validate farmer code format (3-12 uppercase alphanumeric or '-')
pub fn validate_farmer_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 3 {
        return Err("Farmer code must be at least 3 characters");
    }
    if code.len() > 12 {
        return Err("Farmer code must be at most 12 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Farmer code must be uppercase alphanumeric or '-'");
    }
    Ok(())
}
