//! Crop trait table
//!
//! Baseline yield and water figures per crop family, matched by keyword
//! against the free-text crop name. Groups are tested in table order and the
//! first group with a keyword contained in the lower-cased name wins.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Crop-cycle length used for rice and wheat-family crops
pub const LONG_CYCLE_DAYS: i64 = 120;

/// Crop-cycle length used for every other crop
pub const DEFAULT_CYCLE_DAYS: i64 = 90;

/// Key reported when no keyword group matches
pub const DEFAULT_TRAIT_KEY: &str = "default";

struct TraitRow {
    key: &'static str,
    keywords: &'static [&'static str],
    /// Tonnes per hectare, in tenths
    yield_tenths: i64,
    /// Millimetres per hectare
    water_mm: i64,
    cycle_days: i64,
}

const fn row(
    key: &'static str,
    keywords: &'static [&'static str],
    yield_tenths: i64,
    water_mm: i64,
    cycle_days: i64,
) -> TraitRow {
    TraitRow {
        key,
        keywords,
        yield_tenths,
        water_mm,
        cycle_days,
    }
}

static TRAIT_ROWS: &[TraitRow] = &[
    row("rice", &["rice", "paddy"], 55, 1200, LONG_CYCLE_DAYS),
    row("wheat", &["wheat", "barley"], 48, 450, LONG_CYCLE_DAYS),
    row("corn", &["corn", "maize"], 62, 600, DEFAULT_CYCLE_DAYS),
    row("cotton", &["cotton"], 25, 700, DEFAULT_CYCLE_DAYS),
    row("sugarcane", &["sugarcane"], 700, 1500, DEFAULT_CYCLE_DAYS),
    row("potato", &["potato"], 250, 500, DEFAULT_CYCLE_DAYS),
    row("tomato", &["tomato"], 350, 500, DEFAULT_CYCLE_DAYS),
    row("soybean", &["soybean", "pulses"], 32, 400, DEFAULT_CYCLE_DAYS),
];

static DEFAULT_ROW: TraitRow = row(DEFAULT_TRAIT_KEY, &[], 40, 500, DEFAULT_CYCLE_DAYS);

/// Baseline agronomic figures for a crop family
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropTraits {
    /// Group key, e.g. "rice", or "default" when nothing matched
    pub key: String,
    pub keywords: Vec<String>,
    /// Expected yield in tonnes per hectare
    pub yield_per_hectare: Decimal,
    /// Base water need in millimetres per hectare, before soil adjustment
    pub water_per_hectare: Decimal,
    /// Planting-to-harvest length in days
    pub cycle_days: i64,
}

impl CropTraits {
    pub fn is_default(&self) -> bool {
        self.key == DEFAULT_TRAIT_KEY
    }
}

fn to_traits(row: &TraitRow) -> CropTraits {
    CropTraits {
        key: row.key.to_string(),
        keywords: row.keywords.iter().map(|k| k.to_string()).collect(),
        yield_per_hectare: Decimal::new(row.yield_tenths, 1),
        water_per_hectare: Decimal::from(row.water_mm),
        cycle_days: row.cycle_days,
    }
}

fn matching_row(crop_name: &str) -> &'static TraitRow {
    let name = crop_name.to_lowercase();
    TRAIT_ROWS
        .iter()
        .find(|row| row.keywords.iter().any(|k| name.contains(k)))
        .unwrap_or(&DEFAULT_ROW)
}

/// Look up baseline traits for a free-text crop name
pub fn lookup_traits(crop_name: &str) -> CropTraits {
    to_traits(matching_row(crop_name))
}

/// The whole table in match order, followed by the default row
pub fn trait_table() -> Vec<CropTraits> {
    TRAIT_ROWS
        .iter()
        .chain(std::iter::once(&DEFAULT_ROW))
        .map(to_traits)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64, scale: u32) -> Decimal {
        Decimal::new(n, scale)
    }

    #[test]
    fn test_table_constants() {
        let expected = [
            ("Rice", dec(55, 1), dec(1200, 0)),
            ("Paddy", dec(55, 1), dec(1200, 0)),
            ("Wheat", dec(48, 1), dec(450, 0)),
            ("Corn", dec(62, 1), dec(600, 0)),
            ("Maize", dec(62, 1), dec(600, 0)),
            ("Cotton", dec(25, 1), dec(700, 0)),
            ("Sugarcane", dec(700, 1), dec(1500, 0)),
            ("Potato", dec(250, 1), dec(500, 0)),
            ("Tomato", dec(350, 1), dec(500, 0)),
            ("Soybean", dec(32, 1), dec(400, 0)),
        ];

        for (name, yield_per_ha, water_per_ha) in expected {
            let traits = lookup_traits(name);
            assert_eq!(traits.yield_per_hectare, yield_per_ha, "{}", name);
            assert_eq!(traits.water_per_hectare, water_per_ha, "{}", name);
        }
    }

    #[test]
    fn test_matching_is_case_insensitive_substring() {
        assert_eq!(lookup_traits("BASMATI RICE").key, "rice");
        assert_eq!(lookup_traits("sweet corn hybrid").key, "corn");
        assert_eq!(lookup_traits("Cherry Tomatoes").key, "tomato");
    }

    #[test]
    fn test_first_group_wins() {
        // "rice" is tested before "wheat"
        assert_eq!(lookup_traits("rice-wheat rotation").key, "rice");
        // "potato" is tested before "tomato"
        assert_eq!(lookup_traits("potato and tomato").key, "potato");
    }

    #[test]
    fn test_unmatched_falls_back_to_default() {
        for name in ["Mango", "", "Quinoa", "  "] {
            let traits = lookup_traits(name);
            assert!(traits.is_default());
            assert_eq!(traits.yield_per_hectare, dec(40, 1));
            assert_eq!(traits.water_per_hectare, dec(500, 0));
            assert_eq!(traits.cycle_days, DEFAULT_CYCLE_DAYS);
        }
    }

    #[test]
    fn test_cycle_length() {
        assert_eq!(lookup_traits("Paddy").cycle_days, 120);
        assert_eq!(lookup_traits("Durum Wheat").cycle_days, 120);
        assert_eq!(lookup_traits("Barley").cycle_days, 120);
        assert_eq!(lookup_traits("Maize").cycle_days, 90);
    }

    #[test]
    fn test_trait_table_is_enumerable() {
        let table = trait_table();
        assert_eq!(table.len(), 9);
        assert_eq!(table.first().map(|t| t.key.as_str()), Some("rice"));
        assert!(table.last().map(|t| t.is_default()).unwrap_or(false));
    }
}
