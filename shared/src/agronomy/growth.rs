//! Growth stage classification from planting-date age

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// Coarse growth phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum GrowthStage {
    /// 30 days or younger
    Seedling,
    /// 31-60 days
    Vegetative,
    /// 61-90 days
    Flowering,
    /// Older than 90 days
    Fruiting,
}

impl GrowthStage {
    /// Position in the growth sequence, Seedling = 0
    pub fn index(&self) -> u8 {
        match self {
            GrowthStage::Seedling => 0,
            GrowthStage::Vegetative => 1,
            GrowthStage::Flowering => 2,
            GrowthStage::Fruiting => 3,
        }
    }

    /// Stage for a crop of the given age. Breakpoints are inclusive upper
    /// bounds tested in ascending order.
    pub fn from_days(days_since_planting: i64) -> Self {
        if days_since_planting <= 30 {
            GrowthStage::Seedling
        } else if days_since_planting <= 60 {
            GrowthStage::Vegetative
        } else if days_since_planting <= 90 {
            GrowthStage::Flowering
        } else {
            GrowthStage::Fruiting
        }
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrowthStage::Seedling => write!(f, "Seedling"),
            GrowthStage::Vegetative => write!(f, "Vegetative"),
            GrowthStage::Flowering => write!(f, "Flowering"),
            GrowthStage::Fruiting => write!(f, "Fruiting"),
        }
    }
}

/// Stage reading for one crop at a point in time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageReading {
    pub stage: GrowthStage,
    pub days_since_planting: i64,
    /// Negative when the crop is past its expected harvest
    pub days_to_harvest: i64,
}

/// Whole days elapsed from midnight UTC of `planting_date` to `now`, floored.
/// Negative for planting dates in the future.
pub fn days_since(planting_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let planted_at = planting_date.and_time(chrono::NaiveTime::MIN).and_utc();
    (now - planted_at).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Classify a crop's growth stage and harvest countdown
pub fn classify_stage(
    planting_date: NaiveDate,
    now: DateTime<Utc>,
    cycle_days: i64,
) -> StageReading {
    let days_since_planting = days_since(planting_date, now);
    StageReading {
        stage: GrowthStage::from_days(days_since_planting),
        days_since_planting,
        days_to_harvest: cycle_days - days_since_planting,
    }
}

/// Parse a stored planting date: `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_planting_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.with_timezone(&Utc).date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_breakpoints() {
        assert_eq!(GrowthStage::from_days(0), GrowthStage::Seedling);
        assert_eq!(GrowthStage::from_days(30), GrowthStage::Seedling);
        assert_eq!(GrowthStage::from_days(31), GrowthStage::Vegetative);
        assert_eq!(GrowthStage::from_days(60), GrowthStage::Vegetative);
        assert_eq!(GrowthStage::from_days(61), GrowthStage::Flowering);
        assert_eq!(GrowthStage::from_days(90), GrowthStage::Flowering);
        assert_eq!(GrowthStage::from_days(91), GrowthStage::Fruiting);
    }

    #[test]
    fn test_vegetative_is_not_skipped() {
        // 75 days must read Flowering, never Vegetative or Fruiting
        assert_eq!(GrowthStage::from_days(75), GrowthStage::Flowering);
    }

    #[test]
    fn test_days_since_floors_partial_days() {
        let planted = date(2024, 3, 1);
        assert_eq!(days_since(planted, noon(2024, 3, 1)), 0);
        assert_eq!(days_since(planted, noon(2024, 4, 10)), 40);
        // Half a day before planting is day -1
        assert_eq!(days_since(planted, noon(2024, 2, 29)), -1);
    }

    #[test]
    fn test_classify_stage_countdown() {
        let reading = classify_stage(date(2024, 1, 1), noon(2024, 4, 1), 120);
        assert_eq!(reading.days_since_planting, 91);
        assert_eq!(reading.stage, GrowthStage::Fruiting);
        assert_eq!(reading.days_to_harvest, 29);

        let overdue = classify_stage(date(2024, 1, 1), noon(2024, 6, 1), 90);
        assert!(overdue.days_to_harvest < 0);
    }

    #[test]
    fn test_parse_planting_date() {
        assert_eq!(parse_planting_date("2024-05-17"), Some(date(2024, 5, 17)));
        assert_eq!(
            parse_planting_date("2024-05-17T23:30:00+00:00"),
            Some(date(2024, 5, 17))
        );
        assert_eq!(parse_planting_date("17/05/2024"), None);
        assert_eq!(parse_planting_date(""), None);
    }

    proptest! {
        #[test]
        fn prop_stage_is_monotonic(a in -1_000i64..1_000, b in -1_000i64..1_000) {
            let (younger, older) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                GrowthStage::from_days(younger).index() <= GrowthStage::from_days(older).index()
            );
        }
    }
}
