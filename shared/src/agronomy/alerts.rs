//! Alert and recommendation ranking
//!
//! Alerts are derived by threshold rules from crop estimates, then ranked by
//! priority (urgent first) and recency. Ranking is a stable sort, so alerts
//! that tie on both keep the order they were generated in.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::estimator::{CropEstimate, Estimate};
use super::portfolio::counted_estimates;
use super::soil::SoilClass;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Water,
    Growth,
    Harvest,
    Soil,
    Yield,
    Irrigation,
    Info,
}

impl AlertKind {
    fn id_prefix(&self) -> &'static str {
        match self {
            AlertKind::Water => "water",
            AlertKind::Growth => "growth",
            AlertKind::Harvest => "harvest",
            AlertKind::Soil => "soil",
            AlertKind::Yield => "yield",
            AlertKind::Irrigation => "irrigation",
            AlertKind::Info => "info",
        }
    }
}

/// Alert priority; declaration order gives `Low < Medium < High < Urgent`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl AlertPriority {
    /// Numeric rank: urgent = 4, high = 3, medium = 2, low = 1
    pub fn rank(&self) -> u8 {
        match self {
            AlertPriority::Low => 1,
            AlertPriority::Medium => 2,
            AlertPriority::High => 3,
            AlertPriority::Urgent => 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub crop_id: Option<Uuid>,
    #[serde(default)]
    pub farm_id: Option<Uuid>,
    #[serde(default)]
    pub crop_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Rule thresholds for alert generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertThresholds {
    /// Total water (mm) above which a crop gets a high-water alert
    pub high_water_mm: Decimal,
    /// Active-growth window, exclusive on both ends
    pub growth_window_start_days: i64,
    pub growth_window_end_days: i64,
    /// Harvest alert fires when 0 <= days to harvest <= this
    pub harvest_window_days: i64,
    /// Number of ranked alerts kept for display
    pub display_limit: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            high_water_mm: Decimal::from(5000),
            growth_window_start_days: 30,
            growth_window_end_days: 90,
            harvest_window_days: 15,
            display_limit: 3,
        }
    }
}

/// Alerts for a farmer: the full unranked list and the ranked display list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertFeed {
    pub total: usize,
    /// Every generated alert in generation order, for counts and badges
    pub alerts: Vec<Alert>,
    /// Highest-ranked alerts, truncated to the display limit
    pub top: Vec<Alert>,
}

fn crop_alert(
    estimate: &CropEstimate,
    kind: AlertKind,
    priority: AlertPriority,
    title: String,
    message: String,
    now: DateTime<Utc>,
) -> Alert {
    Alert {
        id: format!("{}_{}", kind.id_prefix(), estimate.crop_id),
        kind,
        priority,
        title,
        message,
        crop_id: Some(estimate.crop_id),
        farm_id: Some(estimate.farm_id),
        crop_name: Some(estimate.crop_name.clone()),
        timestamp: now,
    }
}

fn whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn alerts_for_crop(
    e: &CropEstimate,
    thresholds: &AlertThresholds,
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let name = &e.crop_name;

    if e.total_water > thresholds.high_water_mm {
        alerts.push(crop_alert(
            e,
            AlertKind::Water,
            AlertPriority::High,
            "High Water Requirement".to_string(),
            format!(
                "{} needs approximately {}mm of water. Consider efficient irrigation methods.",
                name,
                whole(e.total_water)
            ),
            now,
        ));
    }

    if e.days_since_planting > thresholds.growth_window_start_days
        && e.days_since_planting < thresholds.growth_window_end_days
    {
        alerts.push(crop_alert(
            e,
            AlertKind::Growth,
            AlertPriority::Medium,
            "Active Growth Phase".to_string(),
            format!(
                "{} is in a critical growth phase (day {}). Monitor nutrient levels and water \
                 supply regularly.",
                name, e.days_since_planting
            ),
            now,
        ));
    }

    if e.days_to_harvest < 0 {
        alerts.push(crop_alert(
            e,
            AlertKind::Harvest,
            AlertPriority::Urgent,
            "Harvest Overdue".to_string(),
            format!(
                "{} is {} days past its expected harvest. Harvest as soon as possible to avoid \
                 losses.",
                name, -e.days_to_harvest
            ),
            now,
        ));
    } else if e.days_to_harvest <= thresholds.harvest_window_days {
        alerts.push(crop_alert(
            e,
            AlertKind::Harvest,
            AlertPriority::High,
            "Harvest Approaching".to_string(),
            format!(
                "{} is nearing harvest time ({} days left). Prepare equipment and labor in \
                 advance.",
                name, e.days_to_harvest
            ),
            now,
        ));
    }

    if !e.has_efficient_irrigation() {
        alerts.push(crop_alert(
            e,
            AlertKind::Irrigation,
            AlertPriority::Medium,
            "Upgrade Irrigation System".to_string(),
            format!(
                "Consider drip or sprinkler irrigation for {}. It can save 30-50% water and \
                 increase yield by 10-15%.",
                name
            ),
            now,
        ));
    }

    match e.soil_class {
        SoilClass::Sandy => alerts.push(crop_alert(
            e,
            AlertKind::Soil,
            AlertPriority::Medium,
            "Improve Soil Water Retention".to_string(),
            format!(
                "Sandy soil under {}. Add organic matter such as compost to improve water \
                 retention.",
                name
            ),
            now,
        )),
        SoilClass::Clay => alerts.push(crop_alert(
            e,
            AlertKind::Soil,
            AlertPriority::Medium,
            "Improve Soil Drainage".to_string(),
            format!(
                "Clay soil under {}. Consider adding gypsum to improve drainage and prevent \
                 waterlogging.",
                name
            ),
            now,
        )),
        SoilClass::Other => {}
    }

    alerts.push(crop_alert(
        e,
        AlertKind::Yield,
        AlertPriority::High,
        format!("Optimize {} Yield", name),
        format!(
            "Expected yield: {} tonnes. Apply balanced NPK fertilizer (10:26:26) at vegetative \
             stage to boost production by 15-20%.",
            e.total_yield.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        ),
        now,
    ));

    alerts
}

/// Generate alerts for every valid estimate of an active crop, in input order
pub fn generate_alerts(
    estimates: &[Estimate],
    thresholds: &AlertThresholds,
    now: DateTime<Utc>,
) -> Vec<Alert> {
    counted_estimates(estimates)
        .flat_map(|e| alerts_for_crop(e, thresholds, now))
        .collect()
}

/// Sort by priority descending, then newest first, and keep the first `limit`
pub fn rank(alerts: &[Alert], limit: usize) -> Vec<Alert> {
    let mut ranked = alerts.to_vec();
    ranked.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
    ranked.truncate(limit);
    ranked
}

/// Placeholder shown when no rule fired
pub fn all_clear(now: DateTime<Utc>) -> Alert {
    Alert {
        id: "info_all_clear".to_string(),
        kind: AlertKind::Info,
        priority: AlertPriority::Low,
        title: "All Systems Normal".to_string(),
        message: "No alerts at this time. Your crops are being monitored.".to_string(),
        crop_id: None,
        farm_id: None,
        crop_name: None,
        timestamp: now,
    }
}

/// Generate and rank alerts for a set of estimates
pub fn rank_estimates(
    estimates: &[Estimate],
    thresholds: &AlertThresholds,
    now: DateTime<Utc>,
) -> AlertFeed {
    let alerts = generate_alerts(estimates, thresholds, now);
    let top = if alerts.is_empty() {
        vec![all_clear(now)]
    } else {
        rank(&alerts, thresholds.display_limit)
    };

    AlertFeed {
        total: alerts.len(),
        alerts,
        top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    fn alert(id: &str, priority: AlertPriority, minutes_ago: i64) -> Alert {
        Alert {
            id: id.to_string(),
            kind: AlertKind::Info,
            priority,
            title: id.to_string(),
            message: String::new(),
            crop_id: None,
            farm_id: None,
            crop_name: None,
            timestamp: now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_rank_by_priority() {
        let alerts = vec![
            alert("a", AlertPriority::Medium, 0),
            alert("b", AlertPriority::High, 50),
            alert("c", AlertPriority::Urgent, 10),
            alert("d", AlertPriority::Low, 5),
        ];
        let ranked: Vec<AlertPriority> = rank(&alerts, 10).iter().map(|a| a.priority).collect();
        assert_eq!(
            ranked,
            vec![
                AlertPriority::Urgent,
                AlertPriority::High,
                AlertPriority::Medium,
                AlertPriority::Low
            ]
        );
    }

    #[test]
    fn test_ties_broken_by_recency_then_input_order() {
        let alerts = vec![
            alert("old", AlertPriority::High, 30),
            alert("new", AlertPriority::High, 1),
            alert("same-1", AlertPriority::Medium, 5),
            alert("same-2", AlertPriority::Medium, 5),
        ];
        let ids: Vec<String> = rank(&alerts, 10).into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["new", "old", "same-1", "same-2"]);
    }

    #[test]
    fn test_rank_truncates() {
        let alerts: Vec<Alert> = (0..5)
            .map(|i| alert(&i.to_string(), AlertPriority::Low, i))
            .collect();
        assert_eq!(rank(&alerts, 3).len(), 3);
        assert!(rank(&alerts, 0).is_empty());
    }

    #[test]
    fn test_empty_feed_shows_all_clear() {
        let feed = rank_estimates(&[], &AlertThresholds::default(), now());
        assert_eq!(feed.total, 0);
        assert!(feed.alerts.is_empty());
        assert_eq!(feed.top.len(), 1);
        assert_eq!(feed.top[0].kind, AlertKind::Info);
    }

    #[test]
    fn test_priority_rank_values() {
        assert_eq!(AlertPriority::Urgent.rank(), 4);
        assert_eq!(AlertPriority::High.rank(), 3);
        assert_eq!(AlertPriority::Medium.rank(), 2);
        assert_eq!(AlertPriority::Low.rank(), 1);
        assert!(AlertPriority::Urgent > AlertPriority::Low);
    }
}
