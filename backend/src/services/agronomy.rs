//! Agronomic estimate service
//!
//! Validates caller-supplied crop and farm records, fixes the evaluation
//! instant, and runs the shared engine. Nothing is stored between requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    aggregate, estimate_all, lookup_traits, rank_estimates, trait_table, validate_crop,
    validate_farm, validate_farmer_code, validate_name, validate_unique_ids, AlertFeed, Crop,
    CropTraits, Estimate, Farm, FarmerProfile, PortfolioSummary,
};
use validator::{Validate, ValidationError};

use crate::config::EngineConfig;
use crate::error::{AppError, AppResult};

/// Agronomy service for estimates, summaries and alerts
#[derive(Clone)]
pub struct AgronomyService {
    config: EngineConfig,
}

/// Records to evaluate, as held by the caller
#[derive(Debug, Deserialize, Validate)]
pub struct PortfolioInput {
    /// Evaluation instant; the server clock when absent
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    /// Owner of the records, echoed back on the dashboard
    #[serde(default)]
    #[validate(custom = "check_farmer")]
    pub farmer: Option<FarmerProfile>,
    #[serde(default)]
    pub crops: Vec<Crop>,
    #[serde(default)]
    pub farms: Vec<Farm>,
}

fn check_farmer(farmer: &FarmerProfile) -> Result<(), ValidationError> {
    let rejected = |code: &'static str, message: &'static str| {
        let mut error = ValidationError::new(code);
        error.message = Some(message.into());
        error
    };

    validate_farmer_code(&farmer.farmer_code).map_err(|msg| rejected("farmer_code", msg))?;
    if let Some(name) = farmer.display_name.as_deref() {
        validate_name(name).map_err(|msg| rejected("display_name", msg))?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct EstimatesResponse {
    pub as_of: DateTime<Utc>,
    pub estimates: Vec<Estimate>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub as_of: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer: Option<FarmerProfile>,
    pub estimates: Vec<Estimate>,
    pub portfolio: PortfolioSummary,
    pub alerts: AlertFeed,
}

#[derive(Debug, Serialize)]
pub struct TraitTableResponse {
    pub traits: Vec<CropTraits>,
}

#[derive(Debug, Serialize)]
pub struct TraitLookupResponse {
    pub query: String,
    /// False when the name fell through to the default row
    pub matched: bool,
    pub traits: CropTraits,
}

/// Validated records plus the instant they are evaluated at
struct Evaluation {
    as_of: DateTime<Utc>,
    farmer: Option<FarmerProfile>,
    farms: Vec<Farm>,
    estimates: Vec<Estimate>,
}

impl AgronomyService {
    /// Create a new AgronomyService instance
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Full crop trait table, default row last
    pub fn traits(&self) -> TraitTableResponse {
        TraitTableResponse {
            traits: trait_table(),
        }
    }

    /// Traits matched for a free-text crop name
    pub fn traits_for(&self, crop_name: &str) -> TraitLookupResponse {
        let traits = lookup_traits(crop_name);
        TraitLookupResponse {
            query: crop_name.to_string(),
            matched: !traits.is_default(),
            traits,
        }
    }

    /// Per-crop estimates, valid and flagged, in input order
    pub fn estimates(&self, input: PortfolioInput) -> AppResult<EstimatesResponse> {
        let evaluation = self.evaluate(input)?;
        Ok(EstimatesResponse {
            as_of: evaluation.as_of,
            estimates: evaluation.estimates,
        })
    }

    /// Portfolio summary with per-farm breakdown
    pub fn portfolio(&self, input: PortfolioInput) -> AppResult<PortfolioSummary> {
        let evaluation = self.evaluate(input)?;
        let summary = aggregate(&evaluation.estimates, &evaluation.farms);

        tracing::info!(
            crops = summary.crop_count,
            excluded = summary.excluded_count,
            score = summary.overall_sustainability_score,
            "Portfolio summarized"
        );

        Ok(summary)
    }

    /// Generated alerts and the ranked display list
    pub fn alerts(&self, input: PortfolioInput) -> AppResult<AlertFeed> {
        let evaluation = self.evaluate(input)?;
        let feed = rank_estimates(&evaluation.estimates, &self.config.alerts, evaluation.as_of);

        tracing::info!(total = feed.total, shown = feed.top.len(), "Alerts ranked");

        Ok(feed)
    }

    /// Everything a dashboard page needs from one set of records
    pub fn dashboard(&self, input: PortfolioInput) -> AppResult<DashboardResponse> {
        let evaluation = self.evaluate(input)?;
        let portfolio = aggregate(&evaluation.estimates, &evaluation.farms);
        let alerts = rank_estimates(&evaluation.estimates, &self.config.alerts, evaluation.as_of);

        Ok(DashboardResponse {
            as_of: evaluation.as_of,
            farmer: evaluation.farmer,
            estimates: evaluation.estimates,
            portfolio,
            alerts,
        })
    }

    /// Check the records and run the per-crop estimator
    fn evaluate(&self, input: PortfolioInput) -> AppResult<Evaluation> {
        input.validate()?;

        let received = input.crops.len() + input.farms.len();
        if received > self.config.max_records {
            return Err(AppError::PayloadTooLarge {
                limit: self.config.max_records,
                received,
            });
        }

        validate_unique_ids(input.farms.iter().map(|f| f.id))
            .map_err(|msg| AppError::validation("farms", msg))?;
        validate_unique_ids(input.crops.iter().map(|c| c.id))
            .map_err(|msg| AppError::validation("crops", msg))?;

        for (i, farm) in input.farms.iter().enumerate() {
            validate_farm(farm).map_err(|(field, msg)| {
                AppError::validation(format!("farms[{}].{}", i, field), msg)
            })?;
        }
        for (i, crop) in input.crops.iter().enumerate() {
            validate_crop(crop).map_err(|(field, msg)| {
                AppError::validation(format!("crops[{}].{}", i, field), msg)
            })?;
        }

        let as_of = input.as_of.unwrap_or_else(Utc::now);
        let estimates = estimate_all(&input.crops, &input.farms, as_of);

        for rejected in estimates.iter().filter_map(|e| match e {
            Estimate::Invalid(rejected) => Some(rejected),
            Estimate::Valid(_) => None,
        }) {
            tracing::warn!(
                crop_id = %rejected.crop_id,
                reason = %rejected.reason,
                "Crop excluded from estimates"
            );
        }

        tracing::debug!(
            crops = input.crops.len(),
            farms = input.farms.len(),
            %as_of,
            "Estimates computed"
        );

        Ok(Evaluation {
            as_of,
            farmer: input.farmer,
            farms: input.farms,
            estimates,
        })
    }
}
