//! Estimate, portfolio and alert HTTP handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::{AppError, AppResult};
use crate::services::agronomy::PortfolioInput;
use crate::services::AgronomyService;
use crate::AppState;

fn service(state: &AppState) -> AgronomyService {
    AgronomyService::new(state.config.engine.clone())
}

/// Unwrap the JSON body, turning parse failures into the API error shape
fn records(payload: Result<Json<PortfolioInput>, JsonRejection>) -> AppResult<PortfolioInput> {
    payload.map(|Json(input)| input).map_err(AppError::from)
}

/// List the crop trait table
pub async fn list_traits(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(service(&state).traits()))
}

/// Look up the traits matched for a crop name
pub async fn get_traits(
    State(state): State<AppState>,
    Path(crop_name): Path<String>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(service(&state).traits_for(&crop_name)))
}

/// Estimate every crop in the payload
pub async fn create_estimates(
    State(state): State<AppState>,
    payload: Result<Json<PortfolioInput>, JsonRejection>,
) -> impl IntoResponse {
    match records(payload).and_then(|input| service(&state).estimates(input)) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Summarize the payload's farms and crops
pub async fn summarize_portfolio(
    State(state): State<AppState>,
    payload: Result<Json<PortfolioInput>, JsonRejection>,
) -> impl IntoResponse {
    match records(payload).and_then(|input| service(&state).portfolio(input)) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Generate and rank alerts for the payload
pub async fn rank_alerts(
    State(state): State<AppState>,
    payload: Result<Json<PortfolioInput>, JsonRejection>,
) -> impl IntoResponse {
    match records(payload).and_then(|input| service(&state).alerts(input)) {
        Ok(feed) => (StatusCode::OK, Json(feed)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Estimates, summary and alerts in one response
pub async fn get_dashboard(
    State(state): State<AppState>,
    payload: Result<Json<PortfolioInput>, JsonRejection>,
) -> impl IntoResponse {
    match records(payload).and_then(|input| service(&state).dashboard(input)) {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        Err(e) => e.into_response(),
    }
}
