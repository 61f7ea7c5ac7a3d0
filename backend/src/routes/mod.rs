//! Route definitions for the agronomic estimate server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/traits", trait_routes())
        .route("/estimates", post(handlers::create_estimates))
        .route("/portfolio", post(handlers::summarize_portfolio))
        .route("/alerts", post(handlers::rank_alerts))
        .route("/dashboard", post(handlers::get_dashboard))
}

/// Crop trait table routes
fn trait_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_traits))
        .route("/:crop_name", get(handlers::get_traits))
}
