//! Agronomic Estimate Server
//!
//! Stateless HTTP front for the shared estimate engine: callers post their
//! farm and crop records and get back yield/water estimates, a portfolio
//! sustainability summary and ranked alerts.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod routes;
mod services;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agro_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;
    config.check()?;

    tracing::info!("Starting Agronomic Estimate Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        max_records = config.engine.max_records,
        display_limit = config.engine.alerts.display_limit,
        "Engine limits loaded"
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Agronomic Estimate Engine API v1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_app(AppState {
            config: Arc::new(Config::default()),
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn decimal(value: &Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn basmati_payload() -> Value {
        json!({
            "as_of": "2024-04-10T12:00:00Z",
            "farms": [{
                "id": "00000000-0000-0000-0000-000000000001",
                "name": "River Plot",
                "soil_type": "Sandy Loam",
                "irrigation_type": "Drip",
                "total_area_hectares": "5"
            }],
            "crops": [{
                "id": "00000000-0000-0000-0000-00000000000a",
                "farm_id": "00000000-0000-0000-0000-000000000001",
                "name": "Basmati Rice",
                "planted_area_hectares": "2",
                "planting_date": "2024-03-01"
            }]
        })
    }

    #[tokio::test]
    async fn test_health_routes() {
        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["trait_rows"], 9);

        let (status, _) = send(Request::get("/api/v1/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_trait_lookup_route() {
        let (status, body) =
            send(Request::get("/api/v1/traits/Sweet%20Corn").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matched"], true);
        assert_eq!(body["traits"]["key"], "corn");
    }

    #[tokio::test]
    async fn test_estimates_route() {
        let (status, body) = send(post_json("/api/v1/estimates", basmati_payload())).await;
        assert_eq!(status, StatusCode::OK);

        let estimate = &body["estimates"][0];
        assert_eq!(estimate["status"], "valid");
        assert_eq!(decimal(&estimate["total_yield"]), Decimal::from(11));
        assert_eq!(decimal(&estimate["total_water"]), Decimal::from(2880));
        assert_eq!(estimate["growth_stage"], "Vegetative");
    }

    #[tokio::test]
    async fn test_dashboard_route() {
        let (status, body) = send(post_json("/api/v1/dashboard", basmati_payload())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["portfolio"]["crop_count"], 1);
        assert_eq!(body["portfolio"]["farm_count"], 1);
        assert!(body["alerts"]["top"].as_array().is_some());
    }

    #[tokio::test]
    async fn test_empty_portfolio_route() {
        let (status, body) = send(post_json("/api/v1/portfolio", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["crop_count"], 0);
        assert_eq!(body["overall_sustainability_score"], 70);
    }

    #[tokio::test]
    async fn test_validation_error_shape() {
        let mut payload = basmati_payload();
        payload["crops"][0]["name"] = json!("");

        let (status, body) = send(post_json("/api/v1/alerts", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "crops[0].name");
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_shape() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/estimates")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"crops\": ["))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "body");

        let mut payload = basmati_payload();
        payload["crops"][0]["planted_area_hectares"] = json!({ "hectares": 2 });
        let (status, body) = send(post_json("/api/v1/dashboard", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_body_uses_error_shape() {
        let padding = "x".repeat(3 * 1024 * 1024);
        let payload = json!({ "crops": [], "farms": [], "note": padding });
        let (status, body) = send(post_json("/api/v1/portfolio", payload)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }
}
