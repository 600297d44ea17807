//! API Routes
//!
//! Configures the Axum router with all weather endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cached_handler, health_handler, now_handler, period_handler, recent_handler, stats_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /weather/now/:coords` - Today's forecast for a location
/// - `GET /weather/recent/:coords/:days` - Forecasts for the next 1..=7 days
/// - `GET /weather/period/:coords/:range` - Forecasts for a date window
/// - `GET /weather/cached` - Dump of all cached records
/// - `GET /weather/stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/weather/now/:coords", get(now_handler))
        .route("/weather/recent/:coords/:days", get(recent_handler))
        .route("/weather/period/:coords/:range", get(period_handler))
        .route("/weather/cached", get(cached_handler))
        .route("/weather/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
