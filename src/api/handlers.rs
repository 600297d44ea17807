//! API Handlers
//!
//! HTTP request handlers for each weather endpoint. Handlers only parse and
//! validate path segments; everything else happens in the service layer.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::models::{
    Coordinates, DateRange, ForecastKind, ForecastRecord, HealthResponse, StatsResponse,
    MAX_FORECAST_DAYS,
};
use crate::services::{DarkSkyClient, ForecastCache, WeatherService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The weather service, fronting the TTL cache and the upstream client
    pub weather: Arc<WeatherService>,
}

impl AppState {
    /// Creates a new AppState around an existing service.
    pub fn new(service: WeatherService) -> Self {
        Self {
            weather: Arc::new(service),
        }
    }

    /// Wires cache, upstream client, and service from the configuration.
    ///
    /// The cache handle is passed to the service explicitly; nothing here is
    /// ambient or global.
    pub fn from_config(config: &Config) -> Self {
        let cache = Arc::new(ForecastCache::with_config(
            config.time_to_live,
            config.sweep_interval,
        ));
        let provider = Arc::new(DarkSkyClient::from_config(config));
        Self::new(WeatherService::new(cache, provider))
    }
}

/// Handler for GET /weather/now/:coords
///
/// Today's forecast for a location.
pub async fn now_handler(
    State(state): State<AppState>,
    Path(coords): Path<String>,
) -> Result<Json<Vec<Value>>> {
    let coords: Coordinates = coords.parse()?;
    let days = state.weather.forecast(&coords, ForecastKind::Now).await?;
    Ok(Json(days))
}

/// Handler for GET /weather/recent/:coords/:days
///
/// Daily forecasts for the next `days` days starting today. The day count
/// is clamped to 1..=7 rather than rejected.
pub async fn recent_handler(
    State(state): State<AppState>,
    Path((coords, days)): Path<(String, i64)>,
) -> Result<Json<Vec<Value>>> {
    let coords: Coordinates = coords.parse()?;
    let days = days.clamp(1, MAX_FORECAST_DAYS as i64) as u32;

    let days = state
        .weather
        .forecast(&coords, ForecastKind::Recent { days })
        .await?;
    Ok(Json(days))
}

/// Handler for GET /weather/period/:coords/:range
///
/// One daily forecast per day of a `yyyy-mm-dd,yyyy-mm-dd` window.
pub async fn period_handler(
    State(state): State<AppState>,
    Path((coords, range)): Path<(String, String)>,
) -> Result<Json<Vec<Value>>> {
    let coords: Coordinates = coords.parse()?;
    let range: DateRange = range.parse()?;
    let (start, end) = range.to_window(Utc::now().timestamp())?;

    let days = state
        .weather
        .forecast(&coords, ForecastKind::Period { start, end })
        .await?;
    Ok(Json(days))
}

/// Handler for GET /weather/cached
///
/// Dumps every currently cached record. The dump counts as a read: every
/// record's last-access timestamp is refreshed.
pub async fn cached_handler(State(state): State<AppState>) -> Json<Vec<ForecastRecord>> {
    Json(state.weather.cached_forecasts(true).await)
}

/// Handler for GET /weather/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.weather.cache_stats().await;
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
