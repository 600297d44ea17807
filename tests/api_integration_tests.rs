//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each endpoint against a
//! scripted upstream provider, including cache behavior observable over
//! HTTP.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use weather_cache::api::create_router;
use weather_cache::error::Result;
use weather_cache::models::Coordinates;
use weather_cache::services::{ForecastCache, ForecastProvider, WeatherService};
use weather_cache::AppState;

// == Helper Functions ==

/// Upstream double that returns eight daily objects and counts requests.
struct ScriptedProvider {
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastProvider for ScriptedProvider {
    async fn daily_forecast(&self, _coords: &Coordinates, _time: Option<i64>) -> Result<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..8)
            .map(|i| json!({"time": 1556409600 + i * 86400, "summary": format!("day {i}")}))
            .collect())
    }
}

fn create_test_app_with_ttl(ttl_secs: u64, sweep_secs: u64) -> (Router, Arc<ScriptedProvider>) {
    let cache = Arc::new(ForecastCache::with_config(ttl_secs, sweep_secs));
    let provider = ScriptedProvider::new();
    let service = WeatherService::new(cache, provider.clone());
    (create_router(AppState::new(service)), provider)
}

fn create_test_app() -> (Router, Arc<ScriptedProvider>) {
    create_test_app_with_ttl(300, 1)
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Forecast Endpoint Tests ==

#[tokio::test]
async fn test_now_endpoint_returns_single_day() {
    let (app, _) = create_test_app();

    let response = get(app, "/weather/now/40.6405,-8.6538").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let days = json.as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["summary"], "day 0");
}

#[tokio::test]
async fn test_now_endpoint_invalid_coordinates() {
    let (app, _) = create_test_app();

    let response = get(app, "/weather/now/atlantis").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Invalid coordinates"));
}

#[tokio::test]
async fn test_recent_endpoint_returns_requested_days() {
    let (app, _) = create_test_app();

    let response = get(app, "/weather/recent/40.6405,-8.6538/3").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_recent_endpoint_clamps_day_count() {
    let (app, _) = create_test_app();

    let response = get(app, "/weather/recent/40.6405,-8.6538/99").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_period_endpoint_unparseable_dates() {
    let (app, _) = create_test_app();

    let response = get(app, "/weather/period/40.6405,-8.6538/yesterday,tomorrow").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Unable to parse date"));
}

#[tokio::test]
async fn test_period_endpoint_inverted_range() {
    let (app, _) = create_test_app();

    let response = get(app, "/weather/period/40.6405,-8.6538/2019-04-30,2019-04-28").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Invalid dates"));
}

// == Caching Behavior Tests ==

#[tokio::test]
async fn test_identical_requests_served_from_cache() {
    let (app, provider) = create_test_app();

    let first = get(app.clone(), "/weather/now/40.6405,-8.6538").await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = get(app, "/weather/now/40.6405,-8.6538").await;
    assert_eq!(second.status(), StatusCode::OK);

    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_different_locations_fetch_separately() {
    let (app, provider) = create_test_app();

    get(app.clone(), "/weather/now/40.6405,-8.6538").await;
    get(app, "/weather/now/38.7223,-9.1393").await;

    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_cached_endpoint_dumps_records() {
    let (app, _) = create_test_app();

    get(app.clone(), "/weather/now/40.6405,-8.6538").await;
    get(app.clone(), "/weather/recent/40.6405,-8.6538/2").await;

    let response = get(app, "/weather/cached").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 2);

    let keys: Vec<&str> = records
        .iter()
        .map(|r| r["key"].as_str().unwrap())
        .collect();
    assert!(keys.contains(&"40.6405,-8.6538,now"));
    assert!(keys.contains(&"40.6405,-8.6538,recent,2"));
}

#[tokio::test]
async fn test_cached_endpoint_empty_cache() {
    let (app, _) = create_test_app();

    let response = get(app, "/weather/cached").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_counts_lookups() {
    let (app, _) = create_test_app();

    // Miss then hit for the same key
    get(app.clone(), "/weather/now/40.6405,-8.6538").await;
    get(app.clone(), "/weather/now/40.6405,-8.6538").await;

    let response = get(app, "/weather/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"].as_u64().unwrap(), 1);
    assert_eq!(json["misses"].as_u64().unwrap(), 1);
    assert_eq!(json["total_entries"].as_u64().unwrap(), 1);
    assert!(json.get("hit_rate").is_some());
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == TTL Expiration via API Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let (app, provider) = create_test_app_with_ttl(1, 1);

    let response = get(app.clone(), "/weather/now/40.6405,-8.6538").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.calls(), 1);

    // Let the entry age past its TTL and get swept
    tokio::time::sleep(Duration::from_millis(2500)).await;

    let response = get(app.clone(), "/weather/cached").await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 0);

    let response = get(app.clone(), "/weather/stats").await;
    let json = body_to_json(response.into_body()).await;
    assert!(json["expirations"].as_u64().unwrap() >= 1);

    // The next identical request goes upstream again
    let response = get(app, "/weather/now/40.6405,-8.6538").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.calls(), 2);
}
