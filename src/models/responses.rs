//! Response DTOs for the weather API
//!
//! Defines the structure of outgoing HTTP response bodies, plus the record
//! type the cache stores for each answered request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::CacheStats;

// == Forecast Record ==
/// One cached request result: the key it was stored under and the daily
/// forecast objects the upstream API returned for it.
///
/// This is the value type `V` the cache holds; the diagnostics endpoint
/// serializes it as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// The cache key the record was stored under
    pub key: String,
    /// Daily forecast objects, passed through from the upstream payload
    pub days: Vec<Value>,
}

impl ForecastRecord {
    /// Creates a new ForecastRecord.
    pub fn new(key: impl Into<String>, days: Vec<Value>) -> Self {
        Self {
            key: key.into(),
            days,
        }
    }
}

// == Stats Response ==
/// Response body for the stats endpoint (GET /weather/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries removed by the sweeper
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

// == Health Response ==
/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// == Error Response ==
/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
