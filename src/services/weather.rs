//! Weather Service
//!
//! Answers forecast requests by consulting the cache first and only going
//! upstream on a miss. Each logical request maps to one deterministic cache
//! key; repeated identical requests inside the TTL window never leave the
//! process.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{CacheStats, TtlCache};
use crate::error::{Result, WeatherError};
use crate::models::{Coordinates, ForecastKind, ForecastRecord, SECONDS_PER_DAY};
use crate::services::ForecastProvider;

/// The cache specialization holding request results.
pub type ForecastCache = TtlCache<String, ForecastRecord>;

// == Weather Service ==
/// Forecast provider with a read-through TTL cache in front.
pub struct WeatherService {
    cache: Arc<ForecastCache>,
    provider: Arc<dyn ForecastProvider>,
}

impl WeatherService {
    /// Creates a service over an explicit cache handle and provider.
    pub fn new(cache: Arc<ForecastCache>, provider: Arc<dyn ForecastProvider>) -> Self {
        Self { cache, provider }
    }

    // == Forecast ==
    /// Returns the daily forecast objects for a request, from cache when a
    /// record for the same key is present, otherwise fetched upstream and
    /// cached under that key.
    pub async fn forecast(&self, coords: &Coordinates, kind: ForecastKind) -> Result<Vec<Value>> {
        let key = kind.cache_key(coords);

        if let Some(record) = self.cache.get(&key).await {
            debug!("Serving '{}' from cache", key);
            return Ok(record.days);
        }

        let days = self.fetch(coords, kind).await?;
        info!("Caching {} forecast day(s) under '{}'", days.len(), key);
        self.cache
            .put(key.clone(), ForecastRecord::new(key, days.clone()))
            .await;

        Ok(days)
    }

    /// One upstream round per request kind:
    /// - `Now` pins a single request to the current unix time,
    /// - `Recent` issues one un-pinned request and keeps the first `days`,
    /// - `Period` walks the window a day at a time, one request per day.
    async fn fetch(&self, coords: &Coordinates, kind: ForecastKind) -> Result<Vec<Value>> {
        match kind {
            ForecastKind::Now => {
                let now = Utc::now().timestamp();
                let days = self.provider.daily_forecast(coords, Some(now)).await?;
                Ok(vec![first_day(days)?])
            }
            ForecastKind::Recent { days } => {
                let mut fetched = self.provider.daily_forecast(coords, None).await?;
                fetched.truncate(days as usize);
                Ok(fetched)
            }
            ForecastKind::Period { start, end } => {
                let mut requested = Vec::new();
                let mut current = start;
                while current <= end {
                    let days = self.provider.daily_forecast(coords, Some(current)).await?;
                    requested.push(first_day(days)?);
                    current += SECONDS_PER_DAY;
                }
                Ok(requested)
            }
        }
    }

    // == Cache Dump ==
    /// Returns every currently cached record, for the diagnostics endpoint.
    ///
    /// When `update_last_accessed` is true the dump counts as a read and
    /// extends every record's life.
    pub async fn cached_forecasts(&self, update_last_accessed: bool) -> Vec<ForecastRecord> {
        self.cache.get_all(update_last_accessed).await
    }

    // == Stats ==
    /// Current statistics of the underlying cache.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    // == Shutdown ==
    /// Stops the cache's background sweeper; used on graceful shutdown.
    pub fn shutdown(&self) {
        self.cache.shutdown();
    }
}

fn first_day(mut days: Vec<Value>) -> Result<Value> {
    if days.is_empty() {
        return Err(WeatherError::UpstreamPayload("empty daily data".to_string()));
    }
    Ok(days.swap_remove(0))
}
