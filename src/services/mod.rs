//! Services Module
//!
//! The request-result layer sitting between the HTTP API and the cache: a
//! provider abstraction over the upstream forecast API and the weather
//! service that consults the cache before going upstream.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::Coordinates;

pub mod darksky;
mod weather;

pub use darksky::DarkSkyClient;
pub use weather::{ForecastCache, WeatherService};

// == Forecast Provider ==
/// Source of daily forecast data for a location.
///
/// `time` pins the request to a specific unix second (the upstream API then
/// answers for that day); `None` asks for the default multi-day forecast
/// starting today.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn daily_forecast(&self, coords: &Coordinates, time: Option<i64>) -> Result<Vec<Value>>;
}
