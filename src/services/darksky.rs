//! DarkSky Client
//!
//! Outbound HTTP client for the DarkSky-style forecast API. Builds the
//! per-request URL, unwraps the `daily.data` block of the payload, and
//! turns upstream error payloads into typed errors.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, WeatherError};
use crate::models::Coordinates;
use crate::services::ForecastProvider;

/// Report blocks this service never serves, excluded from every request.
const EXCLUDE_BLOCKS: &str = "exclude=currently,minutely,hourly,alerts,flags";

// == DarkSky Client ==
/// Reqwest-backed [`ForecastProvider`] for the DarkSky forecast API.
#[derive(Debug, Clone)]
pub struct DarkSkyClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl DarkSkyClient {
    /// Creates a client against an explicit endpoint and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Creates a client from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.darksky_base_url, &config.darksky_api_key)
    }

    /// Builds the forecast URL:
    /// `{base}/{key}/{lat},{lon}[,{time}]?exclude=...`
    fn forecast_url(&self, coords: &Coordinates, time: Option<i64>) -> String {
        let mut url = format!("{}/{}/{}", self.base_url, self.api_key, coords);
        if let Some(time) = time {
            url.push_str(&format!(",{time}"));
        }
        url.push('?');
        url.push_str(EXCLUDE_BLOCKS);
        url
    }
}

#[async_trait]
impl ForecastProvider for DarkSkyClient {
    async fn daily_forecast(&self, coords: &Coordinates, time: Option<i64>) -> Result<Vec<Value>> {
        let url = self.forecast_url(coords, time);
        debug!("Requesting upstream forecast: {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let payload: Value = response.json().await?;

        // The API reports its own failures inside the payload; check that
        // before the transport status.
        if let Some(message) = upstream_error(&payload) {
            return Err(WeatherError::UpstreamApi(message));
        }
        if !status.is_success() {
            return Err(WeatherError::UpstreamApi(format!(
                "upstream returned status {status}"
            )));
        }

        daily_data(payload)
    }
}

// == Payload Handling ==
/// Extracts the message of an error payload, if the payload is one.
fn upstream_error(payload: &Value) -> Option<String> {
    payload.get("error").map(|error| {
        error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string())
    })
}

/// Pulls the daily forecast array out of a successful payload.
fn daily_data(payload: Value) -> Result<Vec<Value>> {
    payload
        .pointer("/daily/data")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| WeatherError::UpstreamPayload("missing daily data".to_string()))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> DarkSkyClient {
        DarkSkyClient::new("https://api.darksky.net/forecast", "test-key")
    }

    fn aveiro() -> Coordinates {
        "40.6405,-8.6538".parse().unwrap()
    }

    #[test]
    fn test_forecast_url_without_time() {
        let url = client().forecast_url(&aveiro(), None);
        assert_eq!(
            url,
            "https://api.darksky.net/forecast/test-key/40.6405,-8.6538\
             ?exclude=currently,minutely,hourly,alerts,flags"
        );
    }

    #[test]
    fn test_forecast_url_with_time() {
        let url = client().forecast_url(&aveiro(), Some(1556652090));
        assert!(url.contains("/test-key/40.6405,-8.6538,1556652090?"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = DarkSkyClient::new("https://api.darksky.net/forecast/", "k");
        let url = client.forecast_url(&aveiro(), None);
        assert!(url.starts_with("https://api.darksky.net/forecast/k/"));
    }

    #[test]
    fn test_daily_data_extraction() {
        let payload = json!({
            "daily": {
                "data": [
                    {"time": 1556409600, "summary": "Light rain"},
                    {"time": 1556496000, "summary": "Clear"},
                ]
            }
        });

        let days = daily_data(payload).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0]["summary"], "Light rain");
    }

    #[test]
    fn test_daily_data_missing_block() {
        let payload = json!({"latitude": 40.6405});

        assert!(matches!(
            daily_data(payload),
            Err(WeatherError::UpstreamPayload(_))
        ));
    }

    #[test]
    fn test_upstream_error_detection() {
        let payload = json!({"code": 400, "error": "The given location is invalid."});

        assert_eq!(
            upstream_error(&payload).as_deref(),
            Some("The given location is invalid.")
        );
        assert_eq!(upstream_error(&json!({"daily": {}})), None);
    }
}
