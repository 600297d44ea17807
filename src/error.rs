//! Error types for the weather service
//!
//! Provides unified error handling using thiserror. Cache misses are never
//! errors anywhere in this crate; they surface as absent/empty results.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Weather Error Enum ==
/// Unified error type for the weather service.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Coordinates path segment could not be parsed or is out of range
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Date path segment could not be parsed
    #[error("Unable to parse date: {0}")]
    InvalidDate(String),

    /// Date range is inverted or starts beyond the forecast horizon
    #[error("Invalid dates: {0}")]
    InvalidDateRange(String),

    /// Transport-level failure talking to the upstream forecast API
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The upstream forecast API reported an error of its own
    #[error("Upstream API error: {0}")]
    UpstreamApi(String),

    /// The upstream response did not have the expected shape
    #[error("Unexpected upstream payload: {0}")]
    UpstreamPayload(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status = match &self {
            WeatherError::InvalidCoordinates(_)
            | WeatherError::InvalidDate(_)
            | WeatherError::InvalidDateRange(_) => StatusCode::BAD_REQUEST,
            WeatherError::Upstream(_)
            | WeatherError::UpstreamApi(_)
            | WeatherError::UpstreamPayload(_) => StatusCode::BAD_GATEWAY,
            WeatherError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the weather service.
pub type Result<T> = std::result::Result<T, WeatherError>;
