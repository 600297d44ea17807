//! Request and Response models for the weather API
//!
//! This module defines the parsed request types (coordinates, date ranges,
//! forecast kinds) and the DTOs used for serializing HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    Coordinates, DateRange, ForecastKind, FORECAST_HORIZON_DAYS, MAX_FORECAST_DAYS,
    SECONDS_PER_DAY,
};
pub use responses::{ErrorResponse, ForecastRecord, HealthResponse, StatsResponse};
