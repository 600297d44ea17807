//! API Module
//!
//! HTTP handlers and routing for the weather REST API.
//!
//! # Endpoints
//! - `GET /weather/now/:coords` - Today's forecast for a location
//! - `GET /weather/recent/:coords/:days` - Forecasts for the next 1..=7 days
//! - `GET /weather/period/:coords/:range` - Forecasts for a date window
//! - `GET /weather/cached` - Dump of all cached records
//! - `GET /weather/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
