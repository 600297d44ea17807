//! Configuration Module
//!
//! Handles loading and managing server configuration from environment
//! variables.

use std::env;

use crate::cache::{DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_TIME_TO_LIVE_SECS};

/// Default upstream forecast API endpoint
pub const DEFAULT_DARKSKY_BASE_URL: &str = "https://api.darksky.net/forecast";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Cache entry lifetime in seconds; 0 disables automatic expiry
    pub time_to_live: u64,
    /// Sweep interval in seconds; 0 disables automatic expiry
    pub sweep_interval: u64,
    /// API key for the upstream forecast service
    pub darksky_api_key: String,
    /// Base URL of the upstream forecast service
    pub darksky_base_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CACHE_TTL` - Entry lifetime in seconds (default: 10)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `DARKSKY_API_KEY` - Upstream API key (default: empty)
    /// - `DARKSKY_BASE_URL` - Upstream endpoint (default: DarkSky forecast API)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            time_to_live: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIME_TO_LIVE_SECS),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
            darksky_api_key: env::var("DARKSKY_API_KEY").unwrap_or_default(),
            darksky_base_url: env::var("DARKSKY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DARKSKY_BASE_URL.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            time_to_live: DEFAULT_TIME_TO_LIVE_SECS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL_SECS,
            darksky_api_key: String::new(),
            darksky_base_url: DEFAULT_DARKSKY_BASE_URL.to_string(),
        }
    }
}
