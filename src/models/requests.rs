//! Request types for the weather API
//!
//! Path-segment parsing and validation for coordinates, date ranges, and
//! the forecast request kinds, plus the deterministic cache-key scheme.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};

use crate::error::WeatherError;

// == Limits ==
/// Maximum number of days a "recent" forecast may cover
pub const MAX_FORECAST_DAYS: u32 = 7;

/// How far into the future a period request may start, in days
pub const FORECAST_HORIZON_DAYS: i64 = 6;

/// One day in seconds, the step used when walking a period window
pub const SECONDS_PER_DAY: i64 = 86_400;

// == Coordinates ==
/// A location as latitude/longitude, parsed from a `"lat,lon"` path segment.
///
/// The `Display` form is exactly `"lat,lon"` and doubles as the location
/// part of cache keys, so it must stay deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl FromStr for Coordinates {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WeatherError::InvalidCoordinates(s.to_string());

        let (lat, lon) = s.split_once(',').ok_or_else(|| invalid())?;
        let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid());
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

// == Date Range ==
/// An inclusive date window, parsed from a `"yyyy-mm-dd,yyyy-mm-dd"` path
/// segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FromStr for DateRange {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(',')
            .ok_or_else(|| WeatherError::InvalidDate(s.to_string()))?;

        let parse = |text: &str| {
            NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .map_err(|_| WeatherError::InvalidDate(text.to_string()))
        };

        Ok(Self {
            start: parse(start)?,
            end: parse(end)?,
        })
    }
}

impl DateRange {
    /// Converts the range into inclusive unix-second bounds (UTC midnight),
    /// validated against the forecast horizon.
    ///
    /// A window that is inverted or starts beyond the horizon is rejected;
    /// an end beyond the horizon is silently clamped to it, matching the
    /// original endpoint contract.
    pub fn to_window(&self, now_secs: i64) -> Result<(i64, i64), WeatherError> {
        let max_time = now_secs + FORECAST_HORIZON_DAYS * SECONDS_PER_DAY;
        let start = unix_midnight(self.start);
        let end = unix_midnight(self.end);

        if start > max_time || start > end {
            return Err(WeatherError::InvalidDateRange(format!(
                "{} to {}",
                self.start, self.end
            )));
        }

        Ok((start, end.min(max_time)))
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

// == Forecast Kind ==
/// The three shapes of forecast request the service answers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForecastKind {
    /// Today's forecast
    Now,
    /// The next `days` daily forecasts, starting today
    Recent { days: u32 },
    /// One daily forecast per day in an inclusive unix-second window
    Period { start: i64, end: i64 },
}

impl ForecastKind {
    /// Composes the deterministic cache key for this request:
    /// `"lat,lon,kind"` plus the disambiguating parameters of the kind.
    pub fn cache_key(&self, coords: &Coordinates) -> String {
        match self {
            ForecastKind::Now => format!("{coords},now"),
            ForecastKind::Recent { days } => format!("{coords},recent,{days}"),
            ForecastKind::Period { start, end } => {
                format!("{coords},period,{start},{end}")
            }
        }
    }
}
