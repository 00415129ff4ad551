//! Weather Lookup collaborator: city → location, then location + day → forecast.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A location descriptor returned by the search-by-name call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location_type: Option<String>,
    pub woeid: i64,
    #[serde(default)]
    pub latt_long: Option<String>,
}

/// One forecast entry. The upstream service is loose about which fields it sends,
/// so every field is optional and absent ones are not echoed back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_state_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_state_abbr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction_compass: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicable_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub the_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_pressure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictability: Option<f64>,
}

/// Calendar day of a flight, normalized to UTC and split into the zero-padded
/// components used by the forecast path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastDate {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl ForecastDate {
    pub fn from_datetime<Tz: TimeZone>(date: &DateTime<Tz>) -> Self {
        let utc = date.with_timezone(&Utc);
        Self {
            year: format!("{:04}", utc.year()),
            month: format!("{:02}", utc.month()),
            day: format!("{:02}", utc.day()),
        }
    }

    /// `YYYY/MM/DD`
    pub fn path(&self) -> String {
        format!("{}/{}/{}", self.year, self.month, self.day)
    }
}

impl fmt::Display for ForecastDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Weather lookup request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },
    #[error("Weather lookup request to {endpoint} timed out")]
    Timeout { endpoint: String },
    #[error("Weather lookup {endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("Weather lookup {endpoint} returned an unexpected body: {message}")]
    Decode { endpoint: String, message: String },
    #[error("No location found for city '{0}'")]
    LocationNotFound(String),
}

#[async_trait]
pub trait WeatherLookup: Send + Sync {
    /// Free-text location search. May legitimately return an empty list.
    async fn search_location(&self, city: &str) -> Result<Vec<Location>, UpstreamError>;

    /// Forecast entries for one location on one calendar day.
    async fn forecast(&self, woeid: i64, date: &ForecastDate) -> Result<Vec<Weather>, UpstreamError>;
}
