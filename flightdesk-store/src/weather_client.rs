use async_trait::async_trait;
use flightdesk_core::weather::{ForecastDate, Location, UpstreamError, Weather, WeatherLookup};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::app_config::WeatherConfig;

/// HTTP client for the MetaWeather-style location and forecast API.
#[derive(Clone)]
pub struct MetaWeatherClient {
    http: Client,
    base_url: String,
}

impl MetaWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Weather lookup {} returned {}", path, status);
            return Err(UpstreamError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| transport_error(path, e))?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }
}

fn transport_error(endpoint: &str, err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        UpstreamError::Request {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl WeatherLookup for MetaWeatherClient {
    async fn search_location(&self, city: &str) -> Result<Vec<Location>, UpstreamError> {
        debug!("GET location search for '{}'", city);
        self.get_json("/api/location/search/", &[("query", city)]).await
    }

    async fn forecast(&self, woeid: i64, date: &ForecastDate) -> Result<Vec<Weather>, UpstreamError> {
        let path = format!("/api/location/{}/{}/", woeid, date.path());
        debug!("GET forecast {}", path);
        self.get_json(&path, &[]).await
    }
}
