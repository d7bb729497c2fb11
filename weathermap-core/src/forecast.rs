//! Current conditions: coordinates -> weather snapshot
//!
//! Uses the Open-Meteo forecast API, which needs no API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ServiceEndpoints;
use crate::error::{LookupError, Service};
use crate::types::{GeoPoint, WeatherSnapshot};

/// Fields requested from the `current` block, in request order
pub const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m,surface_pressure";

/// Fetches the current conditions for a point
///
/// Coordinates are assumed valid (they come from the map); no clamping is done.
#[async_trait]
pub trait WeatherClient: Send + Sync {
    async fn fetch_current(&self, point: GeoPoint) -> Result<WeatherSnapshot, LookupError>;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Current,
    timezone: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: i32,
    wind_speed_10m: f64,
    surface_pressure: f64,
}

impl From<ForecastResponse> for WeatherSnapshot {
    fn from(response: ForecastResponse) -> Self {
        let current = response.current;
        WeatherSnapshot {
            temperature_c: current.temperature_2m,
            feels_like_c: current.apparent_temperature,
            humidity_pct: current.relative_humidity_2m,
            wind_speed_kmh: current.wind_speed_10m,
            pressure_hpa: current.surface_pressure,
            condition_code: current.weather_code,
            timezone: response.timezone,
        }
    }
}

pub struct OpenMeteoClient {
    http: Client,
    endpoint: String,
}

impl OpenMeteoClient {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self, LookupError> {
        let http = endpoints
            .http_client()
            .map_err(LookupError::transport(Service::Weather))?;
        Ok(Self::with_client(http, &endpoints.forecast_url))
    }

    pub fn with_client(http: Client, endpoint: &str) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    async fn fetch_current(&self, point: GeoPoint) -> Result<WeatherSnapshot, LookupError> {
        tracing::debug!(lat = point.lat, lon = point.lon, "Weather request");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("latitude", point.lat.to_string()),
                ("longitude", point.lon.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(LookupError::transport(Service::Weather))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Weather service returned an error status");
            return Err(LookupError::Status {
                service: Service::Weather,
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(LookupError::transport(Service::Weather))?;
        let data: ForecastResponse =
            serde_json::from_slice(&body).map_err(|e| LookupError::payload(Service::Weather, e))?;

        Ok(data.into())
    }
}
