//! Place search: free text -> coordinates
//!
//! Uses the Nominatim search API (OpenStreetMap), which needs no API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ServiceEndpoints;
use crate::error::{LookupError, Service};
use crate::types::{GeoPoint, GeocodeResult};

/// Resolves a place name to its single best match
///
/// Callers must reject empty queries themselves; implementations do not
/// validate input and issue exactly one request per call.
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<GeocodeResult, LookupError>;
}

/// One entry of the Nominatim search response
///
/// Nominatim encodes coordinates as numeric strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

pub struct NominatimClient {
    http: Client,
    endpoint: String,
}

impl NominatimClient {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self, LookupError> {
        let http = endpoints
            .http_client()
            .map_err(LookupError::transport(Service::Geocoding))?;
        Ok(Self::with_client(http, &endpoints.geocoding_url))
    }

    pub fn with_client(http: Client, endpoint: &str) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl GeocodingClient for NominatimClient {
    async fn resolve(&self, query: &str) -> Result<GeocodeResult, LookupError> {
        tracing::debug!(query, "Geocoding request");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(LookupError::transport(Service::Geocoding))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Geocoding service returned an error status");
            return Err(LookupError::Status {
                service: Service::Geocoding,
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(LookupError::transport(Service::Geocoding))?;
        let places: Vec<Place> = serde_json::from_slice(&body)
            .map_err(|e| LookupError::payload(Service::Geocoding, e))?;

        let place = places.into_iter().next().ok_or(LookupError::NotFound)?;
        parse_place(place, query)
    }
}

fn parse_place(place: Place, query: &str) -> Result<GeocodeResult, LookupError> {
    let lat: f64 = place
        .lat
        .trim()
        .parse()
        .map_err(|_| LookupError::payload(Service::Geocoding, format!("bad latitude {:?}", place.lat)))?;
    let lon: f64 = place
        .lon
        .trim()
        .parse()
        .map_err(|_| LookupError::payload(Service::Geocoding, format!("bad longitude {:?}", place.lon)))?;

    // Fall back to what the user typed when the service omits a name
    let display_name = place
        .display_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| query.to_string());

    Ok(GeocodeResult {
        point: GeoPoint::new(lat, lon),
        display_name,
    })
}
