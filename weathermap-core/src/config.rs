//! Service endpoint configuration

/// Public search endpoint (OpenStreetMap Nominatim)
pub const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Public forecast endpoint (Open-Meteo)
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Nominatim's usage policy requires an identifying user agent
pub const DEFAULT_USER_AGENT: &str = concat!("weathermap/", env!("CARGO_PKG_VERSION"));

/// Where the two clients send their requests
///
/// Neither service needs credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub user_agent: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.into(),
            forecast_url: DEFAULT_FORECAST_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

impl ServiceEndpoints {
    /// Point both clients at a single base URL (mock servers in tests)
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            geocoding_url: format!("{base}/search"),
            forecast_url: format!("{base}/v1/forecast"),
            ..Self::default()
        }
    }

    pub(crate) fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .build()
    }
}
