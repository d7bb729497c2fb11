//! Value types shared by the clients, the presenter and the controller

use std::fmt;

/// A geographic point in decimal degrees
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Best match for a place search
#[derive(Clone, Debug, PartialEq)]
pub struct GeocodeResult {
    pub point: GeoPoint,
    pub display_name: String,
}

/// Current conditions at a point, as reported by the forecast service
///
/// Measurements are kept exactly as received. `humidity_pct` and `pressure_hpa`
/// stay fractional here and are only rounded to whole numbers for display.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_kmh: f64,
    pub pressure_hpa: f64,
    /// WMO weather interpretation code
    pub condition_code: i32,
    /// Timezone detected by the service
    pub timezone: String,
}
