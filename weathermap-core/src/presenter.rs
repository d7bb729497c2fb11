//! Display rules for weather snapshots
//!
//! Everything that turns raw measurements into text lives here so the popup,
//! the readout and the logs format numbers the same way.

use crate::types::{GeoPoint, WeatherSnapshot};

/// Icon family for a weather condition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconKey {
    Sun,
    CloudSun,
    Cloud,
    CloudRain,
    Snowflake,
    CloudLightning,
}

/// Human-readable condition for a WMO code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConditionInfo {
    pub description: &'static str,
    pub icon: IconKey,
}

struct Condition {
    code: i32,
    description: &'static str,
    icon: IconKey,
    emoji: &'static str,
}

const fn row(code: i32, description: &'static str, icon: IconKey, emoji: &'static str) -> Condition {
    Condition {
        code,
        description,
        icon,
        emoji,
    }
}

const CONDITIONS: &[Condition] = &[
    row(0, "Clear sky", IconKey::Sun, "☀️"),
    row(1, "Mainly clear", IconKey::Sun, "🌤️"),
    row(2, "Partly cloudy", IconKey::CloudSun, "⛅"),
    row(3, "Overcast", IconKey::Cloud, "☁️"),
    row(45, "Foggy", IconKey::Cloud, "🌫️"),
    row(48, "Depositing rime fog", IconKey::Cloud, "🌫️"),
    row(51, "Light drizzle", IconKey::CloudRain, "🌦️"),
    row(53, "Moderate drizzle", IconKey::CloudRain, "🌦️"),
    row(55, "Dense drizzle", IconKey::CloudRain, "🌧️"),
    row(61, "Slight rain", IconKey::CloudRain, "🌧️"),
    row(63, "Moderate rain", IconKey::CloudRain, "🌧️"),
    row(65, "Heavy rain", IconKey::CloudRain, "🌧️"),
    row(71, "Slight snow", IconKey::Snowflake, "🌨️"),
    row(73, "Moderate snow", IconKey::Snowflake, "❄️"),
    row(75, "Heavy snow", IconKey::Snowflake, "❄️"),
    row(80, "Rain showers", IconKey::CloudRain, "🌦️"),
    row(81, "Moderate showers", IconKey::CloudRain, "🌧️"),
    row(82, "Violent showers", IconKey::CloudRain, "⛈️"),
    row(95, "Thunderstorm", IconKey::CloudLightning, "⛈️"),
    row(96, "Thunderstorm with hail", IconKey::CloudLightning, "⛈️"),
    row(99, "Severe thunderstorm", IconKey::CloudLightning, "⛈️"),
];

/// Returned for codes missing from the table
pub const UNKNOWN_CONDITION: ConditionInfo = ConditionInfo {
    description: "Unknown",
    icon: IconKey::Cloud,
};

pub const UNKNOWN_EMOJI: &str = "❓";

fn lookup(code: i32) -> Option<&'static Condition> {
    CONDITIONS.iter().find(|c| c.code == code)
}

/// Describe a WMO weather code. Total: unknown codes get [`UNKNOWN_CONDITION`].
pub fn describe(code: i32) -> ConditionInfo {
    lookup(code)
        .map(|c| ConditionInfo {
            description: c.description,
            icon: c.icon,
        })
        .unwrap_or(UNKNOWN_CONDITION)
}

pub fn condition_emoji(code: i32) -> &'static str {
    lookup(code).map(|c| c.emoji).unwrap_or(UNKNOWN_EMOJI)
}

/// Round half up, the way browsers round for display (-2.5 -> -2)
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", round_half_up(celsius))
}

pub fn format_pressure(hpa: f64) -> String {
    format!("{} hPa", round_half_up(hpa))
}

pub fn format_humidity(pct: f64) -> String {
    format!("{}%", round_half_up(pct))
}

pub fn format_wind_speed(kmh: f64) -> String {
    format!("{kmh:.1} km/h")
}

pub fn format_coord(degrees: f64) -> String {
    format!("{degrees:.4}")
}

/// Coordinate readout line, e.g. `Lat: 35.6892, Lon: 51.3890`
pub fn format_readout(point: GeoPoint) -> String {
    format!(
        "Lat: {}, Lon: {}",
        format_coord(point.lat),
        format_coord(point.lon)
    )
}

/// Display-ready view of a snapshot taken at `point`
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReport {
    pub emoji: &'static str,
    pub temperature: String,
    pub condition: ConditionInfo,
    pub timezone: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub coordinates: String,
}

impl WeatherReport {
    pub fn new(snapshot: &WeatherSnapshot, point: GeoPoint) -> Self {
        Self {
            emoji: condition_emoji(snapshot.condition_code),
            temperature: format_temperature(snapshot.temperature_c),
            condition: describe(snapshot.condition_code),
            timezone: snapshot.timezone.clone(),
            feels_like: format_temperature(snapshot.feels_like_c),
            humidity: format_humidity(snapshot.humidity_pct),
            wind_speed: format_wind_speed(snapshot.wind_speed_kmh),
            pressure: format_pressure(snapshot.pressure_hpa),
            coordinates: format!(
                "{}°, {}°",
                format_coord(point.lat),
                format_coord(point.lon)
            ),
        }
    }

    /// Label/value pairs for the detail grid
    pub fn details(&self) -> [(&'static str, &str); 4] {
        [
            ("Feels Like", self.feels_like.as_str()),
            ("Humidity", self.humidity.as_str()),
            ("Wind Speed", self.wind_speed.as_str()),
            ("Pressure", self.pressure.as_str()),
        ]
    }
}
