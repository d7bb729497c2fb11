//! Application state - single source of truth
//!
//! Only the reducer mutates this. Components receive `&AppState` as props.

use ratatui::layout::Rect;
use weathermap_core::{GeoPoint, WeatherReport};

/// The open weather popup
///
/// `point` is the coordinate the popup describes; the popup exists exactly
/// while that coordinate is the active one, so "visible" and "active
/// coordinates set" cannot disagree.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherPopup {
    pub point: GeoPoint,
    pub report: WeatherReport,
    /// Screen placement, filled in once the point has been projected
    pub area: Option<Rect>,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    /// Current contents of the search input
    pub search_query: String,

    /// A geocoding request is outstanding (search control disabled)
    pub search_in_flight: bool,

    /// A weather request is outstanding
    pub weather_in_flight: bool,

    /// Open popup, if any
    pub popup: Option<WeatherPopup>,

    /// Last position reported by pointer movement over the map
    pub last_cursor: Option<GeoPoint>,

    /// Point shown in the coordinate readout
    pub readout: Option<GeoPoint>,

    /// Message in the error notification
    pub error: Option<String>,

    /// Terminal dimensions (for popup placement)
    pub terminal_size: (u16, u16),
}

impl AppState {
    pub fn new(terminal_size: (u16, u16)) -> Self {
        Self {
            search_query: String::new(),
            search_in_flight: false,
            weather_in_flight: false,
            popup: None,
            last_cursor: None,
            readout: None,
            error: None,
            terminal_size,
        }
    }

    /// Loading indicator visibility
    pub fn is_loading(&self) -> bool {
        self.search_in_flight || self.weather_in_flight
    }

    pub fn can_search(&self) -> bool {
        !self.search_in_flight
    }

    pub fn popup_visible(&self) -> bool {
        self.popup.is_some()
    }

    /// Coordinates the open popup describes
    pub fn active_marker_coords(&self) -> Option<GeoPoint> {
        self.popup.as_ref().map(|popup| popup.point)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new((80, 24))
    }
}
