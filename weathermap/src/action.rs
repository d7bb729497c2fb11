//! Everything the controller reacts to
//!
//! Naming follows a simple convention:
//! - A prefix names the flow: `Search*`, `Weather*`, `Map*`, `Popup*`, `Error*`, `Ui*`
//! - `Did` marks the result of an async task (`SearchDidResolve`, `WeatherDidFail`)
//! - Everything else is a user intent coming from an event source

use ratatui::layout::Rect;
use weathermap_core::{GeoPoint, GeocodeResult, WeatherSnapshot};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // ===== Search =====
    /// The search input changed
    SearchQueryChange(String),

    /// Intent: search for the given text (Enter or the search control)
    SearchSubmit(String),

    /// Result: the geocoder found a match
    SearchDidResolve(GeocodeResult),

    /// Result: the search failed (not found, service or transport error)
    SearchDidFail(String),

    // ===== Map =====
    /// Intent: show the weather at a clicked point
    MapClick(GeoPoint),

    /// The pointer moved over the map
    MapCursorMove(GeoPoint),

    /// Intent: zoom the map by whole levels (positive zooms in)
    MapZoom(i8),

    // ===== Weather =====
    /// Result: current conditions arrived for a clicked point
    WeatherDidLoad {
        point: GeoPoint,
        snapshot: WeatherSnapshot,
    },

    /// Result: the weather lookup for a clicked point failed
    WeatherDidFail { point: GeoPoint, message: String },

    // ===== Popup =====
    /// The popup for `point` has been placed on screen
    PopupPlace { point: GeoPoint, area: Rect },

    /// Intent: close the popup (close control or Esc)
    PopupDismiss,

    // ===== Error notification =====
    /// Hide the error notification (timer expiry or click)
    ErrorDismiss,

    // ===== UI =====
    /// Terminal was resized
    UiTerminalResize(u16, u16),

    /// Exit the application
    Quit,
}

impl Action {
    /// Action name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Action::SearchQueryChange(_) => "SearchQueryChange",
            Action::SearchSubmit(_) => "SearchSubmit",
            Action::SearchDidResolve(_) => "SearchDidResolve",
            Action::SearchDidFail(_) => "SearchDidFail",
            Action::MapClick(_) => "MapClick",
            Action::MapCursorMove(_) => "MapCursorMove",
            Action::MapZoom(_) => "MapZoom",
            Action::WeatherDidLoad { .. } => "WeatherDidLoad",
            Action::WeatherDidFail { .. } => "WeatherDidFail",
            Action::PopupPlace { .. } => "PopupPlace",
            Action::PopupDismiss => "PopupDismiss",
            Action::ErrorDismiss => "ErrorDismiss",
            Action::UiTerminalResize(..) => "UiTerminalResize",
            Action::Quit => "Quit",
        }
    }

    /// Concise one-line description for the action log
    ///
    /// Shows the interesting numbers instead of full Debug output.
    pub fn summary(&self) -> String {
        match self {
            Action::SearchDidResolve(result) => {
                format!("SearchDidResolve {{ {} at {} }}", result.display_name, result.point)
            }
            Action::WeatherDidLoad { point, snapshot } => format!(
                "WeatherDidLoad {{ {}, temp: {:.1}°C, code: {} }}",
                point, snapshot.temperature_c, snapshot.condition_code
            ),
            Action::SearchDidFail(msg) | Action::WeatherDidFail { message: msg, .. } => {
                let msg = if msg.chars().count() > 40 {
                    format!("{}...", msg.chars().take(37).collect::<String>())
                } else {
                    msg.clone()
                };
                format!("{}({:?})", self.name(), msg)
            }
            _ => format!("{:?}", self),
        }
    }

    /// True for the results of async tasks
    pub fn is_async_result(&self) -> bool {
        matches!(
            self,
            Action::SearchDidResolve(_)
                | Action::SearchDidFail(_)
                | Action::WeatherDidLoad { .. }
                | Action::WeatherDidFail { .. }
        )
    }
}
