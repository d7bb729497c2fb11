//! Reducer - the interaction state machine
//!
//! `fn(&mut AppState, Action) -> DispatchResult<Effect>`
//! - All state mutations happen here
//! - Side effects are returned, never performed
//!
//! Two independent flows run through it:
//! - **Search**: submit -> geocode -> marker + fly-to, or error
//! - **Weather**: click -> fetch -> popup, or error
//!
//! Overlapping weather fetches are not cancelled; whichever result is
//! dispatched last wins, regardless of click order.

use weathermap_core::{LookupError, WeatherReport};

use crate::action::Action;
use crate::effect::{DispatchResult, Effect};
use crate::state::{AppState, WeatherPopup};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Search =====
        Action::SearchQueryChange(query) => {
            if state.search_query == query {
                return DispatchResult::unchanged();
            }
            state.search_query = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit(raw) => {
            if state.search_in_flight {
                tracing::debug!("Search already in flight, submission ignored");
                return DispatchResult::unchanged();
            }

            let query = raw.trim();
            if query.is_empty() {
                return show_error(state, LookupError::EmptyQuery.to_string());
            }

            state.search_in_flight = true;
            state.popup = None;
            DispatchResult::changed_with(Effect::Geocode {
                query: query.to_string(),
            })
        }

        Action::SearchDidResolve(result) => {
            tracing::info!(
                name = %result.display_name,
                lat = result.point.lat,
                lon = result.point.lon,
                "Found location"
            );
            state.search_in_flight = false;
            state.readout = Some(result.point);
            DispatchResult::changed_with_many(vec![
                Effect::PlaceMarker {
                    point: result.point,
                },
                Effect::FlyTo {
                    point: result.point,
                },
            ])
        }

        Action::SearchDidFail(message) => {
            tracing::warn!(%message, "Search failed");
            state.search_in_flight = false;
            show_error(state, message)
        }

        // ===== Map =====
        Action::MapClick(point) => {
            state.weather_in_flight = true;
            DispatchResult::changed_with(Effect::FetchWeather { point })
        }

        Action::MapCursorMove(point) => {
            state.last_cursor = Some(point);
            state.readout = Some(point);
            DispatchResult::changed()
        }

        Action::MapZoom(0) => DispatchResult::unchanged(),
        Action::MapZoom(delta) => DispatchResult::unchanged().with(Effect::ZoomMap { delta }),

        // ===== Weather =====
        Action::WeatherDidLoad { point, snapshot } => {
            state.weather_in_flight = false;
            state.popup = Some(WeatherPopup {
                point,
                report: WeatherReport::new(&snapshot, point),
                area: None,
            });
            state.readout = Some(point);
            DispatchResult::changed_with(Effect::PositionPopup { point })
        }

        Action::WeatherDidFail { point, message } => {
            tracing::warn!(%message, %point, "Weather lookup failed");
            state.weather_in_flight = false;
            state.popup = None;
            show_error(state, message)
        }

        // ===== Popup =====
        Action::PopupPlace { point, area } => match state.popup.as_mut() {
            // Placement for a popup that has since been replaced or closed is stale
            Some(popup) if popup.point == point => {
                popup.area = Some(area);
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::PopupDismiss => {
            if state.popup.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Error notification =====
        Action::ErrorDismiss => {
            if state.error.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== UI =====
        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            match state.active_marker_coords() {
                Some(point) => DispatchResult::changed_with(Effect::PositionPopup { point }),
                None => DispatchResult::changed(),
            }
        }

        // Quit is handled by the runtime
        Action::Quit => DispatchResult::unchanged(),
    }
}

fn show_error(state: &mut AppState, message: String) -> DispatchResult<Effect> {
    state.error = Some(message);
    DispatchResult::changed_with(Effect::ExpireError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;
    use weathermap_core::{GeoPoint, GeocodeResult, WeatherSnapshot};

    use crate::{assert_emitted, assert_not_emitted};

    fn snapshot(temp: f64, code: i32) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: temp,
            feels_like_c: temp,
            humidity_pct: 50.0,
            wind_speed_kmh: 10.0,
            pressure_hpa: 1013.0,
            condition_code: code,
            timezone: "UTC".into(),
        }
    }

    fn open_popup(state: &mut AppState, point: GeoPoint) {
        reducer(
            state,
            Action::WeatherDidLoad {
                point,
                snapshot: snapshot(20.0, 0),
            },
        );
    }

    #[test]
    fn test_blank_query_is_rejected_without_request() {
        for query in ["", "   ", "\t\n"] {
            let mut state = AppState::default();
            let result = reducer(&mut state, Action::SearchSubmit(query.into()));

            assert_not_emitted!(result.effects, Effect::Geocode { .. });
            assert_emitted!(result.effects, Effect::ExpireError);
            assert!(!state.search_in_flight);
            assert_eq!(
                state.error.as_deref(),
                Some("Please enter a location to search.")
            );
        }
    }

    #[test]
    fn test_submit_trims_and_hides_popup() {
        let mut state = AppState::default();
        open_popup(&mut state, GeoPoint::new(1.0, 1.0));

        let result = reducer(&mut state, Action::SearchSubmit("  Paris ".into()));

        assert!(result.changed);
        assert_eq!(
            result.effects,
            vec![Effect::Geocode {
                query: "Paris".into()
            }]
        );
        assert!(state.search_in_flight);
        assert!(state.is_loading());
        assert!(!state.can_search());
        assert!(!state.popup_visible());
        assert_eq!(state.active_marker_coords(), None);
    }

    #[test]
    fn test_submit_while_searching_is_ignored() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit("Paris".into()));

        let result = reducer(&mut state, Action::SearchSubmit("Rome".into()));

        assert!(!result.changed);
        assert!(!result.has_effects());
    }

    #[test]
    fn test_search_resolve_places_marker_and_flies() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit("Paris".into()));

        let point = GeoPoint::new(48.8566, 2.3522);
        let result = reducer(
            &mut state,
            Action::SearchDidResolve(GeocodeResult {
                point,
                display_name: "Paris, France".into(),
            }),
        );

        assert_emitted!(result.effects, Effect::PlaceMarker { point: p } if *p == point);
        assert_emitted!(result.effects, Effect::FlyTo { point: p } if *p == point);
        assert!(!state.is_loading());
        assert!(state.can_search());
        assert_eq!(state.readout, Some(point));
    }

    #[test]
    fn test_search_failure_restores_controls() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit("zzzqqqnotaplace".into()));

        let result = reducer(&mut state, Action::SearchDidFail("Location not found.".into()));

        assert_not_emitted!(result.effects, Effect::PlaceMarker { .. });
        assert_emitted!(result.effects, Effect::ExpireError);
        assert!(!state.is_loading());
        assert!(state.can_search());
        assert_eq!(state.error.as_deref(), Some("Location not found."));
    }

    #[test]
    fn test_click_sets_loading_and_fetches() {
        let mut state = AppState::default();
        let point = GeoPoint::new(40.0, -3.0);

        let result = reducer(&mut state, Action::MapClick(point));

        assert_eq!(result.effects, vec![Effect::FetchWeather { point }]);
        assert!(state.weather_in_flight);
        assert!(state.is_loading());
    }

    #[test]
    fn test_weather_load_opens_popup() {
        let mut state = AppState::default();
        let point = GeoPoint::new(40.0, -3.0);
        reducer(&mut state, Action::MapClick(point));

        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                point,
                snapshot: snapshot(22.3, 3),
            },
        );

        assert_eq!(result.effects, vec![Effect::PositionPopup { point }]);
        assert!(!state.is_loading());
        assert_eq!(state.active_marker_coords(), Some(point));
        assert_eq!(state.readout, Some(point));
        let popup = state.popup.as_ref().unwrap();
        assert_eq!(popup.report.temperature, "22°C");
        assert_eq!(popup.report.condition.description, "Overcast");
    }

    #[test]
    fn test_weather_failure_hides_popup() {
        let mut state = AppState::default();
        let point = GeoPoint::new(1.0, 1.0);
        open_popup(&mut state, point);
        reducer(&mut state, Action::MapClick(GeoPoint::new(2.0, 2.0)));

        reducer(
            &mut state,
            Action::WeatherDidFail {
                point: GeoPoint::new(2.0, 2.0),
                message: "Weather API error: 500".into(),
            },
        );

        assert!(!state.popup_visible());
        assert!(!state.is_loading());
        assert_eq!(state.error.as_deref(), Some("Weather API error: 500"));
    }

    #[test]
    fn test_stale_placement_is_ignored() {
        let mut state = AppState::default();
        open_popup(&mut state, GeoPoint::new(1.0, 1.0));

        let result = reducer(
            &mut state,
            Action::PopupPlace {
                point: GeoPoint::new(9.0, 9.0),
                area: Rect::new(0, 0, 10, 5),
            },
        );

        assert!(!result.changed);
        assert_eq!(state.popup.as_ref().unwrap().area, None);
    }

    #[test]
    fn test_dismiss_keeps_readout() {
        let mut state = AppState::default();
        let point = GeoPoint::new(1.0, 1.0);
        open_popup(&mut state, point);

        assert!(reducer(&mut state, Action::PopupDismiss).changed);
        assert!(!state.popup_visible());
        assert_eq!(state.readout, Some(point));

        // Dismissing again is a no-op
        assert!(!reducer(&mut state, Action::PopupDismiss).changed);
    }

    #[test]
    fn test_cursor_move_updates_readout() {
        let mut state = AppState::default();
        let point = GeoPoint::new(35.68922, 51.389);

        reducer(&mut state, Action::MapCursorMove(point));

        assert_eq!(state.readout, Some(point));
        assert_eq!(state.last_cursor, Some(point));
    }

    #[test]
    fn test_zoom_only_emits_effect() {
        let mut state = AppState::default();
        let before = state.clone();

        let result = reducer(&mut state, Action::MapZoom(-1));
        assert!(!result.changed);
        assert_eq!(result.effects, vec![Effect::ZoomMap { delta: -1 }]);

        assert!(!reducer(&mut state, Action::MapZoom(0)).has_effects());
        assert_eq!(state, before);
    }

    #[test]
    fn test_resize_repositions_open_popup() {
        let mut state = AppState::default();
        let point = GeoPoint::new(1.0, 1.0);
        open_popup(&mut state, point);

        let result = reducer(&mut state, Action::UiTerminalResize(120, 40));
        assert_eq!(result.effects, vec![Effect::PositionPopup { point }]);

        // Same size should not trigger anything
        let result = reducer(&mut state, Action::UiTerminalResize(120, 40));
        assert!(!result.changed);
    }

    #[test]
    fn test_error_dismiss() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit(String::new()));
        assert!(state.error.is_some());

        assert!(reducer(&mut state, Action::ErrorDismiss).changed);
        assert!(state.error.is_none());
    }
}
