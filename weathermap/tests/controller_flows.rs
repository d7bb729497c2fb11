//! End-to-end controller flows against fake clients

use std::sync::Arc;
use std::time::Duration;

use weathermap::controller::{ERROR_TOAST_TASK, SEARCH_TASK};
use weathermap::testing::{
    snapshot, ControllerHarness, GatedWeather, ScriptedGeocoder, ScriptedWeather,
};
use weathermap::{Action, ControllerConfig, FlyToOptions, MapAdapter};
use weathermap_core::GeoPoint;

const PARIS: GeoPoint = GeoPoint::new(48.8566, 2.3522);
const NOT_FOUND: &str = "Location not found. Please try a different search term.";

fn instant_flights() -> ControllerConfig {
    ControllerConfig {
        fly_to: FlyToOptions {
            zoom: 14.0,
            duration: Duration::ZERO,
        },
        ..ControllerConfig::default()
    }
}

fn paris_geocoder() -> ScriptedGeocoder {
    ScriptedGeocoder::new().found(PARIS.lat, PARIS.lon, "Paris, Île-de-France, France")
}

#[tokio::test]
async fn search_places_marker_and_flies_to_result() {
    let geocoder = Arc::new(paris_geocoder());
    let mut harness = ControllerHarness::with_config(
        geocoder.clone(),
        Arc::new(ScriptedWeather::new()),
        instant_flights(),
    );

    harness.controller.submit_search("Paris");
    assert!(harness.state().is_loading());
    assert!(!harness.state().can_search());

    let action = harness.settle().await;
    assert!(matches!(action, Action::SearchDidResolve(_)));

    let state = harness.state();
    assert!(!state.is_loading());
    assert!(state.can_search());
    assert_eq!(state.readout, Some(PARIS));
    assert_eq!(harness.controller.map().marker(), Some(PARIS));

    let viewport = harness.controller.map().viewport();
    assert_eq!(viewport.center, PARIS);
    assert_eq!(viewport.zoom, 14.0);
    assert_eq!(geocoder.queries(), vec!["Paris".to_string()]);
}

#[tokio::test]
async fn unknown_place_shows_not_found_and_leaves_map_alone() {
    let mut harness = ControllerHarness::new(
        Arc::new(ScriptedGeocoder::new()),
        Arc::new(ScriptedWeather::new()),
    );
    let viewport = harness.controller.map().viewport();

    harness.controller.submit_search("zzzqqqnotaplace");
    let action = harness.settle().await;

    assert_eq!(action, Action::SearchDidFail(NOT_FOUND.into()));
    let state = harness.state();
    assert_eq!(state.error.as_deref(), Some(NOT_FOUND));
    assert!(!state.is_loading());
    assert!(state.can_search());
    assert_eq!(harness.controller.map().marker(), None);
    assert_eq!(harness.controller.map().viewport(), viewport);
}

#[tokio::test]
async fn failed_search_keeps_previous_marker() {
    let geocoder = Arc::new(paris_geocoder());
    let mut harness = ControllerHarness::with_config(
        geocoder.clone(),
        Arc::new(ScriptedWeather::new()),
        instant_flights(),
    );

    harness.controller.submit_search("Paris");
    harness.settle().await;
    harness.controller.submit_search("zzzqqqnotaplace");
    harness.settle().await;

    assert_eq!(harness.controller.map().marker(), Some(PARIS));
    assert_eq!(harness.controller.map().viewport().center, PARIS);
    assert_eq!(harness.state().error.as_deref(), Some(NOT_FOUND));
}

#[tokio::test]
async fn blank_query_never_reaches_the_geocoder() {
    let geocoder = Arc::new(paris_geocoder());
    let mut harness =
        ControllerHarness::new(geocoder.clone(), Arc::new(ScriptedWeather::new()));

    for query in ["", "   ", "\t"] {
        harness.controller.submit_search(query);
        assert_eq!(
            harness.state().error.as_deref(),
            Some("Please enter a location to search.")
        );
        assert!(!harness.state().is_loading());
    }

    assert!(!harness.controller.tasks().is_running(&SEARCH_TASK));
    assert!(geocoder.queries().is_empty());
    assert!(harness.drain_pending().is_empty());
}

#[tokio::test]
async fn submissions_during_a_search_are_ignored() {
    let geocoder = Arc::new(paris_geocoder());
    let mut harness =
        ControllerHarness::new(geocoder.clone(), Arc::new(ScriptedWeather::new()));

    harness.controller.submit_search("Paris");
    assert!(!harness.controller.submit_search("Rome"));
    harness.settle().await;

    assert_eq!(geocoder.queries(), vec!["Paris".to_string()]);
}

#[tokio::test]
async fn map_click_opens_popup_with_formatted_weather() {
    let point = GeoPoint::new(40.0, -3.0);
    let mut harness = ControllerHarness::new(
        Arc::new(ScriptedGeocoder::new()),
        Arc::new(ScriptedWeather::new().returning(snapshot(22.3, 3))),
    );

    harness.controller.map_clicked(point);
    assert!(harness.state().is_loading());

    let action = harness.settle().await;
    assert!(matches!(action, Action::WeatherDidLoad { .. }));

    let state = harness.state();
    assert!(!state.is_loading());
    assert_eq!(state.active_marker_coords(), Some(point));
    assert_eq!(state.readout, Some(point));

    let popup = state.popup.as_ref().unwrap();
    assert_eq!(popup.report.temperature, "22°C");
    assert_eq!(popup.report.condition.description, "Overcast");
    assert_eq!(popup.report.timezone, "Europe/Madrid");
    assert_eq!(popup.report.coordinates, "40.0000°, -3.0000°");
    assert!(popup.area.is_some());
}

#[tokio::test]
async fn overlapping_clicks_render_last_completed_response() {
    let first = GeoPoint::new(10.0, 10.0);
    let second = GeoPoint::new(20.0, 20.0);
    let weather = Arc::new(GatedWeather::new());
    weather.expect(first);
    weather.expect(second);

    let mut harness =
        ControllerHarness::new(Arc::new(ScriptedGeocoder::new()), weather.clone());

    harness.controller.map_clicked(first);
    harness.controller.map_clicked(second);
    tokio::task::yield_now().await;

    weather.release(second, Ok(snapshot(30.0, 0)));
    harness.settle().await;
    assert_eq!(harness.state().active_marker_coords(), Some(second));

    weather.release(first, Ok(snapshot(5.0, 71)));
    harness.settle().await;

    let popup = harness.state().popup.as_ref().unwrap();
    assert_eq!(popup.point, first);
    assert_eq!(popup.report.temperature, "5°C");
    assert_eq!(popup.report.condition.description, "Slight snow");
    assert!(!harness.state().is_loading());
}

#[tokio::test]
async fn weather_failure_clears_loading_and_popup() {
    let point = GeoPoint::new(40.0, -3.0);
    let mut harness = ControllerHarness::new(
        Arc::new(ScriptedGeocoder::new()),
        Arc::new(ScriptedWeather::new().returning(snapshot(18.0, 1))),
    );

    harness.controller.map_clicked(point);
    harness.settle().await;
    assert!(harness.state().popup_visible());

    // Second lookup has no scripted answer and fails
    harness.controller.map_clicked(GeoPoint::new(41.0, -3.0));
    let action = harness.settle().await;

    assert!(matches!(action, Action::WeatherDidFail { .. }));
    let state = harness.state();
    assert!(!state.is_loading());
    assert!(!state.popup_visible());
    assert_eq!(state.active_marker_coords(), None);
    assert!(state.error.is_some());
}

#[tokio::test]
async fn dismissing_popup_keeps_readout() {
    let point = GeoPoint::new(40.0, -3.0);
    let mut harness = ControllerHarness::new(
        Arc::new(ScriptedGeocoder::new()),
        Arc::new(ScriptedWeather::new().returning(snapshot(22.3, 3))),
    );

    harness.controller.map_clicked(point);
    harness.settle().await;
    assert!(harness.controller.dismiss_popup());

    assert!(!harness.state().popup_visible());
    assert_eq!(harness.state().active_marker_coords(), None);
    assert_eq!(harness.state().readout, Some(point));
    assert!(!harness.controller.dismiss_popup());
}

#[tokio::test]
async fn error_notification_expires() {
    let mut harness = ControllerHarness::with_config(
        Arc::new(ScriptedGeocoder::new()),
        Arc::new(ScriptedWeather::new()),
        ControllerConfig {
            error_toast: Duration::from_millis(20),
            ..ControllerConfig::default()
        },
    );

    harness.controller.submit_search("");
    assert!(harness.controller.tasks().is_running(&ERROR_TOAST_TASK));

    let action = harness.settle().await;
    assert_eq!(action, Action::ErrorDismiss);
    assert_eq!(harness.state().error, None);
}

#[tokio::test]
async fn zoom_keeps_popup_anchored() {
    let point = GeoPoint::new(35.6892, 51.389);
    let mut harness = ControllerHarness::new(
        Arc::new(ScriptedGeocoder::new()),
        Arc::new(ScriptedWeather::new().returning(snapshot(22.3, 0))),
    );

    harness.controller.map_clicked(point);
    harness.settle().await;
    let before = harness.state().popup.as_ref().unwrap().area;

    // Map center does not move on zoom, so the anchor stays put
    harness.controller.dispatch(Action::MapZoom(2));
    assert_eq!(harness.controller.map().viewport().zoom, 8.0);
    assert_eq!(harness.state().popup.as_ref().unwrap().area, before);

    harness.controller.dispatch(Action::MapZoom(1));
    let moved_point = GeoPoint::new(36.5, 52.5);
    harness.controller.dispatch(Action::MapCursorMove(moved_point));
    assert_eq!(harness.state().readout, Some(moved_point));
}
