//! Test utilities for weathermap
//!
//! - [`ScriptedGeocoder`] / [`ScriptedWeather`]: fake clients with canned answers
//! - [`GatedWeather`]: fake weather client whose responses are released by the
//!   test, to control completion order of overlapping lookups
//! - [`ControllerHarness`]: a controller plus its action channel
//! - [`render_to_string`]: render into a `TestBackend` and return plain text
//! - Assertion macros for effect and action lists
//!
//! # Example
//!
//! ```ignore
//! let mut harness = ControllerHarness::new(geocoder, weather);
//! harness.controller.submit_search("Paris");
//! harness.settle().await; // apply SearchDidResolve
//! assert!(harness.controller.map().marker().is_some());
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use tokio::sync::{mpsc, oneshot};
use weathermap_core::{
    GeoPoint, GeocodeResult, GeocodingClient, LookupError, Service, WeatherClient,
    WeatherSnapshot,
};

use crate::action::Action;
use crate::controller::{ControllerConfig, InteractionController};
use crate::layout::AppLayout;
use crate::map::CanvasMap;
use crate::state::AppState;

fn unscripted() -> LookupError {
    LookupError::Payload {
        service: Service::Weather,
        detail: "no scripted response".into(),
    }
}

/// Screen size used by [`ControllerHarness`]
pub const TEST_SCREEN: (u16, u16) = (120, 40);

/// A plausible snapshot for tests
pub fn snapshot(temperature_c: f64, condition_code: i32) -> WeatherSnapshot {
    WeatherSnapshot {
        temperature_c,
        feels_like_c: temperature_c - 1.0,
        humidity_pct: 55.0,
        wind_speed_kmh: 11.26,
        pressure_hpa: 1012.6,
        condition_code,
        timezone: "Europe/Madrid".into(),
    }
}

/// Geocoder that answers from a queue of canned results and records queries
#[derive(Default)]
pub struct ScriptedGeocoder {
    responses: Mutex<VecDeque<Result<GeocodeResult, LookupError>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn found(self, lat: f64, lon: f64, name: &str) -> Self {
        self.push(Ok(GeocodeResult {
            point: GeoPoint::new(lat, lon),
            display_name: name.to_string(),
        }))
    }

    pub fn failing(self, error: LookupError) -> Self {
        self.push(Err(error))
    }

    fn push(self, response: Result<GeocodeResult, LookupError>) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
        self
    }

    /// Queries received so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl GeocodingClient for ScriptedGeocoder {
    async fn resolve(&self, query: &str) -> Result<GeocodeResult, LookupError> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.to_string());
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(Err(LookupError::NotFound))
    }
}

/// Weather client that answers immediately from a queue of canned results
#[derive(Default)]
pub struct ScriptedWeather {
    responses: Mutex<VecDeque<Result<WeatherSnapshot, LookupError>>>,
}

impl ScriptedWeather {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(self, snapshot: WeatherSnapshot) -> Self {
        self.push(Ok(snapshot))
    }

    pub fn failing(self, error: LookupError) -> Self {
        self.push(Err(error))
    }

    fn push(self, response: Result<WeatherSnapshot, LookupError>) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
        self
    }
}

#[async_trait]
impl WeatherClient for ScriptedWeather {
    async fn fetch_current(&self, _point: GeoPoint) -> Result<WeatherSnapshot, LookupError> {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(Err(unscripted()))
    }
}

type Gate = oneshot::Receiver<Result<WeatherSnapshot, LookupError>>;

/// Weather client whose requests stay in flight until the test releases them
///
/// Each point may have one pending request; [`GatedWeather::release`] answers it.
#[derive(Default)]
pub struct GatedWeather {
    senders: Mutex<HashMap<String, oneshot::Sender<Result<WeatherSnapshot, LookupError>>>>,
    gates: Mutex<HashMap<String, Gate>>,
}

fn gate_key(point: GeoPoint) -> String {
    format!("{:.6},{:.6}", point.lat, point.lon)
}

impl GatedWeather {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare a gate for `point`; must be called before the click
    pub fn expect(&self, point: GeoPoint) {
        let (tx, rx) = oneshot::channel();
        let key = gate_key(point);
        self.senders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.clone(), tx);
        self.gates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, rx);
    }

    /// Complete the pending request for `point`
    pub fn release(&self, point: GeoPoint, response: Result<WeatherSnapshot, LookupError>) {
        let sender = self
            .senders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&gate_key(point));
        match sender {
            Some(tx) => {
                let _ = tx.send(response);
            }
            None => panic!("no pending weather request for {point}"),
        }
    }
}

#[async_trait]
impl WeatherClient for GatedWeather {
    async fn fetch_current(&self, point: GeoPoint) -> Result<WeatherSnapshot, LookupError> {
        let gate = self
            .gates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&gate_key(point));
        match gate {
            Some(rx) => rx.await.unwrap_or(Err(unscripted())),
            None => Err(unscripted()),
        }
    }
}

/// Controller over a [`CanvasMap`] laid out on a [`TEST_SCREEN`]-sized screen
pub struct ControllerHarness {
    pub controller: InteractionController<CanvasMap>,
    rx: mpsc::UnboundedReceiver<Action>,
}

impl ControllerHarness {
    pub fn new(geocoder: Arc<dyn GeocodingClient>, weather: Arc<dyn WeatherClient>) -> Self {
        Self::with_config(geocoder, weather, ControllerConfig::default())
    }

    pub fn with_config(
        geocoder: Arc<dyn GeocodingClient>,
        weather: Arc<dyn WeatherClient>,
        config: ControllerConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut map = CanvasMap::default();
        let screen = Rect::new(0, 0, TEST_SCREEN.0, TEST_SCREEN.1);
        map.set_container(AppLayout::new(screen).map);
        let controller = InteractionController::new(
            AppState::new(TEST_SCREEN),
            map,
            geocoder,
            weather,
            config,
            tx,
        );
        Self { controller, rx }
    }

    pub fn state(&self) -> &AppState {
        self.controller.state()
    }

    /// Wait for the next task result and dispatch it. Returns the action.
    ///
    /// # Panics
    ///
    /// Panics if nothing arrives within a second.
    pub async fn settle(&mut self) -> Action {
        let action = tokio::time::timeout(Duration::from_secs(1), self.rx.recv())
            .await
            .expect("timed out waiting for a task result")
            .expect("action channel closed");
        self.controller.dispatch(action.clone());
        action
    }

    /// Drain actions that are already queued without dispatching them
    pub fn drain_pending(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Ok(action) = self.rx.try_recv() {
            actions.push(action);
        }
        actions
    }
}

/// Build a key press from a short description
///
/// Accepts single characters (`"a"`), named keys (`"enter"`, `"esc"`,
/// `"backspace"`, `"delete"`, `"left"`, `"right"`, `"home"`, `"end"`) and a
/// `ctrl+` prefix (`"ctrl+q"`).
///
/// # Panics
///
/// Panics on an unknown key name.
pub fn key(desc: &str) -> KeyEvent {
    let (modifiers, name) = match desc.strip_prefix("ctrl+") {
        Some(rest) => (KeyModifiers::CONTROL, rest),
        None => (KeyModifiers::NONE, desc),
    };
    let code = match name {
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => panic!("unknown key: {desc}"),
            }
        }
    };
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

/// Left button press at an absolute cell
pub fn click(column: u16, row: u16) -> MouseEvent {
    mouse(MouseEventKind::Down(MouseButton::Left), column, row)
}

/// Pointer movement to an absolute cell
pub fn hover(column: u16, row: u16) -> MouseEvent {
    mouse(MouseEventKind::Moved, column, row)
}

/// Render with `draw` into a `width`x`height` test terminal and return the
/// buffer as plain text, one line per row.
pub fn render_to_string(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    terminal.draw(draw).expect("draw");
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

/// Assert that an item matching the pattern is in the list.
///
/// ```ignore
/// assert_emitted!(result.effects, Effect::FetchWeather { .. });
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $items.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected item matching `{}`, but got: {:?}",
            stringify!($pattern),
            $items
        );
    };
}

/// Assert that no item matching the pattern is in the list.
#[macro_export]
macro_rules! assert_not_emitted {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$items.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected NO item matching `{}`, but got: {:?}",
            stringify!($pattern),
            $items
        );
    };
}
