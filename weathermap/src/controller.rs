//! Interaction controller: the only owner of interaction state
//!
//! Every input (user intent or async result) goes through
//! [`InteractionController::dispatch`]:
//! 1. The reducer updates [`AppState`] and returns effects
//! 2. Effects are performed here: requests are spawned on the
//!    [`TaskManager`], the map is driven through its [`MapAdapter`]
//! 3. Spawned requests report back as actions on the action channel,
//!    which the runtime feeds into `dispatch` again
//!
//! Everything runs on one logical thread. The only suspension points are the
//! two network calls, and their results are applied in the order they
//! complete.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use weathermap_core::{GeoPoint, GeocodingClient, WeatherClient};

use crate::action::Action;
use crate::effect::Effect;
use crate::layout::PopupLayout;
use crate::map::{FlyToOptions, MapAdapter};
use crate::reducer::reducer;
use crate::state::AppState;
use crate::tasks::{TaskKey, TaskManager};

pub const SEARCH_TASK: TaskKey = TaskKey::new("search");
pub const WEATHER_TASK: TaskKey = TaskKey::new("weather");
pub const ERROR_TOAST_TASK: TaskKey = TaskKey::new("error_toast");

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Viewport animation after a successful search
    pub fly_to: FlyToOptions,
    /// How long the error notification stays up
    pub error_toast: Duration,
    pub popup: PopupLayout,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            fly_to: FlyToOptions::default(),
            error_toast: Duration::from_secs(5),
            popup: PopupLayout::default(),
        }
    }
}

pub struct InteractionController<M> {
    state: AppState,
    map: M,
    geocoder: Arc<dyn GeocodingClient>,
    weather: Arc<dyn WeatherClient>,
    tasks: TaskManager,
    config: ControllerConfig,
}

impl<M: MapAdapter> InteractionController<M> {
    /// Create a controller. Task results are sent on `action_tx`.
    pub fn new(
        state: AppState,
        map: M,
        geocoder: Arc<dyn GeocodingClient>,
        weather: Arc<dyn WeatherClient>,
        config: ControllerConfig,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            state,
            map,
            geocoder,
            weather,
            tasks: TaskManager::new(action_tx),
            config,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn tasks(&self) -> &TaskManager {
        &self.tasks
    }

    /// Apply an action and perform its effects.
    ///
    /// Returns `true` if state changed and the UI should re-render.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let name = action.name();
        if action.is_async_result() {
            tracing::debug!(summary = %action.summary(), "Async result");
        }

        let result = reducer(&mut self.state, action);
        tracing::debug!(action = name, changed = result.changed, "Dispatched action");
        let mut changed = result.changed;
        for effect in result.effects {
            changed |= self.handle_effect(effect);
        }
        changed
    }

    pub fn submit_search(&mut self, query: &str) -> bool {
        self.dispatch(Action::SearchSubmit(query.to_string()))
    }

    pub fn map_clicked(&mut self, point: GeoPoint) -> bool {
        self.dispatch(Action::MapClick(point))
    }

    pub fn cursor_moved(&mut self, point: GeoPoint) -> bool {
        self.dispatch(Action::MapCursorMove(point))
    }

    pub fn dismiss_popup(&mut self) -> bool {
        self.dispatch(Action::PopupDismiss)
    }

    /// Re-place the open popup after the viewport moved
    pub fn refresh_popup(&mut self) -> bool {
        match self.state.active_marker_coords() {
            Some(point) => self.position_popup(point),
            None => false,
        }
    }

    /// Abort outstanding requests and timers
    pub fn shutdown(&mut self) {
        self.tasks.cancel_all();
    }

    fn handle_effect(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::Geocode { query } => {
                let geocoder = Arc::clone(&self.geocoder);
                self.tasks.spawn(SEARCH_TASK, async move {
                    match geocoder.resolve(&query).await {
                        Ok(result) => Action::SearchDidResolve(result),
                        Err(e) => {
                            tracing::debug!(%query, kind = ?e.kind(), "Geocoding error");
                            Action::SearchDidFail(e.to_string())
                        }
                    }
                });
                false
            }
            Effect::FetchWeather { point } => {
                let weather = Arc::clone(&self.weather);
                self.tasks.spawn_overlapping(WEATHER_TASK, async move {
                    match weather.fetch_current(point).await {
                        Ok(snapshot) => Action::WeatherDidLoad { point, snapshot },
                        Err(e) => {
                            tracing::debug!(%point, kind = ?e.kind(), "Weather error");
                            Action::WeatherDidFail {
                                point,
                                message: e.to_string(),
                            }
                        }
                    }
                });
                false
            }
            Effect::PlaceMarker { point } => {
                self.map.set_marker(point);
                true
            }
            Effect::FlyTo { point } => {
                self.map.fly_to(point, self.config.fly_to);
                true
            }
            Effect::ZoomMap { delta } => {
                if self.map.zoom_by(f64::from(delta)) {
                    self.refresh_popup();
                    true
                } else {
                    false
                }
            }
            Effect::PositionPopup { point } => self.position_popup(point),
            Effect::ExpireError => {
                self.tasks
                    .debounce(ERROR_TOAST_TASK, self.config.error_toast, async {
                        Action::ErrorDismiss
                    });
                false
            }
        }
    }

    fn position_popup(&mut self, point: GeoPoint) -> bool {
        let Some(container) = self.map.container() else {
            tracing::warn!("Popup opened before the map has a viewport");
            return false;
        };
        match self.map.project_to_screen(point) {
            Ok(anchor) => {
                let area = self
                    .config
                    .popup
                    .place(anchor, container, self.state.terminal_size);
                self.dispatch(Action::PopupPlace { point, area })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not place popup");
                false
            }
        }
    }
}
