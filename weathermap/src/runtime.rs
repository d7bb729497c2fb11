//! The event/action/render loop
//!
//! [`App`] owns the controller and the components. Terminal events are
//! mapped to actions and applied before the next event is read, so each key
//! sees the query left by the previous one. Results of the controller's
//! tasks arrive on the action channel and are applied between events.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use weathermap_core::{GeocodingClient, WeatherClient};

use crate::action::Action;
use crate::components::{
    Component, ErrorToast, ErrorToastProps, MapView, MapViewProps, SearchBar, SearchBarProps,
    StatusBar, StatusBarProps, WeatherPopupProps, WeatherPopupView,
};
use crate::controller::{ControllerConfig, InteractionController};
use crate::event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
use crate::layout::AppLayout;
use crate::map::CanvasMap;
use crate::state::AppState;

/// Configuration for the event poller.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    /// Timeout passed to each `crossterm::event::poll` call.
    pub poll_timeout: Duration,
    /// Sleep between poll cycles.
    pub loop_sleep: Duration,
    /// Interval of the animation tick.
    pub tick_rate: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(10),
            loop_sleep: Duration::from_millis(16),
            tick_rate: Duration::from_millis(33),
        }
    }
}

/// Result of mapping an event into actions plus an optional render hint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventOutcome {
    /// Actions to enqueue.
    pub actions: Vec<Action>,
    /// Whether to force a re-render.
    pub needs_render: bool,
}

impl EventOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            needs_render: false,
        }
    }

    pub fn render() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: true,
        }
    }
}

#[derive(Default)]
struct Components {
    search_bar: SearchBar,
    map_view: MapView,
    popup: WeatherPopupView,
    status_bar: StatusBar,
    error_toast: ErrorToast,
}

pub struct App {
    controller: InteractionController<CanvasMap>,
    components: Components,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    poller_config: PollerConfig,
    should_render: bool,
}

impl App {
    pub fn new(
        map: CanvasMap,
        geocoder: Arc<dyn GeocodingClient>,
        weather: Arc<dyn WeatherClient>,
        config: ControllerConfig,
        terminal_size: (u16, u16),
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let controller = InteractionController::new(
            AppState::new(terminal_size),
            map,
            geocoder,
            weather,
            config,
            action_tx.clone(),
        );
        let mut app = Self {
            controller,
            components: Components::default(),
            action_tx,
            action_rx,
            poller_config: PollerConfig::default(),
            should_render: true,
        };
        app.resize(terminal_size.0, terminal_size.1);
        app
    }

    pub fn controller(&self) -> &InteractionController<CanvasMap> {
        &self.controller
    }

    pub fn state(&self) -> &AppState {
        self.controller.state()
    }

    /// Send an action into the runtime queue.
    pub fn enqueue(&self, action: Action) {
        let _ = self.action_tx.send(action);
    }

    /// Apply an action. Returns false once the app should exit.
    pub fn dispatch(&mut self, action: Action) -> bool {
        if action == Action::Quit {
            tracing::info!("Quit requested");
            return false;
        }
        if self.controller.dispatch(action) {
            self.should_render = true;
        }
        true
    }

    /// Dispatch everything already queued. Returns false if a quit was seen.
    pub fn dispatch_pending(&mut self) -> bool {
        while let Ok(action) = self.action_rx.try_recv() {
            if !self.dispatch(action) {
                return false;
            }
        }
        true
    }

    /// Map an event and apply its actions immediately.
    ///
    /// Returns false once the app should exit.
    pub fn handle_event(&mut self, event: &EventKind) -> bool {
        let outcome = self.map_event(event);
        if outcome.needs_render {
            self.should_render = true;
        }
        for action in outcome.actions {
            if !self.dispatch(action) {
                return false;
            }
        }
        true
    }

    fn resize(&mut self, width: u16, height: u16) {
        let layout = AppLayout::new(Rect::new(0, 0, width, height));
        self.controller.map_mut().set_container(layout.map);
    }

    /// Route an event to the component under it.
    ///
    /// Pointer events go to the topmost component that reacts: the error
    /// notification, then the popup, then the search bar, then the map.
    pub fn map_event(&mut self, event: &EventKind) -> EventOutcome {
        if event.is_quit() {
            return EventOutcome::actions([Action::Quit]);
        }

        let state = self.controller.state();
        let c = &mut self.components;
        match event {
            EventKind::Key(key) if key.code == KeyCode::Esc => {
                EventOutcome::actions([Action::PopupDismiss])
            }
            EventKind::Key(_) => EventOutcome::actions(c.search_bar.handle_event(
                event,
                SearchBarProps {
                    value: &state.search_query,
                    enabled: state.can_search(),
                },
            )),
            EventKind::Mouse(_) | EventKind::Scroll { .. } => {
                let mut actions: Vec<Action> = Vec::new();
                if let Some(message) = state.error.as_deref() {
                    actions.extend(
                        c.error_toast
                            .handle_event(event, ErrorToastProps { message }),
                    );
                }
                if actions.is_empty() {
                    if let Some(popup) = state.popup.as_ref() {
                        actions.extend(c.popup.handle_event(event, WeatherPopupProps { popup }));
                    }
                }
                if actions.is_empty() {
                    actions.extend(c.search_bar.handle_event(
                        event,
                        SearchBarProps {
                            value: &state.search_query,
                            enabled: state.can_search(),
                        },
                    ));
                }
                if actions.is_empty() {
                    actions.extend(c.map_view.handle_event(
                        event,
                        MapViewProps {
                            map: self.controller.map(),
                            active: state.active_marker_coords(),
                        },
                    ));
                }
                EventOutcome::actions(actions)
            }
            EventKind::Resize(width, height) => {
                self.resize(*width, *height);
                let mut outcome = EventOutcome::render();
                outcome.actions.push(Action::UiTerminalResize(*width, *height));
                outcome
            }
            EventKind::Tick => self.tick(Instant::now()),
        }
    }

    fn tick(&mut self, now: Instant) -> EventOutcome {
        if !self.controller.map_mut().advance(now) {
            return EventOutcome::ignored();
        }
        self.controller.refresh_popup();
        EventOutcome::render()
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let layout = AppLayout::new(frame.area());
        let state = self.controller.state();
        let c = &mut self.components;

        c.search_bar.render(
            frame,
            layout.search,
            SearchBarProps {
                value: &state.search_query,
                enabled: state.can_search(),
            },
        );
        c.map_view.render(
            frame,
            layout.map,
            MapViewProps {
                map: self.controller.map(),
                active: state.active_marker_coords(),
            },
        );
        c.status_bar.render(
            frame,
            layout.status,
            StatusBarProps {
                readout: state.readout,
                loading: state.is_loading(),
            },
        );
        if let Some(popup) = state.popup.as_ref() {
            c.popup
                .render(frame, layout.map, WeatherPopupProps { popup });
        }
        if let Some(message) = state.error.as_deref() {
            c.error_toast
                .render(frame, layout.map, ErrorToastProps { message });
        }
    }

    /// Run the event/action loop until quit.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let size = terminal.size()?;
        self.resize(size.width, size.height);
        self.enqueue(Action::UiTerminalResize(size.width, size.height));

        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
        let cancel_token = CancellationToken::new();
        let _handle = spawn_event_poller(
            event_tx,
            self.poller_config.poll_timeout,
            self.poller_config.loop_sleep,
            cancel_token.clone(),
        );
        let mut ticker = tokio::time::interval(self.poller_config.tick_rate);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            if self.should_render {
                terminal.draw(|frame| self.render(frame))?;
                self.should_render = false;
            }

            let running = tokio::select! {
                Some(raw_event) = event_rx.recv() => {
                    let event = process_raw_event(raw_event);
                    self.handle_event(&event)
                }

                Some(action) = self.action_rx.recv() => self.dispatch(action),

                _ = ticker.tick() => self.handle_event(&EventKind::Tick),

                else => false,
            };
            if !running {
                break;
            }
        }

        self.controller.shutdown();
        cancel_token.cancel();
        Ok(())
    }
}
