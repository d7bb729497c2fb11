//! weathermap: a terminal map for looking up places and current weather
//!
//! The interaction logic follows a unidirectional data flow:
//!
//! ```text
//! Event → Component → Action → Reducer → (State, Effects) → Controller → Tasks / Map
//!                                  ↑                                        │
//!                                  └──────────── result actions ────────────┘
//! ```
//!
//! - [`reducer::reducer`] owns every state transition and is a pure function
//! - [`controller::InteractionController`] performs the effects it returns:
//!   geocoding and weather requests on a [`tasks::TaskManager`], marker and
//!   viewport changes on a [`map::MapAdapter`]
//! - [`runtime::App`] maps terminal events to actions and draws the screen
//!
//! Data sources and formatting live in `weathermap-core`.

pub mod action;
pub mod components;
pub mod controller;
pub mod effect;
pub mod event;
pub mod layout;
pub mod map;
pub mod reducer;
pub mod runtime;
pub mod state;
pub mod tasks;
pub mod testing;

pub use action::Action;
pub use controller::{ControllerConfig, InteractionController};
pub use effect::{DispatchResult, Effect};
pub use map::{CanvasMap, FlyToOptions, MapAdapter, MapConfig, MapError, Viewport};
pub use runtime::App;
pub use state::{AppState, WeatherPopup};
