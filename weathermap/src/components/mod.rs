//! UI components
//!
//! Each component renders from props and turns terminal events into
//! [`Action`]s. Components never touch [`AppState`](crate::state::AppState)
//! or the map directly; anything that changes data goes through the
//! controller.

mod error_toast;
mod map_view;
mod search_bar;
mod status_bar;
mod weather_popup;

pub use error_toast::{ErrorToast, ErrorToastProps};
pub use map_view::{MapView, MapViewProps};
pub use search_bar::{SearchBar, SearchBarProps};
pub use status_bar::{StatusBar, StatusBarProps};
pub use weather_popup::{WeatherPopupProps, WeatherPopupView};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::event::EventKind;

/// A UI element that renders from props and emits actions
///
/// Props carry all read-only data needed for rendering. Internal UI state
/// (cursor position, last drawn area for hit-testing) may live in `&mut self`,
/// but data changes must go through actions.
pub trait Component {
    type Props<'a>;

    /// Handle an event and return actions to dispatch
    ///
    /// Default implementation returns no actions (render-only components).
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        None::<Action>
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}

/// Left button press at a cell inside `area`
pub(crate) fn left_click_in(event: &EventKind, area: Rect) -> Option<MouseEvent> {
    match event {
        EventKind::Mouse(mouse)
            if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                && contains(area, mouse.column, mouse.row) =>
        {
            Some(*mouse)
        }
        _ => None,
    }
}

pub(crate) fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}
