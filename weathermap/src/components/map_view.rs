//! World map canvas with the search marker

use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Paragraph,
    },
    Frame,
};
use weathermap_core::GeoPoint;

use super::{contains, Component};
use crate::action::Action;
use crate::event::EventKind;
use crate::map::{CanvasMap, MapAdapter};

pub struct MapViewProps<'a> {
    pub map: &'a CanvasMap,
    /// Point the open popup describes
    pub active: Option<GeoPoint>,
}

/// Renders the map and turns pointer input over it into map actions
#[derive(Default)]
pub struct MapView;

impl MapView {
    pub fn new() -> Self {
        Self
    }
}

impl Component for MapView {
    type Props<'a> = MapViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let (Some(container), Some((column, row))) = (props.map.container(), event.position())
        else {
            return None;
        };
        if !contains(container, column, row) {
            return None;
        }

        match event {
            EventKind::Scroll { delta, .. } => Some(Action::MapZoom(-delta)),
            EventKind::Mouse(mouse) => {
                let Ok(point) = props.map.unproject(column - container.x, row - container.y)
                else {
                    return None;
                };
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => Some(Action::MapClick(point)),
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        Some(Action::MapCursorMove(point))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let Ok(bounds) = props.map.bounds() else {
            frame.render_widget(Paragraph::new("Map unavailable"), area);
            return;
        };

        let marker = props.map.marker();
        let active = props.active;
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([bounds.west, bounds.east])
            .y_bounds([bounds.south, bounds.north])
            .paint(move |ctx| {
                ctx.draw(&Map {
                    color: Color::DarkGray,
                    resolution: MapResolution::High,
                });
                ctx.layer();
                if let Some(point) = active {
                    ctx.print(
                        point.lon,
                        point.lat,
                        Span::styled("+", Style::default().fg(Color::Yellow)),
                    );
                }
                if let Some(point) = marker {
                    ctx.print(
                        point.lon,
                        point.lat,
                        Span::styled(
                            "◉",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            });
        frame.render_widget(canvas, area);
    }
}
