//! Bottom line: coordinate readout, loading indicator and key hints

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use weathermap_core::{presenter::format_readout, GeoPoint};

use super::Component;

const HINTS: &str = "Enter: search  Click: weather  Scroll: zoom  Esc: close  Ctrl+Q: quit";

pub struct StatusBarProps {
    pub readout: Option<GeoPoint>,
    pub loading: bool,
}

#[derive(Default)]
pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }
}

impl Component for StatusBar {
    type Props<'a> = StatusBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let [left, right] =
            Layout::horizontal([Constraint::Min(30), Constraint::Length(HINTS.len() as u16)])
                .areas(area);

        let mut spans = vec![match props.readout {
            Some(point) => Span::raw(format_readout(point)),
            None => Span::styled("Lat: --, Lon: --", Style::default().fg(Color::DarkGray)),
        }];
        if props.loading {
            spans.push(Span::styled(
                "  Loading...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), left);
        frame.render_widget(
            Paragraph::new(HINTS).style(Style::default().fg(Color::DarkGray)),
            right,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::render_to_string;

    fn render(props: StatusBarProps) -> String {
        render_to_string(120, 1, |frame| {
            StatusBar::new().render(frame, frame.area(), props)
        })
    }

    #[test]
    fn test_readout_uses_four_decimals() {
        let out = render(StatusBarProps {
            readout: Some(GeoPoint::new(35.68922, 51.38901)),
            loading: false,
        });
        assert!(out.contains("Lat: 35.6892, Lon: 51.3890"));
        assert!(!out.contains("Loading"));
    }

    #[test]
    fn test_loading_indicator() {
        let out = render(StatusBarProps {
            readout: None,
            loading: true,
        });
        assert!(out.contains("Loading..."));
    }
}
