//! Popup with the current conditions at the clicked point

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use super::{left_click_in, Component};
use crate::action::Action;
use crate::event::EventKind;
use crate::state::WeatherPopup;

pub struct WeatherPopupProps<'a> {
    pub popup: &'a WeatherPopup,
}

/// Any click inside the popup (including the `[x]` control) closes it
#[derive(Default)]
pub struct WeatherPopupView {
    /// Where the popup was last drawn
    area: Option<Rect>,
}

impl WeatherPopupView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Area used when the popup has not been placed yet: centered in `screen`
    fn fallback_area(screen: Rect) -> Rect {
        let width = 38.min(screen.width);
        let height = 12.min(screen.height);
        Rect::new(
            screen.x + (screen.width - width) / 2,
            screen.y + (screen.height - height) / 2,
            width,
            height,
        )
    }
}

impl Component for WeatherPopupView {
    type Props<'a> = WeatherPopupProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        self.area
            .and_then(|area| left_click_in(event, area))
            .map(|_| Action::PopupDismiss)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let report = &props.popup.report;
        let popup_area = props
            .popup
            .area
            .unwrap_or_else(|| Self::fallback_area(area))
            .intersection(frame.area());
        self.area = Some(popup_area);
        if popup_area.is_empty() {
            return;
        }

        let label = Style::default().fg(Color::Gray);
        let mut lines = vec![
            Line::from(vec![
                Span::raw(format!("{}  ", report.emoji)),
                Span::styled(
                    report.temperature.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(report.condition.description),
            Line::from(vec![
                Span::styled("Timezone: ", label),
                Span::raw(report.timezone.as_str()),
            ]),
            Line::default(),
        ];
        lines.extend(report.details().into_iter().map(|(name, value)| {
            Line::from(vec![
                Span::styled(format!("{name}: "), label),
                Span::raw(value),
            ])
        }));
        lines.push(Line::default());
        lines.push(Line::styled(
            report.coordinates.as_str(),
            Style::default().fg(Color::DarkGray),
        ));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Weather ")
            .title(Line::from(" [x] ").alignment(Alignment::Right));

        frame.render_widget(Clear, popup_area);
        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}
