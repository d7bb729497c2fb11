//! Transient error notification

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{left_click_in, Component};
use crate::action::Action;
use crate::event::EventKind;

const MAX_WIDTH: u16 = 60;

pub struct ErrorToastProps<'a> {
    pub message: &'a str,
}

/// Shown in the top-right corner of the given area; a click dismisses it
#[derive(Default)]
pub struct ErrorToast {
    area: Option<Rect>,
}

impl ErrorToast {
    pub fn new() -> Self {
        Self::default()
    }

    fn placement(area: Rect, message: &str) -> Rect {
        let text_width = u16::try_from(message.chars().count()).unwrap_or(u16::MAX);
        let width = text_width.saturating_add(4).min(MAX_WIDTH).min(area.width);
        let inner = width.saturating_sub(2).max(1);
        let lines = text_width.div_ceil(inner).max(1);
        let height = lines.saturating_add(2).min(area.height);
        Rect::new(area.right().saturating_sub(width + 1), area.y, width, height)
            .intersection(area)
    }
}

impl Component for ErrorToast {
    type Props<'a> = ErrorToastProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        self.area
            .and_then(|area| left_click_in(event, area))
            .map(|_| Action::ErrorDismiss)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let toast = Self::placement(area, props.message);
        self.area = Some(toast);

        let style = Style::default().fg(Color::White).bg(Color::Red);
        frame.render_widget(Clear, toast);
        frame.render_widget(
            Paragraph::new(props.message)
                .wrap(Wrap { trim: true })
                .style(style)
                .block(Block::default().borders(Borders::ALL).title(" Error ").style(style)),
            toast,
        );
    }
}
