//! Search input plus the search control

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{left_click_in, Component};
use crate::action::Action;
use crate::event::EventKind;

const PLACEHOLDER: &str = "Search for a city or place...";
const BUTTON_WIDTH: u16 = 12;

pub struct SearchBarProps<'a> {
    pub value: &'a str,
    /// False while a search is in flight
    pub enabled: bool,
}

/// Single-line place-name input with a clickable search control
///
/// Typing emits `SearchQueryChange`; Enter or a click on the control emits
/// `SearchSubmit`. The input always has keyboard focus.
#[derive(Default)]
pub struct SearchBar {
    /// Cursor position (byte index)
    cursor: usize,
    /// Where the search control was last drawn
    button: Rect,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    fn clamp_cursor(&mut self, value: &str) {
        self.cursor = self.cursor.min(value.len());
        while !value.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    fn move_cursor_left(&mut self, value: &str) {
        if let Some((i, _)) = value[..self.cursor].char_indices().last() {
            self.cursor = i;
        }
    }

    fn move_cursor_right(&mut self, value: &str) {
        if let Some(c) = value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    fn insert_char(&mut self, value: &str, c: char) -> String {
        let mut new_value = String::with_capacity(value.len() + c.len_utf8());
        new_value.push_str(&value[..self.cursor]);
        new_value.push(c);
        new_value.push_str(&value[self.cursor..]);
        self.cursor += c.len_utf8();
        new_value
    }

    /// Backspace
    fn delete_char_before(&mut self, value: &str) -> Option<String> {
        let (start, _) = value[..self.cursor].char_indices().last()?;
        let new_value = format!("{}{}", &value[..start], &value[self.cursor..]);
        self.cursor = start;
        Some(new_value)
    }

    /// Delete
    fn delete_char_at(&self, value: &str) -> Option<String> {
        let c = value[self.cursor..].chars().next()?;
        Some(format!(
            "{}{}",
            &value[..self.cursor],
            &value[self.cursor + c.len_utf8()..]
        ))
    }
}

impl Component for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        self.clamp_cursor(props.value);
        let value = props.value;

        if left_click_in(event, self.button).is_some() {
            return props.enabled.then(|| Action::SearchSubmit(value.to_string()));
        }

        let EventKind::Key(key) = event else {
            return None;
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    None
                }
                KeyCode::Char('e') => {
                    self.cursor = value.len();
                    None
                }
                KeyCode::Char('u') => {
                    self.cursor = 0;
                    Some(Action::SearchQueryChange(String::new()))
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => Some(Action::SearchQueryChange(self.insert_char(value, c))),
            KeyCode::Backspace => self
                .delete_char_before(value)
                .map(Action::SearchQueryChange),
            KeyCode::Delete => self.delete_char_at(value).map(Action::SearchQueryChange),
            KeyCode::Left => {
                self.move_cursor_left(value);
                None
            }
            KeyCode::Right => {
                self.move_cursor_right(value);
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = value.len();
                None
            }
            KeyCode::Enter if props.enabled => Some(Action::SearchSubmit(value.to_string())),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.clamp_cursor(props.value);

        let [input_area, button_area] =
            Layout::horizontal([Constraint::Min(10), Constraint::Length(BUTTON_WIDTH)])
                .areas(area);
        self.button = button_area;

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Location ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(input_area);

        // Keep the cursor visible by scrolling long input horizontally
        let cursor_col = props.value[..self.cursor].chars().count();
        let width = usize::from(inner.width.max(1));
        let skip = cursor_col.saturating_sub(width - 1);

        let paragraph = if props.value.is_empty() {
            Paragraph::new(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let visible: String = props.value.chars().skip(skip).collect();
            Paragraph::new(visible)
        };
        frame.render_widget(paragraph.block(block), input_area);

        let (label, style) = if props.enabled {
            (
                "Search",
                Style::default().fg(Color::Black).bg(Color::Cyan),
            )
        } else {
            (
                "...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            )
        };
        let button = Paragraph::new(label)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style));
        frame.render_widget(button, button_area);

        let x = inner.x + (cursor_col - skip) as u16;
        if x < inner.right() {
            frame.set_cursor_position((x, inner.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{click, key, render_to_string};

    fn props(value: &str) -> SearchBarProps<'_> {
        SearchBarProps {
            value,
            enabled: true,
        }
    }

    fn handle(bar: &mut SearchBar, event: EventKind, props: SearchBarProps<'_>) -> Vec<Action> {
        bar.handle_event(&event, props).into_iter().collect()
    }

    #[test]
    fn test_typing_appends() {
        let mut bar = SearchBar::new();
        bar.cursor = 5;
        let actions = handle(&mut bar, EventKind::Key(key("s")), props("Paris"));
        assert_eq!(actions, vec![Action::SearchQueryChange("Pariss".into())]);
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut bar = SearchBar::new();
        bar.cursor = "Zürich".len();
        let actions = handle(&mut bar, EventKind::Key(key("backspace")), props("Zürich"));
        assert_eq!(actions, vec![Action::SearchQueryChange("Züric".into())]);

        bar.cursor = 3; // after "ü"
        let actions = handle(&mut bar, EventKind::Key(key("backspace")), props("Zürich"));
        assert_eq!(actions, vec![Action::SearchQueryChange("Zrich".into())]);
        assert_eq!(bar.cursor, 1);
    }

    #[test]
    fn test_enter_submits_raw_value() {
        let mut bar = SearchBar::new();
        let actions = handle(&mut bar, EventKind::Key(key("enter")), props(" Paris "));
        assert_eq!(actions, vec![Action::SearchSubmit(" Paris ".into())]);
    }

    #[test]
    fn test_disabled_while_searching() {
        let mut bar = SearchBar::new();
        let disabled = SearchBarProps {
            value: "Paris",
            enabled: false,
        };
        assert!(handle(&mut bar, EventKind::Key(key("enter")), disabled).is_empty());
    }

    #[test]
    fn test_click_on_control_submits() {
        let mut bar = SearchBar::new();
        render_to_string(60, 3, |frame| bar.render(frame, frame.area(), props("Rome")));

        // Control occupies the last 12 columns
        let actions = handle(&mut bar, EventKind::Mouse(click(55, 1)), props("Rome"));
        assert_eq!(actions, vec![Action::SearchSubmit("Rome".into())]);

        let actions = handle(&mut bar, EventKind::Mouse(click(10, 1)), props("Rome"));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_render_placeholder_and_control() {
        let mut bar = SearchBar::new();
        let out = render_to_string(60, 3, |frame| bar.render(frame, frame.area(), props("")));
        assert!(out.contains("Search for a city"));
        assert!(out.contains("Search"));
    }
}
