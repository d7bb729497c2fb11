//! Screen layout and popup placement

use ratatui::layout::{Constraint, Layout, Rect};

use crate::map::ScreenPoint;

/// The three horizontal bands of the screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppLayout {
    pub search: Rect,
    pub map: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub const SEARCH_HEIGHT: u16 = 3;

    pub fn new(area: Rect) -> Self {
        let chunks = Layout::vertical([
            Constraint::Length(Self::SEARCH_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);
        Self {
            search: chunks[0],
            map: chunks[1],
            status: chunks[2],
        }
    }
}

/// Popup size and the rules that keep it on screen (all in cells)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopupLayout {
    pub width: u16,
    pub height: u16,
    /// Minimum gap to the left and right screen edges
    pub edge_margin: u16,
    /// Rows above the point for the default placement
    pub offset_above: u16,
    /// Rows below the point when the default placement is too high
    pub offset_below: u16,
    /// Highest row the popup may start on
    pub min_top: u16,
}

impl Default for PopupLayout {
    fn default() -> Self {
        Self {
            width: 38,
            height: 12,
            edge_margin: 2,
            offset_above: 1,
            offset_below: 2,
            min_top: 5,
        }
    }
}

impl PopupLayout {
    /// Place the popup next to `anchor` (container-relative) on a screen of `screen` size.
    ///
    /// Horizontally the popup is clamped to `edge_margin` from both edges.
    /// It starts `offset_above` rows above the point unless that would put it
    /// above `min_top`, in which case it moves `offset_below` rows below.
    /// The result is clipped to the screen.
    pub fn place(&self, anchor: ScreenPoint, container: Rect, screen: (u16, u16)) -> Rect {
        let (screen_w, screen_h) = (i32::from(screen.0), i32::from(screen.1));
        let (w, h) = (i32::from(self.width), i32::from(self.height));
        let margin = i32::from(self.edge_margin);

        let x = i32::from(container.x) + anchor.x.floor() as i32;
        let y = i32::from(container.y) + anchor.y.floor() as i32;

        let mut left = x;
        let mut top = y - i32::from(self.offset_above);

        if left + w > screen_w - margin {
            left = screen_w - w - margin;
        }
        if left < margin {
            left = margin;
        }
        if top < i32::from(self.min_top) {
            top = y + i32::from(self.offset_below);
        }

        clip(left, top, w, h, screen_w, screen_h)
    }
}

fn clip(left: i32, top: i32, w: i32, h: i32, screen_w: i32, screen_h: i32) -> Rect {
    let x0 = left.clamp(0, screen_w);
    let y0 = top.clamp(0, screen_h);
    let x1 = (left + w).clamp(x0, screen_w);
    let y1 = (top + h).clamp(y0, screen_h);
    Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16)
}
