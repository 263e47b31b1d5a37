//! Rendering helpers for dialogs drawn above the active page.
//!
//! Usage: draw the page, call `render_backdrop`, compute the dialog rect with
//! `centered_rect_fixed`, then `draw_popup_frame` and the dialog content inside
//! `inner_rect(dialog)`.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{Block, Borders, Clear},
};

use crate::tui::Frame;

/// Dim everything already drawn in `area`. Terminals have no transparency, so
/// the page stays visible but faded.
pub fn render_backdrop(frame: &mut Frame<'_>, area: Rect) {
    frame.buffer_mut().set_style(
        area,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM),
    );
}

/// A centered rectangle of the requested size, clamped to `area`.
pub fn centered_rect_fixed(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);

    let x = area.x.saturating_add((area.width.saturating_sub(w)) / 2);
    let y = area.y.saturating_add((area.height.saturating_sub(h)) / 2);

    Rect {
        x,
        y,
        width: w,
        height: h,
    }
}

/// Clear `area` and draw a rounded dialog shell with a styled title.
pub fn draw_popup_frame(frame: &mut Frame<'_>, area: Rect, title: Span<'_>) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED)
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(block, area);
    area
}

/// Inner rect of a bordered block.
pub fn inner_rect(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn centered_rect_is_clamped_and_centered() {
        let area = Rect::new(0, 0, 100, 30);
        assert_eq!(centered_rect_fixed(area, 40, 10), Rect::new(30, 10, 40, 10));
        assert_eq!(centered_rect_fixed(area, 200, 50), area);
    }

    #[test]
    fn inner_rect_never_underflows() {
        assert_eq!(inner_rect(Rect::new(5, 5, 1, 1)), Rect::new(6, 6, 0, 0));
    }
}
