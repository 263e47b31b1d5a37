use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::Paragraph,
};

use super::popup::{centered_rect_fixed, draw_popup_frame, inner_rect, render_backdrop};
use super::Component;
use crate::{
    action::Action,
    contact::{ModalKind, ModalState},
    tui::{EventResponse, Frame},
};

pub const ERROR_COLOR: Color = Color::Rgb(0xef, 0x44, 0x44);
pub const SUCCESS_COLOR: Color = Color::Rgb(0x10, 0xb9, 0x81);

const DIALOG_WIDTH: u16 = 64;
const MAX_DETAIL_ROWS: usize = 12;
const CLOSE_LABEL: &str = "[ Close ]";
const DETAILS_BG: Color = Color::Rgb(0x1f, 0x1f, 0x1f);

/// View of the feedback modal.
///
/// Mirrors the orchestrator's `ModalState`. While open it traps input: Enter,
/// Esc, the close button or a click on the dimmed overlay emit
/// `Action::CloseModal`, everything else is swallowed by the app shell.
///
/// Details longer than the dialog allows are scrolled with the arrow keys,
/// PgUp/PgDn or the mouse wheel; a marker line counts the hidden rows.
#[derive(Default)]
pub struct FeedbackModal {
    state: ModalState,
    dialog: Option<Rect>,
    close_button: Option<Rect>,
    detail_scroll: usize,
    /// Details rows visible in the last frame.
    detail_rows: usize,
}

impl FeedbackModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&mut self, state: &ModalState) {
        if &self.state != state {
            self.state = state.clone();
            self.detail_scroll = 0;
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    fn accent(&self) -> Color {
        match self.state.kind {
            Some(ModalKind::Error) => ERROR_COLOR,
            Some(ModalKind::Success) | None => SUCCESS_COLOR,
        }
    }

    fn close(&self) -> Option<EventResponse<Action>> {
        Some(EventResponse::Stop(Action::CloseModal))
    }

    fn detail_line_count(&self) -> usize {
        self.state.visible_details().map_or(0, |d| d.lines().count())
    }

    fn scroll_details(&mut self, delta: isize) -> Option<EventResponse<Action>> {
        let max = self.detail_line_count().saturating_sub(self.detail_rows);
        self.detail_scroll = self.detail_scroll.saturating_add_signed(delta).min(max);
        Some(EventResponse::Stop(Action::Render))
    }
}

impl Component for FeedbackModal {
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        if !self.state.is_open {
            return Ok(None);
        }
        let page = self.detail_rows.max(1) as isize;
        Ok(match key.code {
            KeyCode::Enter | KeyCode::Esc => self.close(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_details(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_details(-1),
            KeyCode::PageDown => self.scroll_details(page),
            KeyCode::PageUp => self.scroll_details(-page),
            KeyCode::Home => self.scroll_details(isize::MIN),
            KeyCode::End => self.scroll_details(isize::MAX),
            _ => None,
        })
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<EventResponse<Action>>> {
        if !self.state.is_open {
            return Ok(None);
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => return Ok(self.scroll_details(1)),
            MouseEventKind::ScrollUp => return Ok(self.scroll_details(-1)),
            MouseEventKind::Down(MouseButton::Left) => {}
            _ => return Ok(None),
        }
        let pos = Position::new(mouse.column, mouse.row);
        let on_button = self.close_button.is_some_and(|r| r.contains(pos));
        let on_dialog = self.dialog.is_some_and(|r| r.contains(pos));
        if on_button || !on_dialog {
            return Ok(self.close());
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        self.dialog = None;
        self.close_button = None;
        if !self.state.is_open || area.width < 10 || area.height < 5 {
            return Ok(());
        }

        render_backdrop(f, area);

        let text_width = DIALOG_WIDTH.min(area.width).saturating_sub(4).max(1);
        let message = wrap_words(&self.state.message, text_width);
        let message_lines = message.len() as u16;
        let details: Vec<&str> = self
            .state
            .visible_details()
            .map(|d| d.lines().collect())
            .unwrap_or_default();

        // border + padding + message + gap + button + padding + border
        let chrome = 2 + 1 + message_lines + 1 + 1 + 1;
        // details title and marker line
        let room = usize::from(area.height.saturating_sub(chrome + 2));
        self.detail_rows = details.len().min(MAX_DETAIL_ROWS).min(room.max(1));
        self.detail_scroll = self
            .detail_scroll
            .min(details.len().saturating_sub(self.detail_rows));
        let details_height = if details.is_empty() {
            0
        } else {
            self.detail_rows as u16 + 2
        };
        let height = chrome + details_height;

        let dialog = centered_rect_fixed(area, DIALOG_WIDTH, height);
        let accent = self.accent();
        draw_popup_frame(
            f,
            dialog,
            Span::styled(
                format!(" {} ", self.state.title),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
        );
        self.dialog = Some(dialog);

        let inner = inner_rect(dialog);
        let body = Rect {
            x: inner.x.saturating_add(1),
            width: inner.width.saturating_sub(2),
            ..inner
        };
        let [_, message_area, _, details_area, button_area, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(message_lines),
            Constraint::Length(1),
            Constraint::Length(details_height),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(body);

        f.render_widget(
            Paragraph::new(Text::from_iter(message.into_iter().map(Line::from))),
            message_area,
        );

        if !details.is_empty() {
            let shown = &details[self.detail_scroll..self.detail_scroll + self.detail_rows];
            let below = details.len() - self.detail_scroll - self.detail_rows;
            let mut lines = vec![Line::from("Technical Details:").bold()];
            lines.extend(shown.iter().map(|l| Line::from(*l).fg(Color::Gray)));
            if below > 0 {
                lines.push(
                    Line::from(format!("… ({below} more lines, ↓ to scroll)")).fg(Color::DarkGray),
                );
            } else if self.detail_scroll > 0 {
                lines.push(
                    Line::from(format!("({} lines above, ↑ to scroll)", self.detail_scroll))
                        .fg(Color::DarkGray),
                );
            }
            f.render_widget(
                Paragraph::new(Text::from(lines)).style(Style::default().bg(DETAILS_BG)),
                details_area,
            );
        }

        let button = centered_rect_fixed(button_area, CLOSE_LABEL.len() as u16, 1);
        f.render_widget(
            Paragraph::new(CLOSE_LABEL).style(Style::default().fg(Color::Black).bg(accent).bold()),
            button,
        );
        self.close_button = Some(button);
        Ok(())
    }
}

/// Greedy word wrap; words wider than `width` are split.
fn wrap_words(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    for line in text.lines() {
        let mut row = String::new();
        let mut row_width = 0;
        for word in line.split_whitespace() {
            let word_width = Span::raw(word).width();
            if row_width > 0 && row_width + 1 + word_width <= width {
                row.push(' ');
                row.push_str(word);
                row_width += 1 + word_width;
                continue;
            }
            if row_width > 0 {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            for c in word.chars() {
                let w = Span::raw(c.to_string()).width();
                if row_width + w > width && row_width > 0 {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                row.push(c);
                row_width += w;
            }
        }
        rows.push(row);
    }
    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}
