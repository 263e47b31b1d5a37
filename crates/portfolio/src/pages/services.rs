use color_eyre::Result;
use crossterm::event::{KeyCode, MouseEventKind};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::Line,
    widgets::{Block, List, ListItem, ListState},
};

use super::{Page, PageKind};
use crate::{
    action::Action,
    tui::{Event, EventResponse, Frame},
};

/// Service tabs. The highlighted entry follows the keyboard and the mouse
/// pointer (hover).
pub struct ServicesPage {
    services: Vec<String>,
    state: ListState,
    list_area: Rect,
}

impl ServicesPage {
    pub fn new(services: Vec<String>) -> Self {
        Self {
            services,
            state: ListState::default().with_selected(Some(0)),
            list_area: Rect::default(),
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.state
            .selected()
            .and_then(|i| self.services.get(i))
            .map(String::as_str)
    }

    fn hovered_index(&self, column: u16, row: u16) -> Option<usize> {
        if !self.list_area.contains(Position::new(column, row)) {
            return None;
        }
        let index = self.state.offset() + usize::from(row - self.list_area.y);
        (index < self.services.len()).then_some(index)
    }
}

impl Page for ServicesPage {
    fn kind(&self) -> PageKind {
        PageKind::Services
    }

    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        match event {
            Event::Key(key) => {
                match key.code {
                    KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
                    KeyCode::Up | KeyCode::Char('k') => self.state.select_previous(),
                    KeyCode::Home => self.state.select_first(),
                    KeyCode::End => self.state.select_last(),
                    _ => return Ok(None),
                }
                Ok(Some(EventResponse::Stop(Action::Render)))
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved | MouseEventKind::Down(_) => {
                    match self.hovered_index(mouse.column, mouse.row) {
                        Some(index) => {
                            self.state.select(Some(index));
                            Ok(Some(EventResponse::Stop(Action::Render)))
                        }
                        None => Ok(None),
                    }
                }
                MouseEventKind::ScrollDown => {
                    self.state.select_next();
                    Ok(Some(EventResponse::Stop(Action::Render)))
                }
                MouseEventKind::ScrollUp => {
                    self.state.select_previous();
                    Ok(Some(EventResponse::Stop(Action::Render)))
                }
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let block = Block::bordered()
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Line::from(" Services ").bold());
        self.list_area = block.inner(area);

        let items: Vec<ListItem> = self
            .services
            .iter()
            .map(|s| ListItem::new(format!("  {s}")))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_symbol("▶")
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(list, area, &mut self.state);
        Ok(())
    }
}
