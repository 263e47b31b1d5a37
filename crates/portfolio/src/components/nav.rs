use color_eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::Line,
    widgets::{Block, Tabs},
};

use super::Component;
use crate::{
    action::Action,
    pages::PageKind,
    tui::{EventResponse, Frame},
};

/// Page navigation header.
pub struct NavComponent {
    active: PageKind,
    tab_areas: Vec<(PageKind, Rect)>,
}

impl NavComponent {
    pub fn new(active: PageKind) -> Self {
        Self {
            active,
            tab_areas: Vec::new(),
        }
    }
}

impl Component for NavComponent {
    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<EventResponse<Action>>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        let pos = Position::new(mouse.column, mouse.row);
        Ok(self
            .tab_areas
            .iter()
            .find(|(_, area)| area.contains(pos))
            .map(|(kind, _)| EventResponse::Stop(Action::Navigate(*kind))))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Navigate(kind) = action {
            self.active = kind;
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let block = Block::bordered()
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Portfolio ");
        let inner = block.inner(area);

        let titles: Vec<Line> = PageKind::ALL
            .iter()
            .map(|kind| Line::from(kind.title()))
            .collect();
        let selected = PageKind::ALL
            .iter()
            .position(|k| *k == self.active)
            .unwrap_or_default();
        let tabs = Tabs::new(titles)
            .block(block)
            .select(selected)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        f.render_widget(tabs, area);

        // Tabs lays out " title " followed by a one column divider.
        self.tab_areas.clear();
        let mut x = inner.x;
        for kind in PageKind::ALL {
            let width = kind.title().chars().count() as u16 + 2;
            self.tab_areas
                .push((kind, Rect::new(x, inner.y, width, 1).intersection(inner)));
            x = x.saturating_add(width + 1);
        }
        Ok(())
    }
}
