use color_eyre::Result;
use crossterm::event::{KeyCode, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};

use super::{Page, PageKind};
use crate::{
    action::Action,
    content::AcademicRole,
    tui::{Event, EventResponse, Frame},
};

/// Scrollable list of academic roles.
pub struct RolesPage {
    roles: Vec<AcademicRole>,
    scroll: u16,
    content_height: u16,
    viewport_height: u16,
}

impl RolesPage {
    pub fn new(roles: Vec<AcademicRole>) -> Self {
        Self {
            roles,
            scroll: 0,
            content_height: 0,
            viewport_height: 0,
        }
    }

    fn max_scroll(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.max_scroll()));
        self.scroll = next as u16;
    }

    fn text(&self) -> Text<'static> {
        let mut lines = Vec::new();
        for role in &self.roles {
            lines.push(Line::from(vec![
                Span::styled(
                    role.role.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(role.duration.clone(), Style::default().fg(Color::DarkGray)),
            ]));
            lines.push(Line::from(role.institution.clone()).italic());
            lines.push(Line::raw(""));
            lines.push(Line::from(role.description.clone()));
            if !role.achievements.is_empty() {
                lines.push(Line::raw(""));
                lines.push(Line::from("Achievements:").bold());
                for achievement in &role.achievements {
                    lines.push(Line::from(format!("  • {achievement}")));
                }
            }
            lines.push(Line::raw(""));
        }
        Text::from(lines)
    }
}

impl Page for RolesPage {
    fn kind(&self) -> PageKind {
        PageKind::Roles
    }

    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        match event {
            Event::Key(key) => {
                let delta = match key.code {
                    KeyCode::Down | KeyCode::Char('j') => 1,
                    KeyCode::Up | KeyCode::Char('k') => -1,
                    KeyCode::PageDown => i32::from(self.viewport_height.max(1)),
                    KeyCode::PageUp => -i32::from(self.viewport_height.max(1)),
                    KeyCode::Home => -i32::from(self.scroll),
                    KeyCode::End => i32::from(self.max_scroll()),
                    _ => return Ok(None),
                };
                self.scroll_by(delta);
                Ok(Some(EventResponse::Stop(Action::Render)))
            }
            Event::Mouse(mouse) => {
                match mouse.kind {
                    MouseEventKind::ScrollDown => self.scroll_by(3),
                    MouseEventKind::ScrollUp => self.scroll_by(-3),
                    _ => return Ok(None),
                }
                Ok(Some(EventResponse::Stop(Action::Render)))
            }
            _ => Ok(None),
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let block = Block::bordered()
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Line::from(" Academic Roles ").bold());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body, bar] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
        let text = self.text();
        self.content_height = wrapped_height(&text, body.width);
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
        self.viewport_height = body.height;
        self.scroll = self.scroll.min(self.max_scroll());
        frame.render_widget(paragraph.scroll((self.scroll, 0)), body);

        let mut state = ScrollbarState::new(self.max_scroll() as usize).position(self.scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            bar,
            &mut state,
        );
        Ok(())
    }

    fn on_enter(&mut self) -> Result<()> {
        self.scroll = 0;
        Ok(())
    }
}

/// Rows `text` needs when wrapped to `width` columns (approximate for word wrap).
fn wrapped_height(text: &Text<'_>, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    text.lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum::<usize>()
        .try_into()
        .unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::{content::Content, tui::testing::buffer_text};

    #[test]
    fn renders_roles_and_achievements() {
        let content = Content::bundled().unwrap();
        let first = content.academic_roles[0].clone();
        let mut page = RolesPage::new(content.academic_roles);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| page.draw(f, f.area()).unwrap()).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains(&first.role));
        assert!(text.contains(&first.institution));
        assert!(text.contains("Achievements:"));
    }
}
