use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::{action::Action, pages::PageKind, tui::Frame};

/// Bottom line: key hints for the active page plus the LinkedIn profile.
pub struct FooterComponent {
    page: PageKind,
    linkedin_url: String,
}

impl FooterComponent {
    pub fn new(page: PageKind, linkedin_url: impl Into<String>) -> Self {
        Self {
            page,
            linkedin_url: linkedin_url.into(),
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match self.page {
            PageKind::Roles => &[("↑↓", "scroll"), ("←→", "pages"), ("q", "quit")],
            PageKind::Services => &[("↑↓", "select"), ("←→", "pages"), ("q", "quit")],
            PageKind::Contact => &[
                ("Tab", "next field"),
                ("Ctrl+S", "send"),
                ("Ctrl+N/P", "pages"),
                ("Ctrl+C", "quit"),
            ],
        }
    }
}

impl Component for FooterComponent {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Navigate(kind) = action {
            self.page = kind;
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(self.linkedin_url.len() as u16)])
                .areas(area);

        let key_style = Style::default().fg(Color::Cyan);
        let text_style = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::new();
        for (key, label) in self.hints() {
            spans.push(Span::styled(format!(" {key}"), key_style));
            spans.push(Span::styled(format!(" {label} "), text_style));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), left);
        f.render_widget(
            Paragraph::new(self.linkedin_url.as_str()).style(text_style).right_aligned(),
            right,
        );
        Ok(())
    }
}
