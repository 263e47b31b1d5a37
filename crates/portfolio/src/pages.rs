use color_eyre::Result;
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    action::Action,
    tui::{Event, EventResponse, Frame},
};

mod contact;
mod roles;
mod services;

pub use contact::ContactPage;
pub use roles::RolesPage;
pub use services::ServicesPage;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PageKind {
    Roles,
    Services,
    Contact,
}

impl PageKind {
    pub const ALL: [PageKind; 3] = [PageKind::Roles, PageKind::Services, PageKind::Contact];

    pub const fn title(self) -> &'static str {
        match self {
            PageKind::Roles => "Academic Roles",
            PageKind::Services => "Services",
            PageKind::Contact => "Contact",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or_default()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A `Page` fills the body between navigation header and footer. Exactly one
/// page is active; only the active page receives terminal events.
pub trait Page {
    fn kind(&self) -> PageKind;

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        let _ = tx;
        Ok(())
    }

    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        let _ = event;
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()>;

    /// Called when the page becomes active.
    fn on_enter(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when the page is being replaced.
    fn on_exit(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn next_and_prev_wrap_around() {
        assert_eq!(PageKind::Contact.next(), PageKind::Roles);
        assert_eq!(PageKind::Roles.prev(), PageKind::Contact);
        assert_eq!(PageKind::Roles.next().next(), PageKind::Contact);
    }

    #[test]
    fn page_names_match_cli_values() {
        assert_eq!(PageKind::Services.to_string(), "services");
        assert!(<PageKind as clap::ValueEnum>::from_str("contact", true).is_ok());
    }
}
