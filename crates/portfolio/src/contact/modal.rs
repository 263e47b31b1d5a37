use serde::Serialize;

/// Variant of the feedback dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalKind {
    Success,
    Error,
}

/// Feedback modal state owned by the orchestrator.
///
/// `kind == None` implies `is_open == false`. Closing keeps the last payload
/// around (only visibility changes), which lets the view fade out without
/// losing its text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModalState {
    pub is_open: bool,
    pub kind: Option<ModalKind>,
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

impl ModalState {
    pub fn show_success(&mut self, title: impl Into<String>, message: impl Into<String>) {
        *self = Self {
            is_open: true,
            kind: Some(ModalKind::Success),
            title: title.into(),
            message: message.into(),
            details: None,
        };
    }

    pub fn show_error(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        details: Option<String>,
    ) {
        *self = Self {
            is_open: true,
            kind: Some(ModalKind::Error),
            title: title.into(),
            message: message.into(),
            details,
        };
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Details are only ever rendered for the error variant.
    pub fn visible_details(&self) -> Option<&str> {
        match self.kind {
            Some(ModalKind::Error) => self.details.as_deref().filter(|d| !d.is_empty()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_closed_without_kind() {
        let modal = ModalState::default();
        assert!(!modal.is_open);
        assert_eq!(modal.kind, None);
    }

    #[test]
    fn success_drops_previous_details() {
        let mut modal = ModalState::default();
        modal.show_error("Error", "nope", Some("{}".into()));
        modal.show_success("Success!", "sent");
        assert!(modal.is_open);
        assert_eq!(modal.kind, Some(ModalKind::Success));
        assert_eq!(modal.details, None);
        assert_eq!(modal.visible_details(), None);
    }

    #[test]
    fn error_exposes_details_and_close_keeps_payload() {
        let mut modal = ModalState::default();
        modal.show_error("Error Sending Message", "failed", Some("{\"kind\":\"timeout\"}".into()));
        assert_eq!(modal.visible_details(), Some("{\"kind\":\"timeout\"}"));

        modal.close();
        assert!(!modal.is_open);
        assert_eq!(modal.title, "Error Sending Message");
    }
}
