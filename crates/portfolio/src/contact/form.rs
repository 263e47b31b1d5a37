//! Contact form model.
//!
//! `FormInput` always carries all four fields; an empty string means the field
//! has not been filled in yet. The key set is closed (`Field`), so updates can
//! only ever target one of the recognised names.
//!
//! Required-field and e-mail checks live here as pure helpers. They are applied
//! by the contact page before a submit is forwarded, which keeps invalid input
//! away from the orchestrator entirely.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// One of the four recognised contact form fields.
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
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    /// Human readable label used by the form and by validation hints.
    pub const fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Subject => "Subject",
            Field::Message => "Message",
        }
    }
}

/// Values captured by the contact form.
///
/// Serializes to the flat `{name, email, subject, message}` map the form relay
/// expects as request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    name: String,
    email: String,
    subject: String,
    message: String,
}

impl FormInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    /// Replace the value of exactly one field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Subject => &mut self.subject,
            Field::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// Restore every field to the empty sentinel.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// Fields that are still unfilled (whitespace counts as unfilled).
    pub fn missing_required(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    /// First client-side problem that would block a submit, in field order.
    pub fn first_issue(&self) -> Option<FieldIssue> {
        if let Some(field) = self.missing_required().into_iter().next() {
            return Some(FieldIssue {
                field,
                kind: IssueKind::Missing,
            });
        }
        if !looks_like_email(&self.email) {
            return Some(FieldIssue {
                field: Field::Email,
                kind: IssueKind::InvalidEmail,
            });
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    InvalidEmail,
}

/// A client-side validation problem, shown as an inline hint on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: Field,
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IssueKind::Missing => write!(f, "Please fill out the {} field.", self.field.label()),
            IssueKind::InvalidEmail => write!(f, "Please enter a valid email address."),
        }
    }
}

/// Same shape check a browser applies to `type="email"` inputs: one `@`,
/// non-empty local part and domain, no whitespace.
fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn ada() -> FormInput {
        FormInput::new("Ada", "ada@x.io", "Hi", "Hello")
    }

    #[test]
    fn set_touches_only_the_target_field() {
        for field in Field::ALL {
            let before = ada();
            let mut after = before.clone();
            after.set(field, "changed");
            for other in Field::ALL {
                if other == field {
                    assert_eq!(after.get(other), "changed");
                } else {
                    assert_eq!(after.get(other), before.get(other));
                }
            }
        }
    }

    #[test]
    fn reset_clears_all_fields() {
        let mut form = ada();
        form.reset();
        assert!(form.is_blank());
        assert_eq!(form, FormInput::default());
    }

    #[test]
    fn payload_serializes_to_flat_map() {
        let json = serde_json::to_value(ada()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Ada",
                "email": "ada@x.io",
                "subject": "Hi",
                "message": "Hello"
            })
        );
    }

    #[test]
    fn field_names_parse_and_unknown_names_fail() {
        assert_eq!(Field::from_str("email").unwrap(), Field::Email);
        assert_eq!(Field::Message.as_ref(), "message");
        assert!(Field::from_str("phone").is_err());
    }

    #[test]
    fn missing_required_reports_in_field_order() {
        let form = FormInput::new("", "ada@x.io", "  ", "Hello");
        assert_eq!(form.missing_required(), vec![Field::Name, Field::Subject]);
        assert_eq!(
            form.first_issue().map(|i| i.to_string()),
            Some("Please fill out the Name field.".to_string())
        );
    }

    #[test]
    fn email_shape_is_checked_after_presence() {
        let mut form = ada();
        form.set(Field::Email, "ada at x.io");
        assert_eq!(
            form.first_issue(),
            Some(FieldIssue {
                field: Field::Email,
                kind: IssueKind::InvalidEmail
            })
        );
        form.set(Field::Email, "ada@x.io");
        assert_eq!(form.first_issue(), None);
    }

    #[test]
    fn email_shape_rejects_edge_cases() {
        assert!(!looks_like_email("@x.io"));
        assert!(!looks_like_email("ada@"));
        assert!(!looks_like_email("ada@@x.io"));
        assert!(!looks_like_email("ada@.io"));
        assert!(looks_like_email("ada@localhost"));
    }
}
