//! Bundled, read-only portfolio content.

use serde::Deserialize;
use thiserror::Error;

const BUNDLED: &str = include_str!("../assets/data.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid content data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("content has no {0}")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub location: String,
    /// Display handle.
    pub linkedin: String,
    pub linkedin_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AcademicRole {
    pub role: String,
    pub institution: String,
    pub duration: String,
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub contact: ContactDetails,
    pub academic_roles: Vec<AcademicRole>,
    pub services: Vec<String>,
}

impl Content {
    pub fn bundled() -> Result<Self, ContentError> {
        Self::parse(BUNDLED)
    }

    pub fn parse(raw: &str) -> Result<Self, ContentError> {
        let content: Content = serde_json::from_str(raw)?;
        if content.services.is_empty() {
            return Err(ContentError::Empty("services"));
        }
        if content.academic_roles.is_empty() {
            return Err(ContentError::Empty("academic roles"));
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_content_parses() {
        let content = Content::bundled().unwrap();
        assert_eq!(content.services.len(), 6);
        assert_eq!(content.services[1], "Water and Wastewater Treatment");
        assert!(content.contact.linkedin_url.starts_with("https://www.linkedin.com/in/"));
        assert!(content.academic_roles.iter().all(|r| !r.achievements.is_empty()));
    }

    #[test]
    fn empty_services_are_rejected() {
        let raw = r#"{
            "contact": {"email": "a@b.c", "phone": "1", "location": "x", "linkedin": "l", "linkedinUrl": "u"},
            "academicRoles": [{"role": "r", "institution": "i", "duration": "d", "description": "x"}],
            "services": []
        }"#;
        assert!(matches!(Content::parse(raw), Err(ContentError::Empty("services"))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(Content::parse("{"), Err(ContentError::Parse(_))));
    }
}
