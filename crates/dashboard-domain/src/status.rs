use serde::{Deserialize, Serialize};

pub const PENDING_STATUS: &str = "Pending";

const BADGE_BASE_CLASS: &str = "badge";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusLabel(String);

impl StatusLabel {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn pending() -> Self {
        Self::new(PENDING_STATUS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn style_class(&self) -> String {
        status_style_class(&self.0)
    }
}

impl Default for StatusLabel {
    fn default() -> Self {
        Self::pending()
    }
}

impl From<&str> for StatusLabel {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StatusLabel {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `In Progress` -> `status-in-progress`.
pub fn status_style_class(status: &str) -> String {
    format!("status-{}", status.to_lowercase().replace(' ', "-"))
}

/// Visible status pill of a table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBadge {
    pub text: String,
    pub style_class: String,
}

impl StatusBadge {
    pub fn for_status(status: &StatusLabel) -> Self {
        Self {
            text: status.as_str().to_owned(),
            style_class: status.style_class(),
        }
    }

    pub fn status(&self) -> StatusLabel {
        StatusLabel::new(self.text.clone())
    }

    pub fn class_attribute(&self) -> String {
        format!("{BADGE_BASE_CLASS} {}", self.style_class)
    }
}
