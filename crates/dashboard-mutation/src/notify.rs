use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn css_class(&self) -> String {
        format!("flash {}", self.severity.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification surface unavailable: {0}")]
    Unavailable(String),
}

/// Fire-and-forget user feedback.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::{Notification, Severity};

    #[test]
    fn css_class_follows_severity() {
        assert_eq!(Notification::success("Updated").css_class(), "flash success");
        assert_eq!(Notification::error("Update failed").css_class(), "flash error");
        assert_eq!(
            serde_json::to_string(&Severity::Error).expect("serialize severity"),
            "\"error\""
        );
    }
}
