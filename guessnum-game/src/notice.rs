//! Outcome events handed to the notification collaborator.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Styling tag the UI uses to render a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Info,
    Success,
    Error,
    TooHigh,
    TooLow,
}

impl Severity {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::TooHigh => "too-high",
            Self::TooLow => "too-low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A message plus its severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
