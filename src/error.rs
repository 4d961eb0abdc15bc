//! Error taxonomy for interactive operations.
//!
//! None of these are fatal: each is contained to the interaction that caused
//! it and surfaced to the user as a [`Notice`]. Out-of-range windows are not
//! errors at all; they are clamped by the viewport.

use thiserror::Error;

use crate::provider::ProviderError;

/// A malformed or unmatched user query. The window is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Annotation not found: {0}")]
    FeatureNotFound(String),

    #[error("No genome loaded")]
    NoGenome,
}

/// Any error an interaction can produce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrowserError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Data source error: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A one-line message for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }
}

impl From<&BrowserError> for Notice {
    fn from(err: &BrowserError) -> Self {
        let level = match err {
            BrowserError::Input(_) => NoticeLevel::Warning,
            BrowserError::Provider(_) => NoticeLevel::Error,
        };
        Self {
            level,
            text: err.to_string(),
        }
    }
}
