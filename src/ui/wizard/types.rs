//! Type definitions for the wizard screen

use std::path::PathBuf;

use crate::submission::ListingPayload;

/// What the event loop should do after a key press
#[derive(Debug)]
pub enum WizardResult {
    /// Nothing beyond redrawing
    Continue,
    /// Leave the wizard; the draft stays in session storage
    Quit,
    /// Read a photo from disk into `slot`
    LoadPhoto { slot: usize, path: PathBuf },
    /// Send the assembled listing to the backend
    Submit(ListingPayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line message shown under the current screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}
