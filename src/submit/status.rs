//! The status display: a single region showing progress, success or failure.
//!
//! Every render overwrites the previous one. Implementations decide how the
//! region looks (a terminal spinner in the CLI, a plain snapshot in
//! [`MemoryStatus`]).

use std::sync::{Mutex, PoisonError};

use super::constants::MSG_FAILURE_BANNER;
use super::error::SubmitError;

/// Visual state of the status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Neutral status message; a submission is running.
    InProgress,
    /// The document was generated and staged.
    Success,
    /// The submission failed; the message explains why.
    Error,
}

impl StatusKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InProgress => "in_progress",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Sink for status updates.
///
/// Implementations must treat each call as replacing whatever was shown
/// before.
pub trait StatusDisplay: Send + Sync {
    /// Replaces the displayed state and message.
    fn render(&self, kind: StatusKind, message: &str);

    fn show_status(&self, message: &str) {
        self.render(StatusKind::InProgress, message);
    }

    fn show_success(&self, message: &str) {
        self.render(StatusKind::Success, message);
    }

    fn show_error(&self, message: &str) {
        self.render(StatusKind::Error, message);
    }
}

/// Failure message: the fixed banner, a newline, then the error description.
#[must_use]
pub fn failure_message(error: &SubmitError) -> String {
    format!("{MSG_FAILURE_BANNER}\n{error}")
}

/// Latest state of a [`MemoryStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub kind: StatusKind,
    pub message: String,
    /// Number of renders so far.
    pub renders: u64,
}

/// Status display that only remembers the latest render.
#[derive(Debug, Default)]
pub struct MemoryStatus {
    state: Mutex<StatusSnapshot>,
}

impl MemoryStatus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn kind(&self) -> StatusKind {
        self.snapshot().kind
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.snapshot().message
    }
}

impl StatusDisplay for MemoryStatus {
    fn render(&self, kind: StatusKind, message: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.kind = kind;
        state.message.clear();
        state.message.push_str(message);
        state.renders += 1;
    }
}
