//! Error definitions
//!
//! Launchers never fail on their own. These errors only describe how a
//! spawned task ended when it did not produce a value: the runtime reports
//! them through the task's handle. A work item's own `Err` is returned
//! inside the handle's `Ok` untouched.

use std::any::Any;

use thiserror::Error;

/// Main error type for launch-testkit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The work item panicked.
    #[error("Task panicked: {0}")]
    Panicked(String),

    /// The runtime dropped the task before it finished.
    #[error("Task was cancelled before completion")]
    Cancelled,
}

impl Error {
    /// Build a [`Error::Panicked`] from a panic payload.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked(message)
    }

    /// Whether this error came from a panic.
    #[must_use]
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
