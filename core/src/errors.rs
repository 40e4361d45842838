//! Errors surfaced to the user by the gate and the import validator.
//!
//! Storage failures are not represented here. They are recovered or swallowed
//! by the persistence layer and never interrupt editing.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// No shared password is configured. The pending action is discarded.
    #[error("password is not configured; contact the administrator")]
    Configuration,
    /// Wrong password. The pending action is kept so the user can retry.
    #[error("incorrect password, please try again")]
    Authorization,
    #[error("there is no pending action to confirm")]
    NothingPending,
}

impl GateError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Authorization)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// Not a JSON array of objects.
    #[error("import failed: expected an array of categories ({0})")]
    Format(String),
    /// Array shape is right but the entries do not look like categories.
    #[error("import failed: data structure does not match ({0})")]
    Structure(String),
}
