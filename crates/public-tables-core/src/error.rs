//! Error types for the public tables core.

use thiserror::Error;

/// Errors raised while parsing core values from untrusted input.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown toggle action: {0:?}")]
    UnknownToggleAction(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
