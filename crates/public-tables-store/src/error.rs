//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The backing database cannot be written to.
    #[error("backing database is immutable")]
    Immutable,

    /// The connection lock was poisoned by a panicking holder.
    #[error("connection lock poisoned: {0}")]
    Poisoned(String),

    /// The blocking task running a statement failed.
    #[error("blocking task failed: {0}")]
    Task(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
