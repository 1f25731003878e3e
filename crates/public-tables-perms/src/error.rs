//! Error types for the permissions module.

use thiserror::Error;

/// Errors that can occur during permission checks.
#[derive(Debug, Error)]
pub enum PermsError {
    /// The public table list could not be read.
    #[error("store error: {0}")]
    Store(#[from] public_tables_store::StoreError),

    /// A nested permission check failed inside the host.
    #[error("permission check failed: {0}")]
    Check(String),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
