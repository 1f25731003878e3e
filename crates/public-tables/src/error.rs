//! Error types for public tables.

use public_tables_perms::PermsError;
use public_tables_store::StoreError;
use thiserror::Error;

/// Errors that can occur during startup or while handling a request.
#[derive(Debug, Error)]
pub enum PublicTablesError {
    /// The add-on cannot run with this configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The actor may not manage privacy here.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The table or view does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The submitted form action is not a known transition.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Permission error.
    #[error("permission error: {0}")]
    Permission(#[from] PermsError),

    /// Failure reported by the host.
    #[error("host error: {0}")]
    Host(#[from] anyhow::Error),
}

impl PublicTablesError {
    /// HTTP status a host should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            PublicTablesError::Forbidden(_) => 403,
            PublicTablesError::NotFound(_) => 404,
            PublicTablesError::InvalidAction(_) => 400,
            PublicTablesError::Configuration(_)
            | PublicTablesError::Store(_)
            | PublicTablesError::Permission(_)
            | PublicTablesError::Host(_) => 500,
        }
    }
}

/// Result type for public tables operations.
pub type Result<T> = std::result::Result<T, PublicTablesError>;
