//! Store trait: the abstract interface for the public table list.
//!
//! This trait keeps the permission logic storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Result of a write to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// A row was inserted or deleted.
    Changed,
    /// The table was already in the requested state.
    Unchanged,
}

/// Async interface for the public table list.
///
/// # Design Notes
///
/// - **Lazy schema**: [`ensure_schema`](Self::ensure_schema) runs once at
///   startup, before any lookup.
/// - **Idempotent writes**: repeating a write returns `Unchanged`.
/// - **Default private**: a name never written is not public.
#[async_trait]
pub trait PublicTableStore: Send + Sync {
    /// Create the backing table if it is missing.
    ///
    /// Returns `true` if the table was created by this call. Fails with
    /// [`StoreError::Immutable`](crate::StoreError::Immutable) when the
    /// backing database cannot be written, whether or not the table exists.
    async fn ensure_schema(&self) -> Result<bool>;

    /// Whether the named table is public.
    async fn is_public(&self, table_name: &str) -> Result<bool>;

    /// Mark the named table public.
    async fn set_public(&self, table_name: &str) -> Result<WriteResult>;

    /// Mark the named table private.
    async fn set_private(&self, table_name: &str) -> Result<WriteResult>;

    /// All public table names, sorted.
    async fn public_tables(&self) -> Result<Vec<String>>;

    /// Whether the backing database accepts writes.
    fn is_mutable(&self) -> bool;
}

#[async_trait]
impl<S: PublicTableStore + ?Sized> PublicTableStore for Arc<S> {
    async fn ensure_schema(&self) -> Result<bool> {
        (**self).ensure_schema().await
    }

    async fn is_public(&self, table_name: &str) -> Result<bool> {
        (**self).is_public(table_name).await
    }

    async fn set_public(&self, table_name: &str) -> Result<WriteResult> {
        (**self).set_public(table_name).await
    }

    async fn set_private(&self, table_name: &str) -> Result<WriteResult> {
        (**self).set_private(table_name).await
    }

    async fn public_tables(&self) -> Result<Vec<String>> {
        (**self).public_tables().await
    }

    fn is_mutable(&self) -> bool {
        (**self).is_mutable()
    }
}
