//! In-memory implementation of the PublicTableStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeSet;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::traits::{PublicTableStore, WriteResult};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    tables: RwLock<BTreeSet<String>>,
    mutable: bool,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(BTreeSet::new()),
            mutable: true,
        }
    }

    /// Create a store that refuses schema creation and writes.
    pub fn immutable() -> Self {
        Self {
            tables: RwLock::new(BTreeSet::new()),
            mutable: false,
        }
    }

    /// Create a store with some tables already public.
    pub fn with_public<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tables: RwLock::new(names.into_iter().map(Into::into).collect()),
            mutable: true,
        }
    }

    fn check_mutable(&self) -> Result<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(StoreError::Immutable)
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Poisoned(e.to_string())
}

#[async_trait]
impl PublicTableStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<bool> {
        self.check_mutable()?;
        Ok(false)
    }

    async fn is_public(&self, table_name: &str) -> Result<bool> {
        let tables = self.tables.read().map_err(poisoned)?;
        Ok(tables.contains(table_name))
    }

    async fn set_public(&self, table_name: &str) -> Result<WriteResult> {
        self.check_mutable()?;
        let mut tables = self.tables.write().map_err(poisoned)?;

        if tables.insert(table_name.to_string()) {
            Ok(WriteResult::Changed)
        } else {
            Ok(WriteResult::Unchanged)
        }
    }

    async fn set_private(&self, table_name: &str) -> Result<WriteResult> {
        self.check_mutable()?;
        let mut tables = self.tables.write().map_err(poisoned)?;

        if tables.remove(table_name) {
            Ok(WriteResult::Changed)
        } else {
            Ok(WriteResult::Unchanged)
        }
    }

    async fn public_tables(&self) -> Result<Vec<String>> {
        let tables = self.tables.read().map_err(poisoned)?;
        Ok(tables.iter().cloned().collect())
    }

    fn is_mutable(&self) -> bool {
        self.mutable
    }
}
