//! # Public Tables Store
//!
//! Storage abstraction for the list of public tables. Provides a trait-based
//! interface with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The list is a single table, `_public_tables(table_name TEXT PRIMARY KEY)`,
//! living in one designated host database. A name present in the table is
//! public; a missing name is private.
//!
//! ## Key Types
//!
//! - [`PublicTableStore`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`WriteResult`] - Whether a write changed anything
//!
//! ## Usage
//!
//! ```rust,no_run
//! use public_tables_store::{PublicTableStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("data.db").unwrap();
//!     store.ensure_schema().await.unwrap();
//!
//!     store.set_public("t1").await.unwrap();
//!     assert!(store.is_public("t1").await.unwrap());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent writes**: `set_public` twice leaves one row; `set_private`
//!   on a private table is a no-op
//! - **Single statements**: every operation is one SQL statement, so
//!   concurrent toggles never observe a half-written state
//! - **Name-only key**: the database a table belongs to is not part of the
//!   key, so same-named tables in different databases share one flag

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{PublicTableStore, WriteResult};
