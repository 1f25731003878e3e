//! SQLite implementation of the PublicTableStore trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, DatabaseName, ErrorCode, OpenFlags};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{PublicTableStore, WriteResult};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime. The connection may be shared with
/// the host that owns the database.
#[derive(Clone)]
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
    /// Whether writes are allowed: the caller's flag and the connection's
    /// own read-only state combined.
    mutable: bool,
}

impl SqliteStore {
    /// Open a SQLite database at the given path for reading and writing.
    ///
    /// Creates the file if it doesn't exist. The schema is not touched until
    /// [`ensure_schema`](PublicTableStore::ensure_schema) is called.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self::from_shared(Arc::new(Mutex::new(conn)), true))
    }

    /// Open an existing SQLite database read-only.
    pub fn open_immutable(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self::from_shared(Arc::new(Mutex::new(conn)), false))
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_shared(Arc::new(Mutex::new(conn)), true))
    }

    /// Wrap a connection owned by the host.
    ///
    /// `mutable: false` marks the store read-only even if the connection
    /// could write. A connection SQLite opened read-only is never treated
    /// as mutable.
    pub fn from_shared(conn: Arc<Mutex<Connection>>, mutable: bool) -> Self {
        let mutable = mutable && !connection_readonly(&conn);
        Self { conn, mutable }
    }

    /// Run a closure against the connection on the blocking pool.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || -> Result<T> {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
        .map_err(readonly_as_immutable)
    }

    fn check_mutable(&self) -> Result<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(StoreError::Immutable)
        }
    }
}

#[async_trait]
impl PublicTableStore for SqliteStore {
    async fn ensure_schema(&self) -> Result<bool> {
        self.check_mutable()?;

        let created = self.run(|conn| migration::ensure_schema(conn)).await?;
        if created {
            info!("created _public_tables");
        }
        Ok(created)
    }

    async fn is_public(&self, table_name: &str) -> Result<bool> {
        let name = table_name.to_string();

        let public = self
            .run(move |conn| {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM _public_tables WHERE table_name = ?1)",
                    params![name],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await?;

        debug!(table = table_name, public, "public table lookup");
        Ok(public)
    }

    async fn set_public(&self, table_name: &str) -> Result<WriteResult> {
        self.check_mutable()?;
        let name = table_name.to_string();

        self.run(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO _public_tables (table_name) VALUES (?1)",
                params![name],
            )?;
            Ok(written(inserted))
        })
        .await
    }

    async fn set_private(&self, table_name: &str) -> Result<WriteResult> {
        self.check_mutable()?;
        let name = table_name.to_string();

        self.run(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM _public_tables WHERE table_name = ?1",
                params![name],
            )?;
            Ok(written(deleted))
        })
        .await
    }

    async fn public_tables(&self) -> Result<Vec<String>> {
        self.run(|conn| {
            let mut stmt =
                conn.prepare("SELECT table_name FROM _public_tables ORDER BY table_name")?;

            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;

            Ok(names)
        })
        .await
    }

    fn is_mutable(&self) -> bool {
        self.mutable
    }
}

fn connection_readonly(conn: &Mutex<Connection>) -> bool {
    match conn.lock() {
        Ok(conn) => conn.is_readonly(DatabaseName::Main).unwrap_or(true),
        Err(_) => true,
    }
}

/// A write refused by SQLite itself means the database is read-only.
fn readonly_as_immutable(err: StoreError) -> StoreError {
    match err {
        StoreError::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: ErrorCode::ReadOnly,
                ..
            },
            _,
        )) => StoreError::Immutable,
        other => other,
    }
}

fn written(rows: usize) -> WriteResult {
    if rows > 0 {
        WriteResult::Changed
    } else {
        WriteResult::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    async fn ready_store() -> SqliteStore {
        let store = SqliteStore::open_memory().unwrap();
        store.ensure_schema().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_unknown_table_is_private() {
        let store = ready_store().await;
        assert!(!store.is_public("t1").await.unwrap());
        assert!(store.public_tables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_public_then_private() {
        let store = ready_store().await;

        assert_eq!(store.set_public("t1").await.unwrap(), WriteResult::Changed);
        assert!(store.is_public("t1").await.unwrap());

        assert_eq!(store.set_private("t1").await.unwrap(), WriteResult::Changed);
        assert!(!store.is_public("t1").await.unwrap());
    }

    #[tokio::test]
    async fn test_idempotent_writes() {
        let store = ready_store().await;

        store.set_public("t1").await.unwrap();
        assert_eq!(
            store.set_public("t1").await.unwrap(),
            WriteResult::Unchanged
        );
        assert_eq!(store.public_tables().await.unwrap(), vec!["t1".to_string()]);

        assert_eq!(
            store.set_private("t2").await.unwrap(),
            WriteResult::Unchanged
        );
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let store = ready_store().await;
        store.set_public("Items").await.unwrap();

        assert!(store.is_public("Items").await.unwrap());
        assert!(!store.is_public("items").await.unwrap());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.ensure_schema().await.unwrap();
            store.set_public("t1").await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert!(!store.ensure_schema().await.unwrap());
        assert!(store.is_public("t1").await.unwrap());
    }

    #[tokio::test]
    async fn test_immutable_rejects_schema_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE t1 (id INTEGER)")
            .unwrap();

        let store = SqliteStore::open_immutable(&path).unwrap();
        assert!(!store.is_mutable());
        assert!(matches!(
            store.ensure_schema().await,
            Err(StoreError::Immutable)
        ));
        assert!(matches!(
            store.set_public("t1").await,
            Err(StoreError::Immutable)
        ));
    }

    #[tokio::test]
    async fn test_shared_readonly_connection_is_immutable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE t1 (id INTEGER)")
            .unwrap();

        let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY).unwrap();
        let store = SqliteStore::from_shared(Arc::new(Mutex::new(conn)), true);

        assert!(!store.is_mutable());
        assert!(matches!(
            store.ensure_schema().await,
            Err(StoreError::Immutable)
        ));
    }

    #[test]
    fn test_readonly_failure_maps_to_immutable() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA query_only = ON").unwrap();
        let err = conn.execute_batch("CREATE TABLE t1 (id INTEGER)").unwrap_err();

        assert!(matches!(
            readonly_as_immutable(StoreError::Database(err)),
            StoreError::Immutable
        ));
        assert!(matches!(
            readonly_as_immutable(StoreError::Task("boom".into())),
            StoreError::Task(_)
        ));
    }

    #[tokio::test]
    async fn test_shared_connection_sees_rows() {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let store = SqliteStore::from_shared(Arc::clone(&conn), true);
        store.ensure_schema().await.unwrap();
        store.set_public("t1").await.unwrap();

        let count: i64 = conn
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM _public_tables", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Public(String),
        Private(String),
    }

    fn op() -> impl Strategy<Value = Op> {
        let name = prop::sample::select(vec!["t1", "t2", "v1", "Items"]);
        prop_oneof![
            name.clone().prop_map(|n| Op::Public(n.to_string())),
            name.prop_map(|n| Op::Private(n.to_string())),
        ]
    }

    proptest! {
        #[test]
        fn matches_set_model(ops in prop::collection::vec(op(), 0..24)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            rt.block_on(async {
                let store = ready_store().await;
                let mut model = BTreeSet::new();

                for op in &ops {
                    match op {
                        Op::Public(name) => {
                            let changed = model.insert(name.clone());
                            let result = store.set_public(name).await.unwrap();
                            assert_eq!(result == WriteResult::Changed, changed);
                        }
                        Op::Private(name) => {
                            let changed = model.remove(name);
                            let result = store.set_private(name).await.unwrap();
                            assert_eq!(result == WriteResult::Changed, changed);
                        }
                    }
                }

                let expected: Vec<String> = model.iter().cloned().collect();
                assert_eq!(store.public_tables().await.unwrap(), expected);
                for name in ["t1", "t2", "v1", "Items", "missing"] {
                    assert_eq!(store.is_public(name).await.unwrap(), model.contains(name));
                }
            });
        }
    }
}
