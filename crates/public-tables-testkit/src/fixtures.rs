//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

/// Create `{dir}/{name}.db` and run `sql` against it.
pub fn database_file(dir: &Path, name: &str, sql: &str) -> PathBuf {
    let path = dir.join(format!("{name}.db"));
    let conn = Connection::open(&path).expect("open fixture database");
    conn.execute_batch(sql).expect("run fixture sql");
    // Make sure the file exists even when `sql` is empty.
    conn.execute_batch("VACUUM").expect("vacuum fixture database");
    path
}

/// Names of all tables (not views) in a database file, sorted.
pub fn table_names(path: &Path) -> Vec<String> {
    strings(
        path,
        "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
    )
}

/// Contents of `_public_tables` in a database file, sorted.
pub fn public_table_rows(path: &Path) -> Vec<String> {
    strings(
        path,
        "SELECT table_name FROM _public_tables ORDER BY table_name",
    )
}

fn strings(path: &Path, sql: &str) -> Vec<String> {
    let conn = Connection::open(path).expect("open database");
    let mut stmt = conn.prepare(sql).expect("prepare");
    let rows = stmt
        .query_map([], |row| row.get(0))
        .expect("query")
        .collect::<rusqlite::Result<Vec<String>>>()
        .expect("collect");
    rows
}

/// Insert a row into `_public_tables`, creating the table if needed.
pub fn mark_public(path: &Path, table: &str) {
    let conn = Connection::open(path).expect("open database");
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _public_tables (table_name TEXT PRIMARY KEY)",
        [],
    )
    .expect("create _public_tables");
    conn.execute(
        "INSERT OR IGNORE INTO _public_tables (table_name) VALUES (?1)",
        [table],
    )
    .expect("insert public table");
}

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
