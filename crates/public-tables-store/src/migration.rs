//! Schema creation for SQLite.
//!
//! The backing database belongs to the host, so nothing beyond the single
//! `_public_tables` table is created in it: no version table, no indexes.

use rusqlite::{params, Connection};

use public_tables_core::PUBLIC_TABLES_TABLE;

use crate::error::Result;

/// SQL creating the public table list.
pub const CREATE_TABLE_SQL: &str = "CREATE TABLE _public_tables (table_name TEXT PRIMARY KEY)";

/// Whether a table with the given name exists in the database.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params![name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Create `_public_tables` if it is missing.
///
/// Returns `true` if the table was created. Idempotent.
pub fn ensure_schema(conn: &Connection) -> Result<bool> {
    if table_exists(conn, PUBLIC_TABLES_TABLE)? {
        return Ok(false);
    }
    conn.execute(CREATE_TABLE_SQL, [])?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_creates_only_public_tables() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(ensure_schema(&conn).unwrap());
        assert_eq!(tables(&conn), vec!["_public_tables".to_string()]);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(ensure_schema(&conn).unwrap());
        assert!(!ensure_schema(&conn).unwrap());
        assert!(!ensure_schema(&conn).unwrap());
        assert_eq!(tables(&conn).len(), 1);
    }

    #[test]
    fn test_existing_rows_survive() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE _public_tables (table_name TEXT PRIMARY KEY);
             INSERT INTO _public_tables VALUES ('t1');",
        )
        .unwrap();

        assert!(!ensure_schema(&conn).unwrap());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM _public_tables", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
