//! Versioned schema for the SQLite block store.
//!
//! Each entry in [`MIGRATIONS`] lifts the schema by one version. Applied
//! versions are recorded in `schema_version`; opening a database runs
//! whatever is missing, in one transaction.

use rusqlite::{params, Connection};

use crate::error::{Result, StoreError};

/// Ordered schema steps. Index `i` moves the schema to version `i + 1`.
const MIGRATIONS: &[&str] = &[
    // v1: one row per sealed block, height dense from 0
    r#"
    CREATE TABLE blocks (
        height        INTEGER PRIMARY KEY,
        hash          BLOB NOT NULL,
        previous_hash BLOB,
        timestamp     INTEGER NOT NULL,
        payload       BLOB NOT NULL
    );

    -- not unique: corrupted rows must still load so validation can flag them
    CREATE INDEX idx_blocks_hash ON blocks(hash);
    "#,
];

/// Schema version this build writes.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the schema up to [`CURRENT_VERSION`].
///
/// Safe to call on every open. Fails if the file was written by a newer
/// build.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL DEFAULT (unixepoch())
        )",
    )?;

    let found = schema_version(conn)?;
    if found > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "schema version {found} is newer than this build ({CURRENT_VERSION})"
        )));
    }

    let pending = &MIGRATIONS[found as usize..];
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (offset, sql) in pending.iter().enumerate() {
        let version = found + offset as u32 + 1;
        tx.execute_batch(sql)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (?1)", params![version])?;
        tracing::debug!(version, "schema migrated");
    }
    tx.commit()?;

    Ok(())
}

/// Highest applied schema version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    Ok(conn.query_row(
        "SELECT IFNULL(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_fresh_database_gets_blocks_table() {
        let conn = fresh();

        let columns: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('blocks') ORDER BY cid")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();

        assert_eq!(
            columns,
            ["height", "hash", "previous_hash", "timestamp", "payload"]
        );
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_rerun_is_noop() {
        let mut conn = fresh();
        migrate(&mut conn).unwrap();

        let rows: u32 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, CURRENT_VERSION);
    }

    #[test]
    fn test_newer_schema_refused() {
        let mut conn = fresh();
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![CURRENT_VERSION + 1],
        )
        .unwrap();

        assert!(matches!(migrate(&mut conn), Err(StoreError::Migration(_))));
    }
}
