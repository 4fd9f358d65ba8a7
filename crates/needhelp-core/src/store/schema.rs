//! SQLite schema for persisted scores, versioned through `PRAGMA user_version`.

use rusqlite::Connection;

use crate::errors::{NeedHelpError, NeedHelpResult};

/// Layout version written to `user_version` once the tables exist.
pub const SCHEMA_VERSION: i32 = 1;

/// Core DDL statements: 2 CREATE TABLE + 1 CREATE INDEX.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS runs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        records_read INTEGER NOT NULL,
        popular_packages INTEGER NOT NULL,
        top_packages INTEGER NOT NULL,
        help_packages INTEGER NOT NULL,
        scored_packages INTEGER NOT NULL,
        elapsed_ms INTEGER NOT NULL,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    );",
    "CREATE TABLE IF NOT EXISTS package_scores (
        run_id INTEGER NOT NULL REFERENCES runs(id),
        position INTEGER NOT NULL,
        package TEXT NOT NULL,
        score REAL NOT NULL,
        PRIMARY KEY(run_id, position)
    );",
    "CREATE INDEX IF NOT EXISTS idx_package_scores_package ON package_scores(package);",
];

/// Create the tables on a fresh database and stamp [`SCHEMA_VERSION`].
///
/// A database already at the current version is left untouched. One written
/// by a newer layout is refused rather than written to.
pub fn init_schema(conn: &Connection) -> NeedHelpResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    let version = get_schema_version(conn)?;
    if version > SCHEMA_VERSION {
        return Err(NeedHelpError::Sink(format!(
            "database schema version {version} is newer than supported version {SCHEMA_VERSION}"
        )));
    }
    if version == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    for stmt in SCHEMA_STATEMENTS {
        tx.execute_batch(stmt)?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

/// Read `PRAGMA user_version`; 0 for a database never initialised here.
pub fn get_schema_version(conn: &Connection) -> NeedHelpResult<i32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
