use crate::{DigestError, DigestResult};
use rusqlite::Connection;

/// Current schema version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Returns the applied schema version (0 if the table is absent).
pub fn get_schema_version(conn: &Connection) -> DigestResult<u32> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |r| r.get(0),
        )
        .map_err(|e| DigestError::Storage(e.to_string()))?;

    if !exists {
        return Ok(0);
    }

    let version: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .map_err(|e| DigestError::Storage(e.to_string()))?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: u32) -> DigestResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        rusqlite::params![version],
    )
    .map_err(|e| DigestError::Storage(e.to_string()))?;
    Ok(())
}

const ARCHIVE_DB_V1: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    source_url TEXT,
    platform_link TEXT NOT NULL UNIQUE,
    summary TEXT NOT NULL,
    category TEXT NOT NULL REFERENCES categories(name),
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_messages_category ON messages(category);
CREATE INDEX IF NOT EXISTS idx_messages_created ON messages(created_at);
";

/// Bring the archive DB up to the current schema. Idempotent.
pub fn migrate(conn: &Connection) -> DigestResult<()> {
    let version = get_schema_version(conn)?;

    if version < 1 {
        conn.execute_batch(ARCHIVE_DB_V1)
            .map_err(|e| DigestError::Storage(format!("Migration v1 failed: {}", e)))?;
        set_schema_version(conn, 1)?;
        tracing::info!(version = 1, "Applied archive schema migration");
    }

    Ok(())
}
