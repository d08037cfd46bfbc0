use crate::constants::SQLITE_BUSY_TIMEOUT_MS;
use crate::{DigestError, DigestResult};
use rusqlite::Connection;

/// Open a SQLite connection with the pragmas the pipeline relies on:
/// - journal_mode = WAL (concurrent pipeline instances share the file)
/// - busy_timeout = SQLITE_BUSY_TIMEOUT_MS (constants.rs)
/// - synchronous = NORMAL
/// - foreign_keys = ON (messages.category → categories.name)
/// - temp_store = MEMORY
pub fn open_connection(path: &std::path::Path) -> DigestResult<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)
        .map_err(|e| DigestError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), "Database connection opened");

    configure(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> DigestResult<()> {
    conn.execute_batch(&format!(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = {};
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA temp_store = MEMORY;",
        SQLITE_BUSY_TIMEOUT_MS,
    ))
    .map_err(|e| DigestError::Storage(format!("Failed to configure pragmas: {}", e)))?;
    Ok(())
}
