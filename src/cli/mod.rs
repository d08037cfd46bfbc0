pub mod categories;
pub mod config;
pub mod init;
pub mod process;
pub mod status;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::PathBuf;

use relay_digest::config::DigestConfig;
use relay_digest::storage::{database, migrations};

/// Resolve the database path: CLI flag > config override > data dir default.
pub fn resolve_db_path(flag: Option<&str>, cfg: &DigestConfig) -> PathBuf {
    match flag {
        Some(p) => PathBuf::from(p),
        None => cfg.resolve_db_path(),
    }
}

/// Open the archive DB and bring the schema up to date.
pub fn open_archive(path: &std::path::Path) -> Result<Connection> {
    let conn = database::open_connection(path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    migrations::migrate(&conn).context("Failed to migrate database")?;
    Ok(conn)
}
