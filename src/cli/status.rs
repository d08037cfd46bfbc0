use anyhow::Result;

use relay_digest::config::DigestConfig;
use relay_digest::storage::categories::CategoryStorage;
use relay_digest::storage::messages::MessageStorage;
use relay_digest::storage::migrations;

/// relay-digest status: archive counts and schema version.
pub fn run(db_flag: Option<&str>) -> Result<()> {
    let cfg = DigestConfig::load();
    let db_path = super::resolve_db_path(db_flag, &cfg);
    let conn = super::open_archive(&db_path)?;

    println!("Database: {}", db_path.display());
    println!("Schema version: {}", migrations::get_schema_version(&conn)?);
    println!("Categories: {}", CategoryStorage::count(&conn)?);
    println!("Messages: {}", MessageStorage::count(&conn)?);
    Ok(())
}
