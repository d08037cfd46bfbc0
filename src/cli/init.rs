use anyhow::{Context, Result};

use relay_digest::config::DigestConfig;
use relay_digest::storage::paths;

/// relay-digest init: create the data dir, database, and default config.
pub fn run(db_flag: Option<&str>) -> Result<()> {
    let data_dir = paths::data_dir();
    std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;
    println!("Data directory: {}", data_dir.display());

    let cfg = DigestConfig::load();
    let db_path = super::resolve_db_path(db_flag, &cfg);

    let _conn = super::open_archive(&db_path)?;
    println!("  Archive database ready: {}", db_path.display());

    let config_path = paths::config_path();
    if !config_path.exists() {
        cfg.save_to(&config_path)
            .context("Failed to write default config")?;
        println!("  Wrote default config: {}", config_path.display());
    } else {
        println!("  Config already present: {}", config_path.display());
    }

    println!("Initialization complete");
    Ok(())
}
