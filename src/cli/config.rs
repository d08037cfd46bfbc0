use anyhow::{Context, Result};

use relay_digest::config::DigestConfig;
use relay_digest::storage::paths;

/// relay-digest config show: print the effective configuration.
pub fn run_show() -> Result<()> {
    let cfg = DigestConfig::load();
    let json = serde_json::to_string_pretty(&cfg).context("Failed to serialize config")?;
    println!("# {}", paths::config_path().display());
    println!("{}", json);
    Ok(())
}
