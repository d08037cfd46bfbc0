use anyhow::Result;

use relay_digest::config::DigestConfig;
use relay_digest::storage::categories::CategoryStorage;
use relay_digest::storage::messages::MessageStorage;

/// relay-digest categories: list category names with archived-message counts.
pub fn run(db_flag: Option<&str>) -> Result<()> {
    let cfg = DigestConfig::load();
    let db_path = super::resolve_db_path(db_flag, &cfg);
    let conn = super::open_archive(&db_path)?;

    let categories = CategoryStorage::list(&conn)?;
    if categories.is_empty() {
        println!("No categories yet");
        return Ok(());
    }

    for category in categories {
        let count = MessageStorage::count_for_category(&conn, &category.name)?;
        println!(
            "{:<24} {:>5} message(s)   created {}",
            category.name,
            count,
            category.created_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}
