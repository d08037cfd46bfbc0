use crate::category::Category;
use crate::time_utils;
use crate::{DigestError, DigestResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub struct CategoryStorage;

// ── Row mapping ──

fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    let created_str: String = row.get("created_at")?;
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: time_utils::from_sqlite(&created_str).unwrap_or_else(|_| time_utils::now()),
    })
}

// ── CRUD ──

impl CategoryStorage {
    pub fn insert(conn: &Connection, category: &Category) -> DigestResult<()> {
        conn.execute(
            "INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![
                category.id,
                category.name,
                time_utils::to_sqlite(&category.created_at)
            ],
        )?;
        Ok(())
    }

    /// Fresh snapshot of all category names, sorted.
    pub fn list_names(conn: &Connection) -> DigestResult<Vec<String>> {
        let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(DigestError::from)
    }

    pub fn list(conn: &Connection) -> DigestResult<Vec<Category>> {
        let mut stmt =
            conn.prepare("SELECT id, name, created_at FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], category_from_row)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(DigestError::from)
    }

    pub fn get_by_name(conn: &Connection, name: &str) -> DigestResult<Option<Category>> {
        conn.query_row(
            "SELECT id, name, created_at FROM categories WHERE name = ?1",
            params![name],
            category_from_row,
        )
        .optional()
        .map_err(DigestError::from)
    }

    /// Case-insensitive lookup preserving the stored spelling; storage itself
    /// stays case-sensitive.
    pub fn get_by_name_ci(conn: &Connection, name: &str) -> DigestResult<Option<Category>> {
        conn.query_row(
            "SELECT id, name, created_at FROM categories WHERE LOWER(name) = LOWER(?1)",
            params![name],
            category_from_row,
        )
        .optional()
        .map_err(DigestError::from)
    }

    pub fn count(conn: &Connection) -> DigestResult<u64> {
        let n: u64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
        Ok(n)
    }
}
