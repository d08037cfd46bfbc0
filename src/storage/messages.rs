use crate::message::Message;
use crate::time_utils;
use crate::{DigestError, DigestResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub struct MessageStorage;

// ── Row mapping ──

fn message_from_row(row: &Row) -> rusqlite::Result<Message> {
    let created_str: String = row.get("created_at")?;
    Ok(Message {
        id: row.get("id")?,
        source_url: row.get("source_url")?,
        platform_link: row.get("platform_link")?,
        summary: row.get("summary")?,
        category: row.get("category")?,
        created_at: time_utils::from_sqlite(&created_str).unwrap_or_else(|_| time_utils::now()),
    })
}

// ── CRUD ──

impl MessageStorage {
    pub fn insert(conn: &Connection, message: &Message) -> DigestResult<()> {
        conn.execute(
            "INSERT INTO messages (id, source_url, platform_link, summary, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                message.id,
                message.source_url,
                message.platform_link,
                message.summary,
                message.category,
                time_utils::to_sqlite(&message.created_at)
            ],
        )?;
        Ok(())
    }

    pub fn get(conn: &Connection, id: &str) -> DigestResult<Option<Message>> {
        conn.query_row(
            "SELECT id, source_url, platform_link, summary, category, created_at
             FROM messages WHERE id = ?1",
            params![id],
            message_from_row,
        )
        .optional()
        .map_err(DigestError::from)
    }

    /// Dedup lookup: the platform link is the stable per-message identity.
    pub fn find_by_platform_link(
        conn: &Connection,
        platform_link: &str,
    ) -> DigestResult<Option<Message>> {
        conn.query_row(
            "SELECT id, source_url, platform_link, summary, category, created_at
             FROM messages WHERE platform_link = ?1",
            params![platform_link],
            message_from_row,
        )
        .optional()
        .map_err(DigestError::from)
    }

    pub fn count(conn: &Connection) -> DigestResult<u64> {
        let n: u64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))?;
        Ok(n)
    }

    pub fn count_for_category(conn: &Connection, category: &str) -> DigestResult<u64> {
        let n: u64 = conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE category = ?1",
            params![category],
            |r| r.get(0),
        )?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::storage::categories::CategoryStorage;
    use crate::test_helpers::{setup_db, DraftBuilder};

    #[test]
    fn test_insert_and_find_by_platform_link() {
        let conn = setup_db();
        CategoryStorage::insert(&conn, &Category::new("technology")).unwrap();

        let msg = DraftBuilder::new()
            .platform_link("https://t.me/c/123/7")
            .summary("A phone launch")
            .build()
            .into_message("technology");
        MessageStorage::insert(&conn, &msg).unwrap();

        let found = MessageStorage::find_by_platform_link(&conn, "https://t.me/c/123/7")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, msg.id);
        assert_eq!(found.category, "technology");
        assert!(MessageStorage::find_by_platform_link(&conn, "https://t.me/c/123/8")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_platform_link_unique() {
        let conn = setup_db();
        CategoryStorage::insert(&conn, &Category::new("news")).unwrap();

        let link = "https://t.me/c/9/1";
        let first = DraftBuilder::new().platform_link(link).build().into_message("news");
        let second = DraftBuilder::new().platform_link(link).build().into_message("news");

        MessageStorage::insert(&conn, &first).unwrap();
        assert!(MessageStorage::insert(&conn, &second).is_err());
    }

    #[test]
    fn test_count_for_category() {
        let conn = setup_db();
        CategoryStorage::insert(&conn, &Category::new("science")).unwrap();
        CategoryStorage::insert(&conn, &Category::new("news")).unwrap();

        for i in 0..3 {
            let msg = DraftBuilder::new()
                .platform_link(&format!("https://t.me/c/1/{}", i))
                .build()
                .into_message("science");
            MessageStorage::insert(&conn, &msg).unwrap();
        }

        assert_eq!(MessageStorage::count_for_category(&conn, "science").unwrap(), 3);
        assert_eq!(MessageStorage::count_for_category(&conn, "news").unwrap(), 0);
        assert_eq!(MessageStorage::count(&conn).unwrap(), 3);
    }
}
