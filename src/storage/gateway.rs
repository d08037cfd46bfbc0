//! Persistence Gateway — turns a resolution outcome into committed rows.
//!
//! Contract:
//!   - duplicate platform_link → return the prior row untouched
//!   - Matched → message insert only
//!   - Created → category + message as one transaction (BEGIN IMMEDIATE)
//!   - NeedsReview → no writes
//!
//! The category row must be visible before the message row references it;
//! the single transaction satisfies that ordering.

use rusqlite::Connection;

use crate::category::Category;
use crate::message::{Message, MessageDraft};
use crate::processing::resolver::Resolution;
use crate::{DigestError, DigestResult};

use super::categories::CategoryStorage;
use super::messages::MessageStorage;

/// What the gateway did with the draft.
#[derive(Debug)]
pub enum PersistOutcome {
    /// New row committed (with a new category row for `Created`).
    Inserted(Message),
    /// Same platform link seen before; prior row returned unchanged.
    Duplicate(Message),
    /// Low-confidence resolution; nothing written.
    ReviewOnly,
}

pub struct PersistenceGateway;

impl PersistenceGateway {
    pub fn persist(
        conn: &Connection,
        resolution: &Resolution,
        draft: MessageDraft,
    ) -> DigestResult<PersistOutcome> {
        // Idempotent re-processing guard, checked before any write.
        if let Some(prior) = MessageStorage::find_by_platform_link(conn, &draft.platform_link)? {
            tracing::info!(
                platform_link = %draft.platform_link,
                prior_id = %prior.id,
                "Skipping insert: message already archived"
            );
            return Ok(PersistOutcome::Duplicate(prior));
        }

        match resolution {
            Resolution::NeedsReview { candidate, .. } => {
                tracing::info!(candidate = %candidate, "Nothing persisted: resolution needs review");
                Ok(PersistOutcome::ReviewOnly)
            }
            Resolution::Matched(name) => {
                let message = draft.into_message(name);
                MessageStorage::insert(conn, &message)?;
                tracing::info!(id = %message.id, category = %name, "Message archived");
                Ok(PersistOutcome::Inserted(message))
            }
            Resolution::Created(name) => Self::persist_with_category(conn, draft, name),
        }
    }

    /// Category insert + message insert as a single atomic unit.
    fn persist_with_category(
        conn: &Connection,
        draft: MessageDraft,
        name: &str,
    ) -> DigestResult<PersistOutcome> {
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| DigestError::Storage(format!("Transaction begin failed: {}", e)))?;

        let result = Self::persist_with_category_inner(conn, draft, name);

        match result {
            Ok(message) => {
                conn.execute_batch("COMMIT")
                    .map_err(|e| DigestError::Storage(format!("Transaction commit failed: {}", e)))?;
                tracing::info!(id = %message.id, category = %name, "Message archived with new category");
                Ok(PersistOutcome::Inserted(message))
            }
            Err(e) => {
                conn.execute_batch("ROLLBACK").ok();
                Err(e)
            }
        }
    }

    fn persist_with_category_inner(
        conn: &Connection,
        draft: MessageDraft,
        name: &str,
    ) -> DigestResult<Message> {
        // A concurrent pipeline may have committed the name (any casing)
        // between snapshot and commit; reuse the stored spelling so the
        // message FK stays valid. BEGIN IMMEDIATE holds the write lock across
        // the check and the insert.
        let stored = match CategoryStorage::get_by_name_ci(conn, name)? {
            Some(existing) => {
                tracing::debug!(category = %existing.name, "Category already present at commit time");
                existing.name
            }
            None => {
                CategoryStorage::insert(conn, &Category::new(name))?;
                name.to_string()
            }
        };

        let message = draft.into_message(&stored);
        MessageStorage::insert(conn, &message)?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{setup_db, DraftBuilder};

    #[test]
    fn test_created_commits_category_and_message() {
        let conn = setup_db();
        let draft = DraftBuilder::new().platform_link("https://t.me/c/1/1").build();

        let outcome =
            PersistenceGateway::persist(&conn, &Resolution::Created("science".into()), draft)
                .unwrap();

        let msg = match outcome {
            PersistOutcome::Inserted(m) => m,
            other => panic!("expected Inserted, got {:?}", other),
        };
        assert_eq!(msg.category, "science");
        assert!(CategoryStorage::get_by_name(&conn, "science").unwrap().is_some());
        assert_eq!(MessageStorage::count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_matched_inserts_message_only() {
        let conn = setup_db();
        CategoryStorage::insert(&conn, &Category::new("technology")).unwrap();

        let draft = DraftBuilder::new().platform_link("https://t.me/c/1/2").build();
        PersistenceGateway::persist(&conn, &Resolution::Matched("technology".into()), draft)
            .unwrap();

        assert_eq!(CategoryStorage::count(&conn).unwrap(), 1);
        assert_eq!(MessageStorage::count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_needs_review_writes_nothing() {
        let conn = setup_db();
        let draft = DraftBuilder::new().platform_link("https://t.me/c/1/3").build();

        let outcome = PersistenceGateway::persist(
            &conn,
            &Resolution::NeedsReview {
                candidate: "maybe".into(),
                confidence: 0.2,
            },
            draft,
        )
        .unwrap();

        assert!(matches!(outcome, PersistOutcome::ReviewOnly));
        assert_eq!(CategoryStorage::count(&conn).unwrap(), 0);
        assert_eq!(MessageStorage::count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_platform_link_is_idempotent() {
        let conn = setup_db();

        let first = DraftBuilder::new()
            .platform_link("https://t.me/c/1/4")
            .summary("first pass")
            .build();
        let outcome =
            PersistenceGateway::persist(&conn, &Resolution::Created("news".into()), first).unwrap();
        let first_id = match outcome {
            PersistOutcome::Inserted(m) => m.id,
            other => panic!("expected Inserted, got {:?}", other),
        };

        // Re-deliveries resolve differently but must not create rows.
        for _ in 0..3 {
            let retry = DraftBuilder::new()
                .platform_link("https://t.me/c/1/4")
                .summary("retried pass")
                .build();
            let outcome =
                PersistenceGateway::persist(&conn, &Resolution::Created("other".into()), retry)
                    .unwrap();
            match outcome {
                PersistOutcome::Duplicate(prior) => {
                    assert_eq!(prior.id, first_id);
                    assert_eq!(prior.summary, "first pass");
                }
                other => panic!("expected Duplicate, got {:?}", other),
            }
        }

        assert_eq!(MessageStorage::count(&conn).unwrap(), 1);
        assert!(CategoryStorage::get_by_name(&conn, "other").unwrap().is_none());
    }

    #[test]
    fn test_created_rolls_back_category_when_message_insert_fails() {
        let conn = setup_db();

        // Seed a message so its primary key can collide with the next draft.
        let seed = DraftBuilder::new()
            .id("fixed-id")
            .platform_link("https://t.me/c/1/5")
            .build();
        PersistenceGateway::persist(&conn, &Resolution::Created("general".into()), seed).unwrap();

        // Same id, fresh platform link: passes dedup, fails on message insert
        // after the category row was written inside the transaction.
        let colliding = DraftBuilder::new()
            .id("fixed-id")
            .platform_link("https://t.me/c/1/6")
            .build();
        let result =
            PersistenceGateway::persist(&conn, &Resolution::Created("science".into()), colliding);

        assert!(result.is_err());
        assert!(
            CategoryStorage::get_by_name(&conn, "science").unwrap().is_none(),
            "category insert must be rolled back with the failed message insert"
        );
        assert_eq!(MessageStorage::count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_concurrent_created_same_name_is_absorbed() {
        let conn = setup_db();

        let a = DraftBuilder::new().platform_link("https://t.me/c/2/1").build();
        let b = DraftBuilder::new().platform_link("https://t.me/c/2/2").build();

        PersistenceGateway::persist(&conn, &Resolution::Created("travel".into()), a).unwrap();
        // Differently-cased race loser reuses the stored spelling.
        let outcome =
            PersistenceGateway::persist(&conn, &Resolution::Created("Travel".into()), b).unwrap();

        match outcome {
            PersistOutcome::Inserted(msg) => assert_eq!(msg.category, "travel"),
            other => panic!("expected Inserted, got {:?}", other),
        }
        assert_eq!(CategoryStorage::count(&conn).unwrap(), 1);
        assert_eq!(MessageStorage::count(&conn).unwrap(), 2);
    }
}
