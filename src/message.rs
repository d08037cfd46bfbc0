use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An archived forwarded message. Immutable after insertion; `category`
/// references an existing `Category.name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub source_url: Option<String>,
    pub platform_link: String,
    pub summary: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Message fields collected by the pipeline before a category is assigned.
/// The persistence gateway combines this with the resolution outcome.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub id: String,
    pub source_url: Option<String>,
    pub platform_link: String,
    pub summary: String,
}

impl MessageDraft {
    pub fn new(source_url: Option<String>, platform_link: String, summary: String) -> Self {
        Self {
            id: crate::id_gen::message_id(),
            source_url,
            platform_link,
            summary,
        }
    }

    pub fn into_message(self, category: &str) -> Message {
        Message {
            id: self.id,
            source_url: self.source_url,
            platform_link: self.platform_link,
            summary: self.summary,
            category: category.to_string(),
            created_at: crate::time_utils::now(),
        }
    }
}
