use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short, unique label classifying archived message content.
/// Rows are never mutated or deleted once created; uniqueness of `name`
/// is enforced at the schema level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Self {
            id: crate::id_gen::category_id(),
            name: name.to_string(),
            created_at: crate::time_utils::now(),
        }
    }
}
