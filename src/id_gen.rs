use uuid::Uuid;

/// Unique ID for a category row (UUID v4 hex, 32 chars)
pub fn category_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Unique ID for an archived message row (UUID v4 hex, 32 chars)
pub fn message_id() -> String {
    Uuid::new_v4().simple().to_string()
}
