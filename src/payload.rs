use serde::{Deserialize, Serialize};

/// A text span annotation supplied by the chat gateway (offsets in characters).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
    pub length: usize,
}

/// Metadata about where a forwarded message originally came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardOrigin {
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub chat_title: Option<String>,
}

/// Raw forwarded-message payload as delivered by the chat gateway.
///
/// The transport itself is out of scope; this is the shape handed to the
/// pipeline after delivery (CLI stdin, library call).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardedPayload {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub entities: Vec<LinkEntity>,
    #[serde(default)]
    pub forward_origin: Option<ForwardOrigin>,
    pub chat_id: i64,
    pub message_id: i64,
}

impl ForwardedPayload {
    pub fn is_forwarded(&self) -> bool {
        self.forward_origin.is_some()
    }
}
