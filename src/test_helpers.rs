//! Shared test utilities — builders, DB setup, scripted generator mock.
//!
//! Available only under `#[cfg(test)]`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::Connection;

use crate::message::MessageDraft;
use crate::payload::{ForwardOrigin, ForwardedPayload, LinkEntity};
use crate::provider::TextGenerator;
use crate::storage::migrations;
use crate::{DigestError, DigestResult};

// ============================================================================
// PayloadBuilder
// ============================================================================

pub struct PayloadBuilder {
    payload: ForwardedPayload,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self {
            payload: ForwardedPayload {
                text: "Test payload content".to_string(),
                entities: vec![],
                forward_origin: Some(ForwardOrigin {
                    sender_name: Some("test-channel".to_string()),
                    chat_title: None,
                }),
                chat_id: -1001234567890,
                message_id: 1,
            },
        }
    }

    pub fn text(mut self, t: &str) -> Self {
        self.payload.text = t.to_string();
        self
    }

    pub fn chat(mut self, chat_id: i64, message_id: i64) -> Self {
        self.payload.chat_id = chat_id;
        self.payload.message_id = message_id;
        self
    }

    pub fn url_entity(mut self, offset: usize, length: usize) -> Self {
        self.payload.entities.push(LinkEntity {
            kind: "url".to_string(),
            offset,
            length,
        });
        self
    }

    pub fn not_forwarded(mut self) -> Self {
        self.payload.forward_origin = None;
        self
    }

    pub fn build(self) -> ForwardedPayload {
        self.payload
    }
}

// ============================================================================
// DraftBuilder
// ============================================================================

pub struct DraftBuilder {
    draft: MessageDraft,
}

impl DraftBuilder {
    pub fn new() -> Self {
        Self {
            draft: MessageDraft::new(
                None,
                format!("https://t.me/c/1/{}", crate::id_gen::message_id()),
                "Test summary".to_string(),
            ),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.draft.id = id.to_string();
        self
    }

    pub fn platform_link(mut self, link: &str) -> Self {
        self.draft.platform_link = link.to_string();
        self
    }

    pub fn summary(mut self, s: &str) -> Self {
        self.draft.summary = s.to_string();
        self
    }

    pub fn source_url(mut self, url: &str) -> Self {
        self.draft.source_url = Some(url.to_string());
        self
    }

    pub fn build(self) -> MessageDraft {
        self.draft
    }
}

// ============================================================================
// MockGenerator — scripted generative-service stand-in
// ============================================================================

/// Returns queued responses in order and counts every call, so tests can
/// assert both behavior and call-avoidance.
pub struct MockGenerator {
    responses: Mutex<VecDeque<DigestResult<String>>>,
    calls: AtomicUsize,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_responses(responses: Vec<&str>) -> Self {
        let gen = Self::new();
        for r in responses {
            gen.push_response(r);
        }
        gen
    }

    pub fn push_response(&self, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.to_string()));
    }

    pub fn push_error(&self, error: DigestError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextGenerator for MockGenerator {
    fn id(&self) -> &str {
        "mock"
    }

    fn generate(&self, _prompt: &str, _max_tokens: u32) -> DigestResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DigestError::Provider("mock responses exhausted".into())))
    }
}

// ============================================================================
// DB setup helpers
// ============================================================================

/// Create an in-memory archive DB with all migrations applied.
pub fn setup_db() -> Connection {
    let conn = Connection::open(":memory:").unwrap();
    conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
    migrations::migrate(&conn).unwrap();
    conn
}
