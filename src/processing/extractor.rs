//! Extraction — plain text, source URL, and platform link from a raw payload.
//!
//! Pure functions, no network or storage access. Extraction never fails:
//! missing text yields an empty string, missing links yield None.

use crate::payload::ForwardedPayload;

/// Everything the pipeline needs from a raw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub text: String,
    pub source_url: Option<String>,
    pub platform_link: String,
}

pub fn extract(payload: &ForwardedPayload) -> Extracted {
    Extracted {
        text: payload.text.clone(),
        source_url: extract_source_url(payload),
        platform_link: platform_link(payload.chat_id, payload.message_id),
    }
}

/// First URL entity wins; otherwise the first URL-looking token in the body.
pub fn extract_source_url(payload: &ForwardedPayload) -> Option<String> {
    for entity in &payload.entities {
        if entity.kind == "url" {
            let url: String = payload
                .text
                .chars()
                .skip(entity.offset)
                .take(entity.length)
                .collect();
            if !url.is_empty() {
                return Some(url);
            }
        }
    }

    let re = regex::Regex::new(r"https?://[^\s]+").unwrap();
    re.find(&payload.text).map(|m| m.as_str().to_string())
}

/// Stable per-message link. Supergroup/channel chat ids carry a -100 prefix
/// that the web link format omits.
pub fn platform_link(chat_id: i64, message_id: i64) -> String {
    let chat = chat_id.to_string();
    let chat = chat.strip_prefix("-100").unwrap_or(&chat);
    format!("https://t.me/c/{}/{}", chat, message_id)
}
