//! Anthropic Messages API client — the production `TextGenerator`.
//!
//! One synchronous POST per call with a global timeout. Errors are split
//! into transient (timeout, 429, 5xx, connection trouble — retried by the
//! caller's policy) and permanent (auth, 4xx, malformed body).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::provider::TextGenerator;
use crate::{DigestError, DigestResult};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

pub struct AnthropicGenerator {
    api_key: String,
    model: String,
    timeout: Duration,
}

impl AnthropicGenerator {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self {
            api_key,
            model,
            timeout,
        }
    }

    /// Build from config, reading the API key from the environment.
    pub fn from_env(cfg: &LlmConfig) -> DigestResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| DigestError::Provider(format!("{} not set", API_KEY_ENV)))?;
        Ok(Self::new(
            api_key,
            cfg.model.clone(),
            Duration::from_secs(cfg.timeout_secs),
        ))
    }

    fn classify_error(e: &ureq::Error) -> DigestError {
        match e {
            ureq::Error::StatusCode(code) if *code == 429 || *code >= 500 => {
                DigestError::Transient(format!("HTTP {}", code))
            }
            ureq::Error::StatusCode(code) => DigestError::Provider(format!("HTTP {}", code)),
            ureq::Error::Timeout(_) => DigestError::Transient(format!("request timed out: {}", e)),
            ureq::Error::Io(_) | ureq::Error::ConnectionFailed | ureq::Error::HostNotFound => {
                DigestError::Transient(e.to_string())
            }
            other => DigestError::Provider(other.to_string()),
        }
    }
}

impl TextGenerator for AnthropicGenerator {
    fn id(&self) -> &str {
        "anthropic"
    }

    fn generate(&self, prompt: &str, max_tokens: u32) -> DigestResult<String> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), max_tokens, "Generation request");

        let body = ApiRequest {
            model: &self.model,
            max_tokens,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut response = ureq::post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .config()
            .timeout_global(Some(self.timeout))
            .build()
            .send(serde_json::to_vec(&body)?.as_slice())
            .map_err(|e| Self::classify_error(&e))?;

        let parsed: ApiResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| DigestError::Provider(format!("Malformed API response: {}", e)))?;

        let text: String = parsed
            .content
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(DigestError::Provider("Empty completion returned".into()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_transient_vs_permanent() {
        assert!(AnthropicGenerator::classify_error(&ureq::Error::StatusCode(429)).is_transient());
        assert!(AnthropicGenerator::classify_error(&ureq::Error::StatusCode(503)).is_transient());
        assert!(!AnthropicGenerator::classify_error(&ureq::Error::StatusCode(401)).is_transient());
        assert!(!AnthropicGenerator::classify_error(&ureq::Error::StatusCode(400)).is_transient());
    }

    #[test]
    fn test_from_env_requires_key() {
        // The variable is absent in test runs unless exported by the caller.
        if std::env::var(API_KEY_ENV).is_err() {
            let result = AnthropicGenerator::from_env(&LlmConfig::default());
            assert!(matches!(result, Err(DigestError::Provider(_))));
        }
    }
}
