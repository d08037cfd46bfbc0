//! Pipeline configuration — retry policy, thresholds, prompt and service
//! settings.
//!
//! Loaded from `config.json` in the data dir with tolerant partial parsing:
//! recognized keys override the defaults, unknown keys are ignored, a missing
//! or unreadable file means pure defaults. Secrets (the API key) come from
//! the environment, never from the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::retry::RetryPolicy;

/// Generative text service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Language the summaries are written in.
    pub summary_language: String,
    pub summary_max_chars: usize,

    /// Retry policy shared by the summarizer and both resolver calls.
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_multiplier: f64,
    pub backoff_jitter: f64,

    /// Proposals below this confidence are routed to manual review.
    pub low_confidence_threshold: f64,
    /// Worked examples included in the classification prompt.
    pub max_prompt_examples: usize,

    pub llm: LlmConfig,

    /// Database file override; `None` resolves to the data dir.
    pub db_path: Option<PathBuf>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            summary_language: DEFAULT_SUMMARY_LANGUAGE.to_string(),
            summary_max_chars: SUMMARY_MAX_CHARS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            backoff_jitter: DEFAULT_BACKOFF_JITTER,
            low_confidence_threshold: LOW_CONFIDENCE_THRESHOLD,
            max_prompt_examples: MAX_PROMPT_EXAMPLES,
            llm: LlmConfig::default(),
            db_path: None,
        }
    }
}

impl DigestConfig {
    /// Load from the default config path. Missing file → defaults.
    pub fn load() -> Self {
        Self::load_from(&crate::storage::paths::config_path())
    }

    /// Load from an explicit path with tolerant partial parsing.
    pub fn load_from(path: &Path) -> Self {
        let mut cfg = Self::default();

        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return cfg,
        };

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(v) => cfg.apply_json(&v),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unparseable config file");
            }
        }

        cfg
    }

    fn apply_json(&mut self, v: &serde_json::Value) {
        let Some(obj) = v.as_object() else { return };

        if let Some(s) = obj.get("summary_language").and_then(|v| v.as_str()) {
            self.summary_language = s.to_string();
        }
        if let Some(n) = obj.get("summary_max_chars").and_then(|v| v.as_u64()) {
            self.summary_max_chars = n as usize;
        }
        if let Some(n) = obj.get("max_attempts").and_then(|v| v.as_u64()) {
            self.max_attempts = n as u32;
        }
        if let Some(n) = obj.get("backoff_base_ms").and_then(|v| v.as_u64()) {
            self.backoff_base_ms = n;
        }
        if let Some(f) = obj.get("backoff_multiplier").and_then(|v| v.as_f64()) {
            self.backoff_multiplier = f;
        }
        if let Some(f) = obj.get("backoff_jitter").and_then(|v| v.as_f64()) {
            self.backoff_jitter = f;
        }
        if let Some(f) = obj.get("low_confidence_threshold").and_then(|v| v.as_f64()) {
            self.low_confidence_threshold = f;
        }
        if let Some(n) = obj.get("max_prompt_examples").and_then(|v| v.as_u64()) {
            self.max_prompt_examples = n as usize;
        }
        if let Some(s) = obj.get("db_path").and_then(|v| v.as_str()) {
            self.db_path = Some(PathBuf::from(s));
        }
        if let Some(llm) = obj.get("llm").and_then(|v| v.as_object()) {
            if let Some(s) = llm.get("model").and_then(|v| v.as_str()) {
                self.llm.model = s.to_string();
            }
            if let Some(n) = llm.get("timeout_secs").and_then(|v| v.as_u64()) {
                self.llm.timeout_secs = n;
            }
        }
    }

    /// Write the current configuration as pretty JSON (used by `init`).
    pub fn save_to(&self, path: &Path) -> crate::DigestResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay_ms: self.backoff_base_ms,
            multiplier: self.backoff_multiplier,
            jitter: self.backoff_jitter,
        }
    }

    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(crate::storage::paths::db_path)
    }
}
