// === Retry / Backoff ===
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1_000;
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_BACKOFF_JITTER: f64 = 0.1;
pub const BACKOFF_MAX_MS: u64 = 30_000;

// === Summarizer ===
pub const SUMMARY_MAX_CHARS: usize = 200;
pub const SUMMARY_MIN_INPUT_CHARS: usize = 50; // shorter texts pass through verbatim
pub const SUMMARY_MAX_TOKENS: u32 = 300;

// === Category Resolver ===
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.5;
pub const MAX_PROMPT_EXAMPLES: usize = 5;
pub const FALLBACK_CATEGORY: &str = "general";
pub const MIN_SUBSTRING_MATCH_LEN: usize = 3; // shorter names need whole-text equality
pub const PROPOSAL_MAX_TOKENS: u32 = 200;
pub const VERIFICATION_MAX_TOKENS: u32 = 50;

// === Generative Text Service ===
pub const DEFAULT_LLM_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SUMMARY_LANGUAGE: &str = "Russian";

// === SQLite Tuning ===
pub const SQLITE_BUSY_TIMEOUT_MS: u32 = 5_000;

// === Schema ===
pub const SCHEMA_VERSION: u32 = 1;
