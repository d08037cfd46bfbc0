use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestError {
    /// Recoverable service errors (timeouts, rate limits, 5xx). Retried by policy.
    #[error("Transient service error: {0}")]
    Transient(String),

    /// Summary could not be produced after the retry cap was exhausted.
    #[error("Summarization failed: {0}")]
    SummarizationFailed(String),

    /// Category resolution (proposal or verification) exhausted its retries.
    #[error("Categorization failed: {0}")]
    CategorizationFailed(String),

    /// Business-logic storage errors (dedup lookup, rollback, invalid state)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Permanent generative-service errors (bad credentials, 4xx, malformed body)
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raw database errors from rusqlite
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Date parse errors from chrono
    #[error("Date parse error: {0}")]
    DateParse(#[from] chrono::ParseError),
}

impl DigestError {
    /// Only transient errors are eligible for retry with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

pub type DigestResult<T> = Result<T, DigestError>;
