//! Retry with exponential backoff for external calls.
//!
//! The policy is an explicit value passed to call sites, not ambient control
//! flow. Only `DigestError::Transient` is retried; permanent errors surface
//! immediately.

use std::time::Duration;

use crate::constants::{
    BACKOFF_MAX_MS, DEFAULT_BACKOFF_BASE_MS, DEFAULT_BACKOFF_JITTER, DEFAULT_BACKOFF_MULTIPLIER,
    DEFAULT_MAX_ATTEMPTS,
};
use crate::{DigestError, DigestResult};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt cap, first call included.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub multiplier: f64,
    /// Fraction of the computed delay added at random (0.1 = up to +10%).
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BACKOFF_BASE_MS,
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            jitter: DEFAULT_BACKOFF_JITTER,
        }
    }
}

impl RetryPolicy {
    /// Policy with no sleeping between attempts. Used by tests and callers
    /// that handle pacing themselves.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            multiplier: 1.0,
            jitter: 0.0,
        }
    }

    /// Delay before retrying after `attempt` (0-based) failed.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.base_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        let jittered = exp * (1.0 + self.jitter * subsec_fraction());
        Duration::from_millis((jittered as u64).min(BACKOFF_MAX_MS))
    }
}

/// Cheap jitter source in [0, 1). Backoff desynchronization does not need a
/// real RNG.
fn subsec_fraction() -> f64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    (nanos % 1_000) as f64 / 1_000.0
}

/// Run `op` up to `policy.max_attempts` times, sleeping between transient
/// failures. Permanent errors are returned on first occurrence.
pub fn call_with_retry<T, F>(policy: &RetryPolicy, label: &str, mut op: F) -> DigestResult<T>
where
    F: FnMut() -> DigestResult<T>,
{
    let mut last_err = None;

    for attempt in 0..policy.max_attempts {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if e.is_transient() => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max = policy.max_attempts,
                    error = %e,
                    "{} transient failure",
                    label
                );
                if attempt + 1 < policy.max_attempts {
                    std::thread::sleep(policy.delay_for(attempt));
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    tracing::error!(max = policy.max_attempts, "{}: retry attempts exhausted", label);
    Err(last_err.unwrap_or_else(|| DigestError::Transient("no attempts were made".into())))
}
