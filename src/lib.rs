//! Relay Digest — forwarded-message summarize-and-archive pipeline.
//!
//! Takes forwarded-message payloads, produces a short summary and a category
//! via a generative text service, and archives the result in SQLite with
//! idempotent deduplication and an anti-duplicate category workflow.

// Foundation types
pub mod constants;
pub mod error;
pub mod id_gen;
pub mod time_utils;

// Core types
pub mod category;
pub mod config;
pub mod message;
pub mod payload;
pub mod provider;
pub mod retry;

// Sub-systems
pub mod llm;
pub mod pipeline;
pub mod processing;
pub mod storage;
pub mod tracing_init;

#[cfg(test)]
pub mod test_helpers;

// Re-exports for convenience
pub use error::{DigestError, DigestResult};
