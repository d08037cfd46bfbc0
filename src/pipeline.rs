//! Orchestrator — one sequential pass per forwarded payload.
//!
//! Received → Extracted → Summarized → Categorized → Persisted → Reported,
//! with any stage failure going straight to Failed(reason). Retries live
//! inside the summarizer/resolver calls; the orchestrator never re-runs a
//! stage. Every payload produces exactly one report.

use rusqlite::Connection;

use crate::config::DigestConfig;
use crate::message::MessageDraft;
use crate::payload::ForwardedPayload;
use crate::processing::extractor;
use crate::processing::resolver::{CategoryResolver, Resolution};
use crate::processing::summarizer::Summarizer;
use crate::provider::TextGenerator;
use crate::storage::categories::CategoryStorage;
use crate::storage::gateway::{PersistOutcome, PersistenceGateway};
use crate::DigestResult;

/// Terminal outcome reported back to the sender.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineReport {
    Archived {
        message_id: String,
        summary: String,
        category: String,
        source_url: Option<String>,
    },
    /// Same platform link was processed before; prior record left unchanged.
    Duplicate { message_id: String },
    /// Summary produced, category withheld pending manual review.
    ReviewPending { summary: String, candidate: String },
    /// Nothing to process (e.g. no text content).
    Skipped { reason: String },
    Failed { reason: String },
}

impl PipelineReport {
    /// One human-readable status line block per processed payload.
    pub fn render(&self) -> String {
        match self {
            Self::Archived {
                summary,
                category,
                source_url,
                ..
            } => format!(
                "Archived\nSummary: {}\nCategory: {}\nSource: {}",
                summary,
                category,
                source_url.as_deref().unwrap_or("not found"),
            ),
            Self::Duplicate { message_id } => {
                format!("Already processed earlier (message {})", message_id)
            }
            Self::ReviewPending { summary, candidate } => format!(
                "Summary: {}\nCategory pending review: low confidence for \"{}\"",
                summary, candidate,
            ),
            Self::Skipped { reason } => format!("Skipped: {}", reason),
            Self::Failed { reason } => format!("Processing failed: {}", reason),
        }
    }
}

pub struct Pipeline<'a> {
    conn: &'a Connection,
    generator: &'a dyn TextGenerator,
    summarizer: Summarizer,
    resolver: CategoryResolver,
}

impl<'a> Pipeline<'a> {
    pub fn new(conn: &'a Connection, generator: &'a dyn TextGenerator, cfg: &DigestConfig) -> Self {
        Self {
            conn,
            generator,
            summarizer: Summarizer::new(cfg),
            resolver: CategoryResolver::new(cfg),
        }
    }

    /// Run the pipeline, mapping failures into a report. Infallible from the
    /// caller's view — the sender always gets a status back.
    pub fn run(&self, payload: &ForwardedPayload) -> PipelineReport {
        match self.process(payload) {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Pipeline failed");
                PipelineReport::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// The staged pass itself; errors bubble up for `run` to report.
    pub fn process(&self, payload: &ForwardedPayload) -> DigestResult<PipelineReport> {
        let extracted = extractor::extract(payload);
        tracing::info!(
            platform_link = %extracted.platform_link,
            has_url = extracted.source_url.is_some(),
            text_len = extracted.text.len(),
            "Payload extracted"
        );

        if extracted.text.trim().is_empty() {
            return Ok(PipelineReport::Skipped {
                reason: "no text content".into(),
            });
        }

        let summary = self.summarizer.summarize(self.generator, &extracted.text)?;

        // Fresh snapshot per resolution; a concurrent Created commit is
        // tolerated (see gateway).
        let existing = CategoryStorage::list_names(self.conn)?;
        let resolution = self
            .resolver
            .resolve(self.generator, &extracted.text, &existing)?;

        let draft = MessageDraft::new(
            extracted.source_url.clone(),
            extracted.platform_link.clone(),
            summary.clone(),
        );

        match PersistenceGateway::persist(self.conn, &resolution, draft)? {
            PersistOutcome::Inserted(message) => Ok(PipelineReport::Archived {
                message_id: message.id,
                summary: message.summary,
                category: message.category,
                source_url: message.source_url,
            }),
            PersistOutcome::Duplicate(prior) => Ok(PipelineReport::Duplicate {
                message_id: prior.id,
            }),
            PersistOutcome::ReviewOnly => match resolution {
                Resolution::NeedsReview { candidate, .. } => Ok(PipelineReport::ReviewPending {
                    summary,
                    candidate,
                }),
                // persist only returns ReviewOnly for NeedsReview
                _ => unreachable!("ReviewOnly outcome from a non-review resolution"),
            },
        }
    }
}
