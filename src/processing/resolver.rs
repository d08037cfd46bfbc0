//! Category Resolver — match-first classification with an anti-duplicate
//! verification round-trip.
//!
//! Flow per candidate text, against a fresh snapshot of category names:
//!   1. Match pass: case-insensitive lookup of existing names in the text.
//!      A hit short-circuits — zero model calls, and it always wins over
//!      whatever the model would have said.
//!   2. Proposal pass: model picks an existing name or proposes one new
//!      short name, with a stated confidence.
//!   3. Confidence gate: below threshold → NeedsReview, nothing persisted.
//!   4. Verification pass: a genuinely new name goes through a second,
//!      narrower call checking for semantic near-duplicates ("technology"
//!      vs "tech news"); a flagged duplicate redirects to Matched.
//!
//! Retry exhaustion at either call surfaces as CategorizationFailed.

use crate::config::DigestConfig;
use crate::constants::{
    FALLBACK_CATEGORY, MIN_SUBSTRING_MATCH_LEN, PROPOSAL_MAX_TOKENS, VERIFICATION_MAX_TOKENS,
};
use crate::provider::TextGenerator;
use crate::retry::{self, RetryPolicy};
use crate::{DigestError, DigestResult};

/// Outcome of resolving one candidate text.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// An existing category fits; no category write needed.
    Matched(String),
    /// A new unique name, cleared by the verification pass.
    Created(String),
    /// Confidence below threshold; flagged for manual follow-up.
    NeedsReview { candidate: String, confidence: f64 },
}

/// Worked examples included in the proposal prompt to stabilize the format.
const PROMPT_EXAMPLES: &[(&str, &str, &str, &str)] = &[
    (
        "The new iPhone 15 ships with an improved camera and the A17 chip",
        "consumer electronics launch, mobile hardware",
        "technology",
        "0.9",
    ),
    (
        "The president signed a new tax bill into law today",
        "political news, state governance",
        "news",
        "0.8",
    ),
    (
        "Great film! Outstanding acting and a gripping plot",
        "opinion about a movie, quality assessment",
        "review",
        "0.85",
    ),
    (
        "How to cook perfect pasta carbonara: secrets from a chef",
        "culinary topic, recipe and technique",
        "cooking",
        "0.9",
    ),
    (
        "The dollar gained 2%; analysts expect the rally to continue",
        "financial markets, economic indicators",
        "finance",
        "0.85",
    ),
];

pub struct CategoryResolver {
    threshold: f64,
    max_examples: usize,
    policy: RetryPolicy,
}

impl CategoryResolver {
    pub fn new(cfg: &DigestConfig) -> Self {
        Self {
            threshold: cfg.low_confidence_threshold,
            max_examples: cfg.max_prompt_examples,
            policy: cfg.retry_policy(),
        }
    }

    #[cfg(test)]
    pub fn with_policy(threshold: f64, max_examples: usize, policy: RetryPolicy) -> Self {
        Self {
            threshold,
            max_examples,
            policy,
        }
    }

    pub fn resolve(
        &self,
        generator: &dyn TextGenerator,
        text: &str,
        existing: &[String],
    ) -> DigestResult<Resolution> {
        // Pass 1 — trivially classifiable texts never reach the model.
        if let Some(name) = match_existing(text, existing) {
            tracing::info!(category = %name, "Resolved by direct match");
            return Ok(Resolution::Matched(name));
        }

        // Pass 2 — model proposal.
        let (proposal, confidence) = self.propose(generator, text, existing)?;
        tracing::info!(proposal = %proposal, confidence, "Model proposal received");

        // Pass 3 — confidence gate.
        if confidence < self.threshold {
            tracing::warn!(
                proposal = %proposal,
                confidence,
                threshold = self.threshold,
                "Low-confidence proposal routed to review"
            );
            return Ok(Resolution::NeedsReview {
                candidate: proposal,
                confidence,
            });
        }

        // The model picked an existing name (possibly with different casing).
        if let Some(name) = find_ci(existing, &proposal) {
            return Ok(Resolution::Matched(name));
        }

        // Pass 4 — semantic near-duplicate verification for new names.
        if existing.is_empty() {
            return Ok(Resolution::Created(proposal));
        }
        match self.verify(generator, &proposal, existing)? {
            Some(duplicate_of) => {
                tracing::info!(
                    proposal = %proposal,
                    existing = %duplicate_of,
                    "Verification redirected near-duplicate to existing category"
                );
                Ok(Resolution::Matched(duplicate_of))
            }
            None => Ok(Resolution::Created(proposal)),
        }
    }

    fn propose(
        &self,
        generator: &dyn TextGenerator,
        text: &str,
        existing: &[String],
    ) -> DigestResult<(String, f64)> {
        let prompt = build_proposal_prompt(text, existing, self.max_examples);
        let response = retry::call_with_retry(&self.policy, "categorize", || {
            generator.generate(&prompt, PROPOSAL_MAX_TOKENS)
        })
        .map_err(|e| DigestError::CategorizationFailed(e.to_string()))?;

        Ok(parse_proposal(&response))
    }

    fn verify(
        &self,
        generator: &dyn TextGenerator,
        proposal: &str,
        existing: &[String],
    ) -> DigestResult<Option<String>> {
        let prompt = build_verification_prompt(proposal, existing);
        let response = retry::call_with_retry(&self.policy, "verify-category", || {
            generator.generate(&prompt, VERIFICATION_MAX_TOKENS)
        })
        .map_err(|e| DigestError::CategorizationFailed(e.to_string()))?;

        let answer = response.trim().lines().next().unwrap_or("").trim();
        let answer = answer.trim_matches(|c: char| c == '"' || c == '.' || c == '\'');
        Ok(find_ci(existing, answer))
    }
}

/// Pass-1 heuristic: an existing name occurring in the text (case-insensitive)
/// names the category directly. Names shorter than the substring floor only
/// match the whole text, so tiny names cannot fire spuriously.
pub fn match_existing(text: &str, existing: &[String]) -> Option<String> {
    let text_lower = text.to_lowercase();
    for name in existing {
        let name_lower = name.to_lowercase();
        if name_lower.chars().count() >= MIN_SUBSTRING_MATCH_LEN {
            if text_lower.contains(&name_lower) {
                return Some(name.clone());
            }
        } else if text_lower.trim() == name_lower {
            return Some(name.clone());
        }
    }
    None
}

/// Case-insensitive lookup preserving the stored spelling.
fn find_ci(existing: &[String], candidate: &str) -> Option<String> {
    let candidate = candidate.trim().to_lowercase();
    existing
        .iter()
        .find(|name| name.to_lowercase() == candidate)
        .cloned()
}

fn build_proposal_prompt(text: &str, existing: &[String], max_examples: usize) -> String {
    let categories = if existing.is_empty() {
        "(none yet)".to_string()
    } else {
        existing.join(", ")
    };

    let examples: String = PROMPT_EXAMPLES
        .iter()
        .take(max_examples)
        .map(|(src, analysis, category, confidence)| {
            format!(
                "Text: \"{}\"\nAnalysis: {}\nCategory: {}\nConfidence: {}\n",
                src, analysis, category, confidence
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Classify the text into one of the existing categories or propose a new one.

Existing categories: {categories}

Text to classify:
{text}

Think step by step: identify the main topic and key terms, compare against the
existing categories, then decide. Prefer an existing category whenever one
fits; otherwise propose exactly one new short lowercase category name.

Examples:

{examples}
Answer with the final two lines only:
Category: <name>
Confidence: <0.0-1.0>"#,
        categories = categories,
        text = text,
        examples = examples,
    )
}

fn build_verification_prompt(proposal: &str, existing: &[String]) -> String {
    format!(
        r#"Check whether a proposed category duplicates the meaning of an existing one.

Existing categories: {existing}
Proposed category: {proposal}

Consider synonyms, abbreviations, and names for the same concept (for example
"technology" and "tech news"). If the proposal duplicates an existing
category, answer with that existing category name. Otherwise answer with the
proposed name.

Answer with the category name only:"#,
        existing = existing.join(", "),
        proposal = proposal,
    )
}

/// Extract the final category token and confidence from the model response.
/// A missing category line falls back to the catch-all name with zero
/// confidence, which routes to review below any sane threshold.
fn parse_proposal(response: &str) -> (String, f64) {
    let mut category = None;
    let mut confidence = 0.0;

    for line in response.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Category:") {
            let name = rest.trim().trim_matches('"');
            if !name.is_empty() {
                category = Some(name.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("Confidence:") {
            confidence = parse_confidence(rest);
        }
    }

    match category {
        Some(name) => (name, confidence),
        None => (FALLBACK_CATEGORY.to_string(), 0.0),
    }
}

/// Confidence is an opaque [0,1] score stated by the model; anything
/// malformed clamps to 0.0, out-of-range values clamp into the interval.
pub fn parse_confidence(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => 0.0,
    }
}
