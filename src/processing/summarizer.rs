//! Summarizer — bounded-length natural-language summary via the generative
//! text service.
//!
//! Short inputs pass through verbatim with zero calls. Transient service
//! failures are retried per policy; exhausting the cap aborts the pipeline
//! with SummarizationFailed.

use crate::config::DigestConfig;
use crate::constants::{SUMMARY_MAX_TOKENS, SUMMARY_MIN_INPUT_CHARS};
use crate::provider::TextGenerator;
use crate::retry::{self, RetryPolicy};
use crate::{DigestError, DigestResult};

use super::cleaner;

pub struct Summarizer {
    language: String,
    max_chars: usize,
    policy: RetryPolicy,
}

impl Summarizer {
    pub fn new(cfg: &DigestConfig) -> Self {
        Self {
            language: cfg.summary_language.clone(),
            max_chars: cfg.summary_max_chars,
            policy: cfg.retry_policy(),
        }
    }

    #[cfg(test)]
    pub fn with_policy(language: &str, max_chars: usize, policy: RetryPolicy) -> Self {
        Self {
            language: language.to_string(),
            max_chars,
            policy,
        }
    }

    pub fn summarize(&self, generator: &dyn TextGenerator, text: &str) -> DigestResult<String> {
        let trimmed = text.trim();
        if trimmed.chars().count() < SUMMARY_MIN_INPUT_CHARS {
            tracing::debug!(len = trimmed.len(), "Text below summary floor, passing through");
            return Ok(trimmed.to_string());
        }

        let cleaned = cleaner::clean_source_text(text);
        let prompt = self.build_prompt(&cleaned);

        let raw = retry::call_with_retry(&self.policy, "summarize", || {
            generator.generate(&prompt, SUMMARY_MAX_TOKENS)
        })
        .map_err(|e| DigestError::SummarizationFailed(e.to_string()))?;

        let mut summary = cleaner::clean_summary(&raw);
        if summary.chars().count() > self.max_chars {
            summary = cleaner::trim_to_length(&summary, self.max_chars);
        }

        tracing::info!(chars = summary.chars().count(), "Summary produced");
        Ok(summary)
    }

    fn build_prompt(&self, text: &str) -> String {
        format!(
            r#"Produce a concise summary of the text below.

Requirements:
- Write the summary in {language}.
- At most {max_chars} characters.
- Keep the main idea and the key facts, drop incidental detail.
- Plain clear wording, no preamble, no quotes around the summary.

Examples of good summaries:

Source: "Apple introduced the iPhone 15 Pro with a titanium body, upgraded cameras and the new A17 Pro chip. The device switches from Lightning to USB-C, a significant change for Apple users. Prices start at $999."
Summary: "Apple introduced the iPhone 15 Pro: titanium body, A17 Pro chip, USB-C port. From $999."

Source: "A study found that regular exercise lowers the risk of cardiovascular disease by 35%. Researchers followed 10,000 participants over 15 years. Thirty-minute cardio sessions five times a week proved most effective."
Summary: "Study: 30-minute cardio five times a week cuts cardiovascular disease risk by 35%."

Now summarize the following text:

{text}

Summary:"#,
            language = self.language,
            max_chars = self.max_chars,
            text = text,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use crate::test_helpers::MockGenerator;

    fn summarizer() -> Summarizer {
        Summarizer::with_policy("English", 200, RetryPolicy::immediate(3))
    }

    const LONG_TEXT: &str = "The research team announced a breakthrough in battery \
        chemistry that could double the range of electric vehicles while cutting \
        charge times in half, with production pilots planned for next year.";

    #[test]
    fn test_short_text_passes_through_without_calls() {
        let generator = MockGenerator::new();
        let summary = summarizer().summarize(&generator, "  short note  ").unwrap();
        assert_eq!(summary, "short note");
        assert_eq!(generator.call_count(), 0);
    }

    #[test]
    fn test_summary_is_cleaned() {
        let generator = MockGenerator::with_responses(vec!["Summary: \"battery breakthrough doubles EV range\""]);
        let summary = summarizer().summarize(&generator, LONG_TEXT).unwrap();
        assert_eq!(summary, "battery breakthrough doubles EV range");
        assert_eq!(generator.call_count(), 1);
    }

    #[test]
    fn test_overlong_response_trimmed_to_bound() {
        let long_response = "word ".repeat(100);
        let generator = MockGenerator::with_responses(vec![long_response.as_str()]);
        let s = Summarizer::with_policy("English", 50, RetryPolicy::immediate(1));
        let summary = s.summarize(&generator, LONG_TEXT).unwrap();
        assert!(summary.chars().count() <= 53); // bound + ellipsis
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_retry_then_success() {
        let generator = MockGenerator::new();
        generator.push_error(DigestError::Transient("rate limited".into()));
        generator.push_response("a fine summary");

        let summary = summarizer().summarize(&generator, LONG_TEXT).unwrap();
        assert_eq!(summary, "a fine summary");
        assert_eq!(generator.call_count(), 2);
    }

    #[test]
    fn test_exhausted_retries_fail_with_summarization_failed() {
        let generator = MockGenerator::new();
        for _ in 0..3 {
            generator.push_error(DigestError::Transient("timeout".into()));
        }

        let result = summarizer().summarize(&generator, LONG_TEXT);
        assert!(matches!(result, Err(DigestError::SummarizationFailed(_))));
        assert_eq!(generator.call_count(), 3);
    }

    #[test]
    fn test_prompt_carries_language_and_bound() {
        let s = Summarizer::with_policy("Russian", 150, RetryPolicy::immediate(1));
        let prompt = s.build_prompt("some text");
        assert!(prompt.contains("in Russian"));
        assert!(prompt.contains("150 characters"));
        assert!(prompt.contains("some text"));
    }
}
