//! Text cleanup shared by the summarizer and the prompt builders.

/// Prefixes the model tends to prepend to a summary despite instructions.
const SUMMARY_PREFIXES: &[&str] = &[
    "Summary:",
    "Резюме:",
    "Краткое резюме:",
    "Основная идея:",
    "Суть:",
    "Вкратце:",
];

/// Clean raw forwarded text before prompting — strip forward markers,
/// collapse runaway punctuation, then collapse whitespace.
pub fn clean_source_text(raw: &str) -> String {
    // Leading "Forwarded from ..." lines added by chat clients
    let re_markers =
        regex::Regex::new(r"(?m)^(Forwarded from|Переслано от|Пересылка от).*?\n").unwrap();
    let stripped = re_markers.replace_all(raw, "");

    let re_dots = regex::Regex::new(r"\.{3,}").unwrap();
    let text = re_dots.replace_all(&stripped, "...");
    let re_bang = regex::Regex::new(r"!{2,}").unwrap();
    let text = re_bang.replace_all(&text, "!");
    let re_q = regex::Regex::new(r"\?{2,}").unwrap();
    let text = re_q.replace_all(&text, "?");

    let re_ws = regex::Regex::new(r"\s+").unwrap();
    re_ws.replace_all(text.trim(), " ").to_string()
}

/// Clean a model-produced summary — drop known prefixes and wrapping quotes.
pub fn clean_summary(raw: &str) -> String {
    let mut summary = raw.trim().to_string();

    for prefix in SUMMARY_PREFIXES {
        if let Some(rest) = summary.strip_prefix(prefix) {
            summary = rest.trim().to_string();
            break;
        }
    }

    if summary.starts_with('"') && summary.ends_with('"') && summary.chars().count() >= 2 {
        summary = summary[1..summary.len() - 1].trim().to_string();
    }

    summary
}

/// Trim to at most `max_chars` characters, preferring a word boundary,
/// appending an ellipsis when content was dropped. Char-based so multi-byte
/// text never panics.
pub fn trim_to_length(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(' ') {
        Some(pos) if pos > 0 => format!("{}...", &truncated[..pos]),
        _ => format!("{}...", truncated),
    }
}
