//! Text helpers for lexical scoring and concept extraction.

use std::collections::HashSet;

use crate::constants::MIN_CONTENT_TOKEN_LEN;

/// Case-folded whitespace tokenization.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}

/// Case-folded tokens strictly longer than [`MIN_CONTENT_TOKEN_LEN`],
/// deduplicated. These are the "content words" used for overlap scoring.
pub fn content_tokens(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .filter(|t| t.chars().count() > MIN_CONTENT_TOKEN_LEN)
        .map(|t| t.to_lowercase())
        .collect()
}

/// Case-insensitive substring test.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Char-safe prefix truncation with an ellipsis, for log and trace previews.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
