//! Activation-seed extraction from the raw query text.

use engram_core::constants::MIN_CONTENT_TOKEN_LEN;
use engram_core::text;

/// English stopwords dropped during concept extraction.
const STOPWORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "in", "with", "to", "for",
    "of", "as", "by", "from", "how", "what", "where", "when", "why", "who",
];

/// Case-fold the query, split on whitespace, drop stopwords, and keep the
/// tokens long enough to be meaningful concepts. Order follows the query;
/// repeated tokens are kept (the spread's visited set dedups them).
pub fn extract_concepts(query: &str) -> Vec<String> {
    text::tokenize(query)
        .into_iter()
        .filter(|t| t.chars().count() > MIN_CONTENT_TOKEN_LEN && !STOPWORDS.contains(&t.as_str()))
        .collect()
}
