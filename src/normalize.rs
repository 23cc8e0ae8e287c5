//! Token normalization and comparison.
//!
//! Folding is limited to case and punctuation: `Contractul,` and `contractul`
//! compare equal, `solicită` and `solicita` do not.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("punctuation pattern is valid"));

/// Lowercase `word` and strip everything that is neither a word character
/// nor whitespace.
pub fn normalize_word(word: &str) -> String {
    NON_WORD.replace_all(&word.to_lowercase(), "").into_owned()
}

/// Compare two raw tokens after trimming and normalization.
pub fn words_match(a: &str, b: &str) -> bool {
    normalize_word(a.trim()) == normalize_word(b.trim())
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
