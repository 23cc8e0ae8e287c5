//! Fragment-to-paragraph scoring.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::matcher::find_contiguous_matches;

/// Match quality of a fragment against one paragraph, in `[0, 1]`.
///
/// `1.0` means the fragment occurs verbatim in the paragraph. Below that the
/// score is the fraction of paragraph words covered by contiguous matches.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct MatchScore(f64);

impl MatchScore {
    pub const ZERO: MatchScore = MatchScore(0.0);
    pub const EXACT: MatchScore = MatchScore(1.0);

    pub fn new(value: f64) -> Self {
        MatchScore(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_exact(self) -> bool {
        self.0 == 1.0
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Score `fragment` against the non-blank words of a paragraph.
///
/// `fragment` must already be whitespace-normalized. A paragraph whose joined
/// text is shorter than the fragment cannot hold the quote and scores zero.
/// Coverage is divided by the paragraph length only, not by the fragment
/// length.
pub fn score_paragraph<S: AsRef<str>>(fragment: &str, paragraph_words: &[S]) -> MatchScore {
    if paragraph_words.is_empty() {
        return MatchScore::ZERO;
    }

    let paragraph_text = paragraph_words
        .iter()
        .map(|word| word.as_ref().trim())
        .collect::<Vec<_>>()
        .join(" ");

    if paragraph_text.chars().count() < fragment.chars().count() {
        return MatchScore::ZERO;
    }
    if paragraph_text.contains(fragment) {
        return MatchScore::EXACT;
    }

    let matched = find_contiguous_matches(fragment, paragraph_words);
    MatchScore::new(matched.len() as f64 / paragraph_words.len() as f64)
}
