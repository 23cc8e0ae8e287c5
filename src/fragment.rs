//! Extraction of `<p>…</p>` fragments from raw model output.

use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<p>(.*?)</p>").expect("paragraph tag pattern is valid"));

/// Every fragment enclosed in `<p>` / `</p>`, in order of appearance.
///
/// Matching is non-greedy and spans line breaks. A response without tags
/// yields no fragments.
pub fn extract_fragments(raw: &str) -> Vec<String> {
    PARAGRAPH_TAG
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Drop trailing fragments that repeat their immediate predecessor.
///
/// A model stuck in a loop tends to repeat its final paragraph until the
/// token cap. Comparison ignores surrounding whitespace. Only the adjacent
/// run at the end is removed; earlier or non-adjacent repeats stay.
///
/// Returns the number of fragments removed.
pub fn trim_trailing_duplicates(fragments: &mut Vec<String>) -> usize {
    let mut removed = 0;
    while fragments.len() >= 2 {
        let last = fragments[fragments.len() - 1].trim();
        let previous = fragments[fragments.len() - 2].trim();
        if last != previous {
            break;
        }
        fragments.pop();
        removed += 1;
    }
    removed
}

/// Fragments of one category response, after loop trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentList {
    pub fragments: Vec<String>,
    /// Trailing duplicates removed by [`trim_trailing_duplicates`].
    pub trimmed: usize,
}

impl FragmentList {
    pub fn parse(raw: &str) -> Self {
        let mut fragments = extract_fragments(raw);
        let trimmed = trim_trailing_duplicates(&mut fragments);
        Self { fragments, trimmed }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
