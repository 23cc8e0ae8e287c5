//! Contiguous match finder.
//!
//! A fragment may stitch together several quoted runs of one paragraph (the
//! model often drops connective words), so every contiguous sub-phrase of the
//! fragment is tried against the paragraph independently and the hits are
//! unioned.

use std::collections::BTreeSet;

use crate::normalize::normalize_word;

/// Normalized tokens of a fragment or paragraph.
fn normalized_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| normalize_word(token.as_ref().trim()))
        .collect()
}

/// Positions of every window of `paragraph` equal to `target`.
///
/// Both slices hold normalized tokens. Each matching window contributes its
/// whole index range; overlapping windows repeat indices.
fn window_positions(target: &[String], paragraph: &[String]) -> Vec<usize> {
    let mut positions = Vec::new();
    if target.is_empty() || target.len() > paragraph.len() {
        return positions;
    }

    for start in 0..=(paragraph.len() - target.len()) {
        let window = &paragraph[start..start + target.len()];
        if window.iter().zip(target).all(|(actual, wanted)| actual == wanted) {
            positions.extend(start..start + target.len());
        }
    }
    positions
}

/// Paragraph word positions where `target` occurs as a contiguous run.
///
/// `target` is split on whitespace; words are compared with
/// [`words_match`](crate::words_match) semantics.
pub fn find_word_positions<S: AsRef<str>>(target: &str, paragraph_words: &[S]) -> Vec<usize> {
    let target: Vec<&str> = target.split_whitespace().collect();
    window_positions(&normalized_tokens(&target), &normalized_tokens(paragraph_words))
}

/// Union of the positions of every contiguous sub-phrase of `fragment` found
/// in `paragraph_words`.
pub fn find_contiguous_matches<S: AsRef<str>>(
    fragment: &str,
    paragraph_words: &[S],
) -> BTreeSet<usize> {
    let fragment_tokens: Vec<&str> = fragment.split_whitespace().collect();
    let fragment_tokens = normalized_tokens(&fragment_tokens);
    let paragraph_tokens = normalized_tokens(paragraph_words);

    let mut matched = BTreeSet::new();
    for start in 0..fragment_tokens.len() {
        for end in (start + 1)..=fragment_tokens.len() {
            matched.extend(window_positions(&fragment_tokens[start..end], &paragraph_tokens));
        }
    }
    matched
}
