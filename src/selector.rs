//! Best-paragraph selection for a fragment.

use crate::document::Document;
use crate::error::MergeFault;
use crate::mapping::{ParagraphMapping, ParagraphRef};
use crate::scorer::{score_paragraph, MatchScore};

/// The paragraph a fragment matched best.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    pub score: MatchScore,
    /// 1-based mapping number of the paragraph.
    pub number: usize,
    pub location: ParagraphRef,
    /// Indices (into the paragraph's words) of the non-blank words that were
    /// scored, in order.
    pub word_indices: Vec<usize>,
    /// Candidates scored before the scan stopped.
    pub scanned: usize,
}

/// Scan the mapped paragraphs in order and keep the best-scoring one.
///
/// `fragment` must be whitespace-normalized. A paragraph replaces the current
/// best only with a strictly greater score, so the earliest paragraph wins
/// ties. A score of exactly `1.0` ends the scan at once. Returns `None` when
/// no paragraph scores above zero.
pub fn select_best_paragraph(
    fragment: &str,
    mapping: &ParagraphMapping,
    document: &Document,
) -> Result<Option<BestMatch>, MergeFault> {
    let mut best: Option<BestMatch> = None;
    let mut scanned = 0;

    for (number, location) in mapping.iter() {
        let paragraph = document
            .paragraph(location)
            .ok_or(MergeFault::MissingParagraph { number, location })?;

        let word_indices = paragraph.content_word_indices();
        if word_indices.is_empty() {
            continue;
        }
        let words: Vec<&str> = word_indices
            .iter()
            .map(|&idx| paragraph.words[idx].text.as_str())
            .collect();

        scanned += 1;
        let score = score_paragraph(fragment, &words);

        if score.is_exact() {
            return Ok(Some(BestMatch {
                score,
                number,
                location,
                word_indices,
                scanned,
            }));
        }

        let best_score = best.as_ref().map_or(MatchScore::ZERO, |b| b.score);
        if score > best_score {
            best = Some(BestMatch {
                score,
                number,
                location,
                word_indices,
                scanned,
            });
        }
    }

    if let Some(best) = best.as_mut() {
        best.scanned = scanned;
    }
    Ok(best)
}
