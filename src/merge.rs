//! Merging per-category model responses into word flags.
//!
//! The engine works on its own copy of the document, one category after the
//! other and one fragment after the other. Nothing here is shared across
//! threads; model calls are gathered before a merge starts (see
//! [`gather`](crate::gather)).

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::category::Category;
use crate::config::MatchConfig;
use crate::document::Document;
use crate::error::MergeFault;
use crate::fragment::FragmentList;
use crate::mapping::ParagraphMapping;
use crate::matcher::find_contiguous_matches;
use crate::normalize::normalize_whitespace;
use crate::report::{CategoryReport, CategoryStatus, FragmentOutcome, MergeReport};
use crate::scorer::MatchScore;
use crate::selector::{select_best_paragraph, BestMatch};

/// Raw model output per category, in processing order.
///
/// `None` marks a category whose model call failed; it is skipped during the
/// merge like an empty response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryResponses {
    entries: Vec<(Category, Option<String>)>,
}

impl CategoryResponses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response of `category`, replacing an earlier one in place.
    pub fn insert(&mut self, category: Category, response: Option<String>) {
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some(entry) => entry.1 = response,
            None => self.entries.push((category, response)),
        }
    }

    pub fn with(mut self, category: Category, response: impl Into<String>) -> Self {
        self.insert(category, Some(response.into()));
        self
    }

    pub fn with_failure(mut self, category: Category) -> Self {
        self.insert(category, None);
        self
    }

    pub fn get(&self, category: Category) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .and_then(|(_, response)| response.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Option<&str>)> {
        self.entries
            .iter()
            .map(|(category, response)| (*category, response.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Category, Option<String>)> for CategoryResponses {
    fn from_iter<I: IntoIterator<Item = (Category, Option<String>)>>(iter: I) -> Self {
        let mut responses = CategoryResponses::new();
        for (category, response) in iter {
            responses.insert(category, response);
        }
        responses
    }
}

/// A merged document together with what happened to every category.
#[derive(Debug, Clone)]
pub struct Merged {
    pub document: Document,
    pub report: MergeReport,
}

/// Applies fragment matches to word flags.
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    config: MatchConfig,
}

impl MergeEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Merge `responses` into a copy of `document`.
    ///
    /// The input document is left untouched.
    pub fn merge(&self, document: &Document, responses: &CategoryResponses) -> Merged {
        let mut document = document.clone();
        let report = self.apply(&mut document, responses);
        Merged { document, report }
    }

    /// Merge `responses` into `document` in place.
    pub fn apply(&self, document: &mut Document, responses: &CategoryResponses) -> MergeReport {
        let mapping = ParagraphMapping::build(document);
        self.apply_with_mapping(document, &mapping, responses)
    }

    fn apply_with_mapping(
        &self,
        document: &mut Document,
        mapping: &ParagraphMapping,
        responses: &CategoryResponses,
    ) -> MergeReport {
        let categories = responses
            .iter()
            .map(|(category, response)| self.merge_category(document, mapping, category, response))
            .collect();
        MergeReport { categories }
    }

    fn merge_category(
        &self,
        document: &mut Document,
        mapping: &ParagraphMapping,
        category: Category,
        response: Option<&str>,
    ) -> CategoryReport {
        let response = match response {
            Some(response) if !response.trim().is_empty() => response,
            Some(_) => {
                debug!(category = %category, "empty response, skipping");
                return CategoryReport::new(category, CategoryStatus::Skipped);
            }
            None => {
                debug!(category = %category, "no response, skipping");
                return CategoryReport::new(category, CategoryStatus::Skipped);
            }
        };

        let started = Instant::now();
        let list = FragmentList::parse(response);
        let mut report = CategoryReport::new(category, CategoryStatus::NoFragments);
        report.fragments = list.len();
        report.trimmed = list.trimmed;

        if list.trimmed > 0 {
            debug!(
                category = %category,
                trimmed = list.trimmed,
                "dropped repeated trailing fragments"
            );
        }
        if list.is_empty() {
            debug!(category = %category, "response has no paragraph tags");
            return report;
        }

        report.status = CategoryStatus::Completed;
        for (idx, fragment) in list.fragments.iter().enumerate() {
            match self.merge_fragment(document, mapping, category, fragment) {
                Ok(outcome) => {
                    if let FragmentOutcome::Accepted { flagged, .. } = &outcome {
                        report.words_flagged += flagged;
                    }
                    report.outcomes.push(outcome);
                }
                Err(fault) => {
                    warn!(
                        category = %category,
                        fragment = idx,
                        error = %fault,
                        "abandoning remaining fragments"
                    );
                    report.status = CategoryStatus::Faulted;
                    report.fault = Some(fault.to_string());
                    break;
                }
            }
        }

        info!(
            category = %category,
            fragments = report.fragments,
            accepted = report.accepted(),
            rejected = report.rejected(),
            words = report.words_flagged,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "merged category"
        );
        report
    }

    fn merge_fragment(
        &self,
        document: &mut Document,
        mapping: &ParagraphMapping,
        category: Category,
        fragment: &str,
    ) -> Result<FragmentOutcome, MergeFault> {
        let fragment = normalize_whitespace(fragment);
        if fragment.is_empty() {
            return Ok(FragmentOutcome::Empty);
        }

        let best = select_best_paragraph(&fragment, mapping, document)?;
        let best = match best {
            Some(best) if self.config.accepts(best.score) => best,
            Some(best) => {
                debug!(
                    category = %category,
                    score = %best.score,
                    paragraph = best.number,
                    "rejected fragment"
                );
                return Ok(FragmentOutcome::Rejected {
                    score: best.score,
                    paragraph: Some(best.number),
                });
            }
            None => {
                debug!(category = %category, "fragment matched no paragraph");
                return Ok(FragmentOutcome::Rejected {
                    score: MatchScore::ZERO,
                    paragraph: None,
                });
            }
        };

        let flagged = apply_matches(document, &best, &fragment, category)?;
        debug!(
            category = %category,
            score = %best.score,
            paragraph = best.number,
            flagged,
            "accepted fragment"
        );
        Ok(FragmentOutcome::Accepted {
            score: best.score,
            paragraph: best.number,
            location: best.location,
            flagged,
        })
    }
}

/// Flag the words of the selected paragraph that `fragment` matches.
///
/// Positions are recomputed for this fragment and paragraph, then translated
/// from the non-blank word view back to real word indices. Returns how many
/// words were newly flagged.
fn apply_matches(
    document: &mut Document,
    best: &BestMatch,
    fragment: &str,
    category: Category,
) -> Result<usize, MergeFault> {
    let paragraph = document
        .paragraph_mut(best.location)
        .ok_or(MergeFault::MissingParagraph {
            number: best.number,
            location: best.location,
        })?;

    let positions = {
        let words: Vec<&str> = best
            .word_indices
            .iter()
            .map(|&idx| paragraph.words.get(idx).map_or("", |w| w.text.as_str()))
            .collect();
        find_contiguous_matches(fragment, &words)
    };

    let mut flagged = 0;
    for position in positions {
        let word_idx = match best.word_indices.get(position) {
            Some(&word_idx) => word_idx,
            None => continue,
        };
        let len = paragraph.words.len();
        let word = paragraph
            .words
            .get_mut(word_idx)
            .ok_or(MergeFault::WordOutOfBounds {
                location: best.location,
                position: word_idx,
                len,
            })?;
        if !word.flag(category) {
            word.mark(category);
            flagged += 1;
        }
    }
    Ok(flagged)
}
