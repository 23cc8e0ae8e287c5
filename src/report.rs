//! Per-category and per-fragment merge outcomes.
//!
//! Unmatched fragments never raise; these counts are how a caller sees them.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::mapping::ParagraphRef;
use crate::scorer::MatchScore;

/// What happened to one fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FragmentOutcome {
    /// Applied to the paragraph with mapping number `paragraph`.
    Accepted {
        score: MatchScore,
        paragraph: usize,
        location: ParagraphRef,
        /// Words whose flag was newly set by this fragment.
        flagged: usize,
    },
    /// Best score at or below the acceptance threshold.
    Rejected {
        score: MatchScore,
        paragraph: Option<usize>,
    },
    /// Blank after trimming; not scored.
    Empty,
}

/// Terminal state of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryStatus {
    /// No response (failed model call) or an empty response.
    Skipped,
    /// Response present but without `<p>` tags.
    NoFragments,
    /// Every fragment was scored.
    Completed,
    /// An internal fault abandoned the remaining fragments.
    Faulted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: Category,
    pub status: CategoryStatus,
    /// Fragments left after trailing-duplicate trimming.
    pub fragments: usize,
    /// Trailing duplicates removed.
    pub trimmed: usize,
    pub outcomes: Vec<FragmentOutcome>,
    /// Distinct words flagged by this category during the merge.
    pub words_flagged: usize,
    pub fault: Option<String>,
}

impl CategoryReport {
    pub fn new(category: Category, status: CategoryStatus) -> Self {
        Self {
            category,
            status,
            fragments: 0,
            trimmed: 0,
            outcomes: Vec::new(),
            words_flagged: 0,
            fault: None,
        }
    }

    pub fn accepted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FragmentOutcome::Accepted { .. }))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FragmentOutcome::Rejected { .. }))
            .count()
    }

    pub fn empty(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FragmentOutcome::Empty))
            .count()
    }
}

/// Report of one merge pass, categories in processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeReport {
    pub categories: Vec<CategoryReport>,
}

impl MergeReport {
    pub fn category(&self, category: Category) -> Option<&CategoryReport> {
        self.categories.iter().find(|r| r.category == category)
    }

    /// Categories that had a response to work on.
    pub fn attempted(&self) -> usize {
        self.categories
            .iter()
            .filter(|r| r.status != CategoryStatus::Skipped)
            .count()
    }

    /// Categories with at least one accepted fragment.
    pub fn matched(&self) -> usize {
        self.categories.iter().filter(|r| r.accepted() > 0).count()
    }

    pub fn accepted(&self) -> usize {
        self.categories.iter().map(CategoryReport::accepted).sum()
    }

    pub fn rejected(&self) -> usize {
        self.categories.iter().map(CategoryReport::rejected).sum()
    }

    pub fn faulted(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|r| r.status == CategoryStatus::Faulted)
            .map(|r| r.category)
            .collect()
    }
}
