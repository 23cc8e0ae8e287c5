//! Dense index of the searchable paragraphs of a document.

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Structural address of a paragraph: page index and paragraph index within
/// that page, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParagraphRef {
    pub page: usize,
    pub paragraph: usize,
}

impl ParagraphRef {
    pub fn new(page: usize, paragraph: usize) -> Self {
        Self { page, paragraph }
    }
}

/// 1-based numbering of the non-empty paragraphs of a document, in reading
/// order.
///
/// Numbers are contiguous from 1. Empty paragraphs get no number but stay in
/// the document. The mapping describes one snapshot and is rebuilt for every
/// merge pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphMapping {
    entries: Vec<ParagraphRef>,
}

impl ParagraphMapping {
    pub fn build(document: &Document) -> Self {
        let entries = document
            .pages
            .iter()
            .enumerate()
            .flat_map(|(page_idx, page)| {
                page.paragraphs
                    .iter()
                    .enumerate()
                    .filter(|(_, paragraph)| !paragraph.is_empty())
                    .map(move |(para_idx, _)| ParagraphRef::new(page_idx, para_idx))
            })
            .collect();
        Self { entries }
    }

    #[cfg(test)]
    pub(crate) fn from_refs(entries: Vec<ParagraphRef>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a paragraph by its 1-based number.
    pub fn get(&self, number: usize) -> Option<ParagraphRef> {
        number
            .checked_sub(1)
            .and_then(|idx| self.entries.get(idx))
            .copied()
    }

    /// Iterate `(number, location)` pairs in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, ParagraphRef)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, location)| (idx + 1, *location))
    }
}
