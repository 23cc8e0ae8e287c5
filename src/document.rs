//! Document data model: pages of paragraphs of words.
//!
//! The JSON shape follows the annotation service payload: camelCase geometry
//! fields and one `isXxx` boolean per category on every word. Request fields
//! this crate does not interpret (identifiers, case number, document type
//! name, ...) are preserved in [`Document::metadata`] so a merged document
//! serializes back with everything the caller sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category::Category;
use crate::error::AnnotateResult;
use crate::mapping::ParagraphRef;

/// A single word with its position on the page and its category flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub left: i64,
    #[serde(default)]
    pub top: i64,
    #[serde(default)]
    pub width: i64,
    #[serde(default)]
    pub height: i64,
    #[serde(default, rename = "isSelected")]
    pub selected: bool,
    #[serde(default, rename = "isProba")]
    pub evidence: bool,
    /// Exception marker. Not one of the merge categories; carried through as is.
    #[serde(default, rename = "isExceptie")]
    pub exception: bool,
    #[serde(default, rename = "isTemei")]
    pub legal_basis: bool,
    #[serde(default, rename = "isCerere")]
    pub request: bool,
    #[serde(default, rename = "isReclamant")]
    pub claimant: bool,
    #[serde(default, rename = "isParat")]
    pub respondent: bool,
}

impl Word {
    /// Create an unflagged word with zero geometry.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            left: 0,
            top: 0,
            width: 0,
            height: 0,
            selected: false,
            evidence: false,
            exception: false,
            legal_basis: false,
            request: false,
            claimant: false,
            respondent: false,
        }
    }

    /// True when the text is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn flag(&self, category: Category) -> bool {
        match category {
            Category::LegalBasis => self.legal_basis,
            Category::Evidence => self.evidence,
            Category::SelectedFacts => self.selected,
            Category::Request => self.request,
            Category::Claimant => self.claimant,
            Category::Respondent => self.respondent,
        }
    }

    pub fn flag_mut(&mut self, category: Category) -> &mut bool {
        match category {
            Category::LegalBasis => &mut self.legal_basis,
            Category::Evidence => &mut self.evidence,
            Category::SelectedFacts => &mut self.selected,
            Category::Request => &mut self.request,
            Category::Claimant => &mut self.claimant,
            Category::Respondent => &mut self.respondent,
        }
    }

    /// Set the category flag. Flags only ever go from false to true here.
    pub fn mark(&mut self, category: Category) {
        *self.flag_mut(category) = true;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub id: String,
    pub words: Vec<Word>,
}

impl Paragraph {
    pub fn new(id: impl Into<String>, words: Vec<Word>) -> Self {
        Self {
            id: id.into(),
            words,
        }
    }

    /// Build a paragraph by splitting `text` on whitespace.
    ///
    /// Word ids are `{id}-w{n}`.
    pub fn from_text(id: impl Into<String>, text: &str) -> Self {
        let id = id.into();
        let words = text
            .split_whitespace()
            .enumerate()
            .map(|(n, token)| Word::new(format!("{}-w{}", id, n), token))
            .collect();
        Self { id, words }
    }

    /// A paragraph is empty when every word is blank.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(Word::is_blank)
    }

    /// Indices of the non-blank words, in order.
    ///
    /// Matching runs over this filtered view; positions found there are
    /// translated back through this list before flags are set.
    pub fn content_word_indices(&self) -> Vec<usize> {
        self.words
            .iter()
            .enumerate()
            .filter(|(_, word)| !word.is_blank())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Trimmed word texts joined by single spaces, blank words skipped.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .filter(|word| !word.is_blank())
            .map(|word| word.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub width: i64,
    #[serde(default)]
    pub height: i64,
    pub page_number: u32,
    pub paragraphs: Vec<Paragraph>,
}

impl Page {
    pub fn new(page_number: u32, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            width: 0,
            height: 0,
            page_number,
            paragraphs,
        }
    }
}

/// A document snapshot.
///
/// Structure and word text are never changed by merging; only word flags are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
    /// Request fields outside the page structure, kept verbatim.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            pages,
            metadata: Map::new(),
        }
    }

    /// Build a document from plain text.
    ///
    /// Form feeds (`\x0c`) separate pages and every line is one paragraph.
    /// Blank lines become empty paragraphs, so the container structure of the
    /// text is kept even where nothing is searchable.
    pub fn from_text(text: &str) -> Self {
        let pages = text
            .split('\u{c}')
            .enumerate()
            .map(|(page_idx, page_text)| {
                let paragraphs = page_text
                    .lines()
                    .enumerate()
                    .map(|(para_idx, line)| {
                        Paragraph::from_text(format!("p{}-{}", page_idx + 1, para_idx), line)
                    })
                    .collect();
                Page::new(page_idx as u32 + 1, paragraphs)
            })
            .collect();
        Self::new(pages)
    }

    pub fn from_json(json: &str) -> AnnotateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> AnnotateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn paragraph(&self, location: ParagraphRef) -> Option<&Paragraph> {
        self.pages
            .get(location.page)
            .and_then(|page| page.paragraphs.get(location.paragraph))
    }

    pub fn paragraph_mut(&mut self, location: ParagraphRef) -> Option<&mut Paragraph> {
        self.pages
            .get_mut(location.page)
            .and_then(|page| page.paragraphs.get_mut(location.paragraph))
    }

    /// All words in document order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.pages
            .iter()
            .flat_map(|page| page.paragraphs.iter())
            .flat_map(|paragraph| paragraph.words.iter())
    }

    /// Number of words flagged for `category`.
    pub fn count_flagged(&self, category: Category) -> usize {
        self.words().filter(|word| word.flag(category)).count()
    }
}
