//! Core types for parsed `.ann` fixture files.

use layered_annotate::{Category, CategoryResponses, Document, Page, Paragraph};
use std::ops::Range;

/// A parsed `.ann` fixture document.
#[derive(Debug, Clone)]
pub struct AnnFixture {
    /// Optional title from `# Title` header
    pub title: Option<String>,
    /// Pages separated by `===`
    pub pages: Vec<FixturePage>,
    /// Model responses from `> category: text` lines, in order of appearance
    pub responses: Vec<ResponseLine>,
    /// Acceptance threshold override from `@threshold: value`
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct FixturePage {
    /// Page index (0-based)
    pub index: usize,
    /// Paragraphs separated by blank lines
    pub paragraphs: Vec<FixtureParagraph>,
}

/// A single paragraph within a page.
#[derive(Debug, Clone)]
pub struct FixtureParagraph {
    /// Paragraph index within its page (0-based)
    pub index: usize,
    /// The normalized text (markers removed)
    pub text: String,
    /// Expected-flag markers in this paragraph
    pub marks: Vec<SpanMark>,
}

/// A span marker from `«category+category:text»` syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanMark {
    /// Categories every word of the span is expected to carry
    pub categories: Vec<Category>,
    /// The marked text content (without guillemets)
    pub text: String,
    /// Byte range in the paragraph's normalized text
    pub char_range: Range<usize>,
}

/// Raw model output for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseLine {
    pub category: Category,
    /// `None` for `> category: !fail`, a failed model call
    pub text: Option<String>,
    /// Source line number of the first line of the response
    pub source_line: usize,
}

/// Expected flags of one word.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedWord {
    pub page: usize,
    pub paragraph: usize,
    /// Index of the word within its paragraph
    pub word: usize,
    pub text: String,
    pub categories: Vec<Category>,
}

impl FixtureParagraph {
    /// Whitespace-separated words with their byte ranges in `text`.
    pub fn word_ranges(&self) -> Vec<(Range<usize>, &str)> {
        let mut ranges = Vec::new();
        let mut start = None;
        for (pos, ch) in self.text.char_indices() {
            match (ch.is_whitespace(), start) {
                (true, Some(s)) => {
                    ranges.push((s..pos, &self.text[s..pos]));
                    start = None;
                }
                (false, None) => start = Some(pos),
                _ => {}
            }
        }
        if let Some(s) = start {
            ranges.push((s..self.text.len(), &self.text[s..]));
        }
        ranges
    }

    /// Categories expected on the word covering `range`.
    fn categories_for(&self, range: &Range<usize>) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .marks
            .iter()
            .filter(|mark| mark.char_range.start < range.end && range.start < mark.char_range.end)
            .flat_map(|mark| mark.categories.iter().copied())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}

impl AnnFixture {
    /// Create an empty fixture (for testing/building).
    pub fn empty() -> Self {
        Self {
            title: None,
            pages: Vec::new(),
            responses: Vec::new(),
            threshold: None,
        }
    }

    /// Build the unflagged document the fixture describes.
    ///
    /// Words are split on whitespace, so marker boundaries should fall on
    /// word boundaries.
    pub fn to_document(&self) -> Document {
        let pages = self
            .pages
            .iter()
            .map(|page| {
                let paragraphs = page
                    .paragraphs
                    .iter()
                    .map(|paragraph| {
                        Paragraph::from_text(
                            format!("p{}-{}", page.index + 1, paragraph.index),
                            &paragraph.text,
                        )
                    })
                    .collect();
                Page::new(page.index as u32 + 1, paragraphs)
            })
            .collect();
        Document::new(pages)
    }

    /// The responses as merge input.
    pub fn category_responses(&self) -> CategoryResponses {
        self.responses
            .iter()
            .map(|line| (line.category, line.text.clone()))
            .collect()
    }

    /// Categories with a response line, in order of first appearance.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories = Vec::new();
        for line in &self.responses {
            if !categories.contains(&line.category) {
                categories.push(line.category);
            }
        }
        categories
    }

    /// Expected flags of every word, in document order.
    pub fn expected_words(&self) -> Vec<ExpectedWord> {
        let mut words = Vec::new();
        for page in &self.pages {
            for paragraph in &page.paragraphs {
                for (word, (range, text)) in paragraph.word_ranges().into_iter().enumerate() {
                    words.push(ExpectedWord {
                        page: page.index,
                        paragraph: paragraph.index,
                        word,
                        text: text.to_string(),
                        categories: paragraph.categories_for(&range),
                    });
                }
            }
        }
        words
    }

    /// All marks across all pages.
    pub fn marks(&self) -> Vec<&SpanMark> {
        self.pages
            .iter()
            .flat_map(|page| &page.paragraphs)
            .flat_map(|paragraph| &paragraph.marks)
            .collect()
    }

    pub fn paragraph(&self, page: usize, paragraph: usize) -> Option<&FixtureParagraph> {
        self.pages
            .get(page)
            .and_then(|p| p.paragraphs.iter().find(|para| para.index == paragraph))
    }
}
