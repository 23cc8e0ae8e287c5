//! Text rendering of a paragraph with its flagged word runs underlined.
//!
//! ```text
//! Subsemnatul  Ion  Popescu  solicită  anularea  actului.
//!              ╰──────────╯claimant
//!                                      ╰────────────────╯request
//! ```

use std::fmt::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::category::Category;
use crate::document::{Document, Paragraph};

const SPACE_PADDING: usize = 2;

pub struct ParagraphDisplay<'a> {
    paragraph: &'a Paragraph,
    categories: Vec<Category>,
}

impl<'a> ParagraphDisplay<'a> {
    pub fn new(paragraph: &'a Paragraph) -> Self {
        ParagraphDisplay {
            paragraph,
            categories: Vec::new(),
        }
    }

    pub fn include(&mut self, category: Category) {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
    }

    /// Takes self
    pub fn with(mut self, category: Category) -> Self {
        self.include(category);
        self
    }

    /// Include every category.
    pub fn with_all(mut self) -> Self {
        for category in Category::ALL {
            self.include(category);
        }
        self
    }

    /// Contiguous runs `(first, last)` of words flagged for `category`.
    fn runs(&self, category: Category) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut current: Option<(usize, usize)> = None;
        for (idx, word) in self.paragraph.words.iter().enumerate() {
            if word.flag(category) {
                current = Some(match current {
                    Some((start, _)) => (start, idx),
                    None => (idx, idx),
                });
            } else if let Some(run) = current.take() {
                runs.push(run);
            }
        }
        runs.extend(current);
        runs
    }
}

impl<'a> fmt::Display for ParagraphDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut word_starts = Vec::with_capacity(self.paragraph.words.len());
        let mut word_ends = Vec::with_capacity(self.paragraph.words.len());
        let mut opening_line = String::new();
        for (idx, word) in self.paragraph.words.iter().enumerate() {
            if idx > 0 {
                opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
            }
            word_starts.push(UnicodeWidthStr::width(&*opening_line));
            opening_line.push_str(&word.text);
            word_ends.push(UnicodeWidthStr::width(&*opening_line));
        }

        f.write_str(&opening_line)?;

        for &category in &self.categories {
            for (first, last) in self.runs(category) {
                f.write_char('\n')?;

                let start_char_idx = word_starts[first];
                for _ in 0..start_char_idx {
                    f.write_char(' ')?;
                }

                f.write_char('╰')?;

                let end_char_idx = word_ends[last];
                for _ in (start_char_idx + 1)..end_char_idx.saturating_sub(1) {
                    f.write_char('─')?;
                }

                if end_char_idx - start_char_idx > 1 {
                    f.write_char('╯')?;
                }

                f.write_str(category.label())?;
            }
        }

        Ok(())
    }
}

/// Render every non-empty paragraph of `document`, separated by blank lines.
pub fn display_document(document: &Document, categories: &[Category]) -> String {
    let mut out = String::new();
    for paragraph in document
        .pages
        .iter()
        .flat_map(|page| page.paragraphs.iter())
        .filter(|paragraph| !paragraph.is_empty())
    {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        let mut display = ParagraphDisplay::new(paragraph);
        for &category in categories {
            display.include(category);
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{}", display);
    }
    out
}
