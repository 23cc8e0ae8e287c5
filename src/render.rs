//! Text views of a document: the model input and per-category extracts.

use crate::category::Category;
use crate::document::Document;

/// Render the document as model input.
///
/// Each paragraph with at least one word of non-empty text becomes
/// `<p> w1 w2 … </p>`; paragraphs are joined by single spaces. Words with
/// empty text are skipped, whitespace-only words are kept as they are.
pub fn combined_text(document: &Document) -> String {
    document
        .pages
        .iter()
        .flat_map(|page| page.paragraphs.iter())
        .filter_map(|paragraph| {
            let words: Vec<&str> = paragraph
                .words
                .iter()
                .map(|word| word.text.as_str())
                .filter(|text| !text.is_empty())
                .collect();
            if words.is_empty() {
                None
            } else {
                Some(format!("<p> {} </p>", words.join(" ")))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed text of every word flagged for `category`, in document order.
pub fn category_text(document: &Document, category: Category) -> String {
    document
        .words()
        .filter(|word| word.flag(category))
        .map(|word| word.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Page, Paragraph, Word};

    #[test]
    fn test_combined_text_wraps_paragraphs() {
        let doc = Document::from_text("Subsemnatul Ion Popescu\n\nsolicit anularea\u{c}În drept");
        assert_eq!(
            combined_text(&doc),
            "<p> Subsemnatul Ion Popescu </p> <p> solicit anularea </p> <p> În drept </p>"
        );
    }

    #[test]
    fn test_combined_text_skips_empty_words_only() {
        let doc = Document::new(vec![Page::new(
            1,
            vec![
                Paragraph::new("a", vec![Word::new("1", ""), Word::new("2", "x")]),
                Paragraph::new("b", vec![Word::new("3", "")]),
            ],
        )]);
        assert_eq!(combined_text(&doc), "<p> x </p>");
    }

    #[test]
    fn test_category_text_in_document_order() {
        let mut doc = Document::from_text("Ion Popescu contra\nSC Alfa SRL");
        doc.pages[0].paragraphs[0].words[0].claimant = true;
        doc.pages[0].paragraphs[0].words[1].claimant = true;
        doc.pages[0].paragraphs[1].words[1].respondent = true;
        assert_eq!(category_text(&doc, Category::Claimant), "Ion Popescu");
        assert_eq!(category_text(&doc, Category::Respondent), "Alfa");
        assert_eq!(category_text(&doc, Category::Evidence), "");
    }
}
