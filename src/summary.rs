//! Summary records built from flagged text.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::category::Category;
use crate::document::Document;
use crate::render::category_text;

static SOLICITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)[aA]u?\s+solicitat.*").expect("solicitation pattern is valid"));

static SOLICITATION_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[aA]u?\s+solicitat").expect("solicitation prefix pattern is valid"));

/// Cut a request summary down to its "a solicitat" / "au solicitat" clause.
///
/// Returns the text from the first such phrase on, trimmed, with the phrase
/// itself lower-cased. Text without the phrase is returned unchanged.
pub fn normalize_request_summary(summary: &str) -> String {
    let clause = match SOLICITATION.find(summary) {
        Some(m) => m.as_str().trim(),
        None => return summary.to_string(),
    };

    SOLICITATION_PREFIX
        .replace(clause, |caps: &regex::Captures<'_>| caps[0].to_lowercase())
        .into_owned()
}

/// Build the summary record of a merged document.
///
/// Every category gets its [`Category::summary_field`] holding the text of its
/// flagged words; categories with nothing flagged map to an empty string. The
/// `Cerere` field is passed through [`normalize_request_summary`].
pub fn summarize(document: &Document) -> BTreeMap<&'static str, String> {
    Category::ALL
        .iter()
        .map(|&category| {
            let text = category_text(document, category);
            let text = match category {
                Category::Request => normalize_request_summary(&text),
                _ => text,
            };
            (category.summary_field(), text)
        })
        .collect()
}
