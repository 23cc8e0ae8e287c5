#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Merges model-quoted text fragments back into per-word annotations.
//!
//! A language model reads a document rendered as `<p>…</p>` paragraphs and,
//! for each annotation category, answers with the passages that belong to it,
//! quoted back inside `<p>` tags. The quotes are paraphrased, re-punctuated or
//! truncated, so they are aligned against the document word by word:
//!
//! 1. [`extract_fragments`] pulls the quoted passages out of a raw response
//!    and [`trim_trailing_duplicates`] drops runaway repetition at the end.
//! 2. Every non-empty paragraph gets a 1-based number ([`ParagraphMapping`]).
//! 3. [`select_best_paragraph`] scores each paragraph ([`score_paragraph`]):
//!    a paragraph shorter than the fragment scores `0`, literal containment
//!    scores `1.0`, otherwise the share of the paragraph's
//!    words covered by contiguous sub-phrases of the fragment
//!    ([`find_contiguous_matches`]). The earliest best paragraph wins.
//! 4. [`MergeEngine`] flags the matched words of the chosen paragraph when the
//!    score clears [`MatchConfig::acceptance_threshold`].
//!
//! Word comparison ([`words_match`]) ignores case and punctuation but keeps
//! diacritics.
//!
//! ## Example
//!
//! ```
//! use layered_annotate::{Category, CategoryResponses, Document, MergeEngine};
//!
//! let doc = Document::from_text("Subsemnatul Ion Popescu solicită anularea actului.");
//! let responses = CategoryResponses::new().with(Category::Claimant, "<p>Ion Popescu</p>");
//!
//! let merged = MergeEngine::default().merge(&doc, &responses);
//! assert_eq!(merged.document.count_flagged(Category::Claimant), 2);
//! assert_eq!(merged.report.accepted(), 1);
//! ```
//!
//! ## Around the merge
//!
//! - [`annotate`] validates a requested category set, collects responses from
//!   a [`ResponseSource`] in parallel and merges them.
//! - [`combined_text`] renders the model input, [`category_text`] the words
//!   flagged for one category, and [`summarize`] the per-category summary
//!   record.
//! - [`evaluate`] compares a merged document against a gold one.
//! - [`ParagraphDisplay`] draws flagged runs under a paragraph for snapshots.

mod category;
mod config;
mod display;
mod document;
mod error;
mod evaluation;
mod fragment;
mod gather;
mod mapping;
mod matcher;
mod merge;
mod normalize;
mod render;
mod report;
mod scorer;
mod selector;
mod summary;

pub use category::{parse_category_set, Category};
pub use config::{
    default_max_tokens, AnnotatorConfig, DocumentKind, DocumentTypeConfig, MatchConfig,
    ModelParams,
};
pub use display::{display_document, ParagraphDisplay};
pub use document::{Document, Page, Paragraph, Word};
pub use error::{AnnotateError, AnnotateResult, MergeFault, SourceError};
pub use evaluation::{evaluate, CategoryMetrics};
pub use fragment::{extract_fragments, trim_trailing_duplicates, FragmentList};
pub use gather::{annotate, gather_responses, ResponseSource};
pub use mapping::{ParagraphMapping, ParagraphRef};
pub use matcher::{find_contiguous_matches, find_word_positions};
pub use merge::{CategoryResponses, MergeEngine, Merged};
pub use normalize::{normalize_whitespace, normalize_word, words_match};
pub use render::{category_text, combined_text};
pub use report::{CategoryReport, CategoryStatus, FragmentOutcome, MergeReport};
pub use scorer::{score_paragraph, MatchScore};
pub use selector::{select_best_paragraph, BestMatch};
pub use summary::{normalize_request_summary, summarize};
