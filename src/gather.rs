//! Collecting model responses and running a full annotation pass.
//!
//! Model calls are independent per category, so they run in parallel. The
//! merge starts only after every call has returned.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::category::{parse_category_set, Category};
use crate::document::Document;
use crate::error::{AnnotateResult, SourceError};
use crate::merge::{CategoryResponses, MergeEngine, Merged};

/// Source of raw model output for one category.
///
/// Implementations wrap whatever client talks to the model. The document and
/// prompt configuration are the implementation's business.
pub trait ResponseSource: Sync {
    fn respond(&self, category: Category) -> Result<String, SourceError>;
}

impl<F> ResponseSource for F
where
    F: Fn(Category) -> Result<String, SourceError> + Sync,
{
    fn respond(&self, category: Category) -> Result<String, SourceError> {
        self(category)
    }
}

/// Ask `source` for every category in parallel.
///
/// Failed calls are logged and recorded as `None`; they never stop the
/// others. The result keeps the order of `categories`.
pub fn gather_responses<S: ResponseSource + ?Sized>(
    categories: &[Category],
    source: &S,
) -> CategoryResponses {
    categories
        .par_iter()
        .map(|&category| match source.respond(category) {
            Ok(response) => (category, Some(response)),
            Err(err) => {
                warn!(category = %category, error = %err, "model call failed");
                (category, None)
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Validate `requested`, gather responses from `source`, and merge them into
/// a copy of `document`.
///
/// An invalid category set is rejected before any model call is made.
pub fn annotate<S: ResponseSource + ?Sized>(
    document: &Document,
    requested: Option<&[String]>,
    source: &S,
    engine: &MergeEngine,
) -> AnnotateResult<Merged> {
    let categories = parse_category_set(requested)?;
    let responses = gather_responses(&categories, source);
    let merged = engine.merge(document, &responses);
    info!(
        categories = categories.len(),
        attempted = merged.report.attempted(),
        matched = merged.report.matched(),
        "annotation finished"
    );
    Ok(merged)
}
