//! Error types for annotation merging.
//!
//! Unmatched fragments and responses without `<p>` tags are not errors; they
//! only show up as counts in [`MergeReport`](crate::MergeReport).

use std::path::PathBuf;

use thiserror::Error;

use crate::category::Category;
use crate::mapping::ParagraphRef;

/// Errors raised by the annotation layer before or around a merge.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// The requested category set contains identifiers outside the vocabulary.
    #[error("invalid extraction types: {invalid:?}. Valid types are: {valid:?}")]
    InvalidCategories {
        invalid: Vec<String>,
        valid: Vec<&'static str>,
    },

    /// The document type name has no configuration entry.
    #[error("unsupported document type: {name}")]
    UnknownDocumentType { name: String },

    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A document could not be (de)serialized.
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for annotation operations.
pub type AnnotateResult<T> = Result<T, AnnotateError>;

/// Internal fault hit while merging one category.
///
/// A fault abandons the remaining fragments of the category it occurred in.
/// Flags already applied for that category stay in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeFault {
    /// A mapping entry points at a page or paragraph the document lacks.
    #[error("paragraph {number} resolves to missing {location:?}")]
    MissingParagraph {
        number: usize,
        location: ParagraphRef,
    },

    /// A matched position fell outside the selected paragraph.
    #[error("word position {position} outside paragraph {location:?} ({len} words)")]
    WordOutOfBounds {
        location: ParagraphRef,
        position: usize,
        len: usize,
    },
}

/// Failure of a single model call, reported by a [`ResponseSource`](crate::ResponseSource).
#[derive(Debug, Clone, Error)]
#[error("{category} request failed: {message}")]
pub struct SourceError {
    pub category: Category,
    pub message: String,
}

impl SourceError {
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}
