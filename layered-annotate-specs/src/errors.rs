//! Error types for the fixture harness.

use thiserror::Error;

/// Errors that can occur while loading or parsing fixtures.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Error parsing a fixture file.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Error loading a fixture or expected-failures file.
    #[error("failed to load fixture: {path}: {message}")]
    Load { path: String, message: String },

    /// A fixture file failed to parse.
    #[error("{path}: {source}")]
    Fixture {
        path: String,
        #[source]
        source: Box<SpecError>,
    },

    /// A marker or response line names a category outside the vocabulary.
    #[error("unknown category `{name}` at line {line}")]
    UnknownCategory { line: usize, name: String },
}

/// Result type for fixture operations.
pub type SpecResult<T> = Result<T, SpecError>;
