#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Fixture-driven merge tests for layered-annotate.
//!
//! A `.ann` fixture holds a small document whose expected per-word flags are
//! written inline as `«category:text»` markers, followed by the raw model
//! responses to merge into it. The harness merges the responses and compares
//! every flag of every word against the markers.
//!
//! ## Modules
//!
//! - [`parser`] - Parses `.ann` fixture files
//! - [`fixture`] - Parsed fixture types
//! - [`loader`] - Loads a fixture suite and its expected failures from disk
//! - [`runner`] - Merges a fixture and compares flags
//! - [`formatter`] - Mismatch and summary output
//! - [`failures`] - Expected failures tracking via TOML
//! - [`errors`] - Error types

pub mod errors;
pub mod failures;
pub mod fixture;
pub mod formatter;
pub mod loader;
pub mod parser;
pub mod runner;

pub use errors::{SpecError, SpecResult};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult};
pub use fixture::{AnnFixture, ExpectedWord, FixturePage, FixtureParagraph, ResponseLine, SpanMark};
pub use formatter::{format_mismatch, format_summary};
pub use loader::{
    load_all_fixtures, load_fixture, FixtureSuite, NamedFixture, EXPECTED_FAILURES_FILE,
};
pub use parser::{parse_fixture, parse_marks};
pub use runner::{
    check_fixture, engine_for, run_fixture, run_suite, FixtureCheck, FixtureRun, SuiteRun,
    WordMismatch,
};
