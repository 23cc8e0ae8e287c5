//! Expected failures tracking via TOML file.
//!
//! ```toml
//! [[known]]
//! fixture = "diacritics.ann"
//! word = "P0.0.w2:respondent"
//! reason = "diacritics are not folded"
//! ```

use crate::errors::{SpecError, SpecResult};
use layered_annotate::Category;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Loaded expected failures configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedFailures {
    /// Known limitations of the matcher.
    #[serde(default)]
    pub known: Vec<FailureEntry>,
    /// Mismatches awaiting a fix.
    #[serde(default)]
    pub pending: Vec<FailureEntry>,
}

/// A single expected mismatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Fixture path relative to the fixtures directory.
    pub fixture: String,
    /// Word reference, e.g. `P1.0.w3:claimant` for the claimant flag of
    /// word 3 in paragraph 0 of page 1.
    pub word: String,
    #[serde(default)]
    pub reason: Option<String>,
    /// Date added (YYYY-MM-DD).
    #[serde(default)]
    pub added: Option<String>,
}

/// Failure lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureState {
    Known,
    Pending,
    /// Not listed: the mismatch is a regression.
    Regression,
}

impl ExpectedFailures {
    /// Load from a TOML file. A missing file means no expected failures.
    pub fn load(path: &Path) -> SpecResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SpecError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SpecError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn is_expected(&self, fixture: &str, word_ref: &str) -> FailureState {
        if Self::find(&self.known, fixture, word_ref).is_some() {
            FailureState::Known
        } else if Self::find(&self.pending, fixture, word_ref).is_some() {
            FailureState::Pending
        } else {
            FailureState::Regression
        }
    }

    fn find<'a>(
        entries: &'a [FailureEntry],
        fixture: &str,
        word_ref: &str,
    ) -> Option<&'a FailureEntry> {
        entries
            .iter()
            .find(|e| e.fixture == fixture && e.word == word_ref)
    }

    /// Format a word reference from its position and the compared flag.
    pub fn format_ref(page: usize, paragraph: usize, word: usize, category: Category) -> String {
        format!("P{}.{}.w{}:{}", page, paragraph, word, category.label())
    }

    pub fn count(&self) -> usize {
        self.known.len() + self.pending.len()
    }

    pub fn get_entry(&self, fixture: &str, word_ref: &str) -> Option<&FailureEntry> {
        Self::find(&self.known, fixture, word_ref)
            .or_else(|| Self::find(&self.pending, fixture, word_ref))
    }

    /// Entries whose fixture produced no matching mismatch in `seen`.
    ///
    /// These are stale once the matcher improves and should be removed.
    pub fn unused<'a>(&'a self, seen: &[(String, String)]) -> Vec<&'a FailureEntry> {
        self.known
            .iter()
            .chain(self.pending.iter())
            .filter(|e| {
                !seen
                    .iter()
                    .any(|(fixture, word)| *fixture == e.fixture && *word == e.word)
            })
            .collect()
    }
}

/// Result of running the harness.
#[derive(Debug, Clone, Default)]
pub struct HarnessResult {
    /// Word flags checked.
    pub total: usize,
    /// Flags matching the fixture.
    pub passed: usize,
    /// Mismatches listed as known or pending.
    pub expected_failures: usize,
    /// Mismatches not listed.
    pub regressions: usize,
}

impl HarnessResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self) -> bool {
        self.regressions == 0
    }

    pub fn record_pass(&mut self) {
        self.total += 1;
        self.passed += 1;
    }

    pub fn record_failure(&mut self, state: FailureState) {
        self.total += 1;
        match state {
            FailureState::Known | FailureState::Pending => self.expected_failures += 1,
            FailureState::Regression => self.regressions += 1,
        }
    }

    /// Add another run's counts to this one.
    pub fn merge(&mut self, other: &HarnessResult) {
        self.total += other.total;
        self.passed += other.passed;
        self.expected_failures += other.expected_failures;
        self.regressions += other.regressions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn entry(fixture: &str, word: &str) -> FailureEntry {
        FailureEntry {
            fixture: fixture.to_string(),
            word: word.to_string(),
            reason: None,
            added: None,
        }
    }

    #[test]
    fn test_states() {
        let failures = ExpectedFailures {
            known: vec![entry("a.ann", "P0.0.w1:claimant")],
            pending: vec![entry("a.ann", "P0.0.w2:claimant")],
        };
        assert_eq!(failures.is_expected("a.ann", "P0.0.w1:claimant"), FailureState::Known);
        assert_eq!(failures.is_expected("a.ann", "P0.0.w2:claimant"), FailureState::Pending);
        assert_eq!(failures.is_expected("b.ann", "P0.0.w1:claimant"), FailureState::Regression);
        assert_eq!(failures.count(), 2);
        assert!(failures.get_entry("a.ann", "P0.0.w2:claimant").is_some());
    }

    #[test]
    fn test_format_ref() {
        assert_eq!(
            ExpectedFailures::format_ref(2, 5, 0, Category::LegalBasis),
            "P2.5.w0:legal_basis"
        );
    }

    #[test]
    fn test_unused_entries() {
        let failures = ExpectedFailures {
            known: vec![entry("a.ann", "P0.0.w1:claimant"), entry("a.ann", "P0.0.w4:request")],
            pending: vec![],
        };
        let seen = vec![("a.ann".to_string(), "P0.0.w1:claimant".to_string())];
        let unused = failures.unused(&seen);
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0].word, "P0.0.w4:request");
    }

    #[test]
    fn test_harness_result_record() {
        let mut result = HarnessResult::new();
        result.record_pass();
        result.record_failure(FailureState::Known);
        assert!(result.success());
        result.record_failure(FailureState::Regression);
        assert_eq!(result.total, 3);
        assert_eq!((result.passed, result.expected_failures, result.regressions), (1, 1, 1));
        assert!(!result.success());

        let mut total = HarnessResult::new();
        total.merge(&result);
        total.merge(&result);
        assert_eq!((total.total, total.passed, total.regressions), (6, 2, 2));
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[pending]]
fixture = "request.ann"
word = "P0.1.w3:request"
reason = "hyphenated compound split differently by the model"
added = "2026-10-17"

[[known]]
fixture = "diacritics.ann"
word = "P0.0.w2:respondent"
"#
        )
        .unwrap();

        let failures = ExpectedFailures::load(file.path()).unwrap();
        assert_eq!(failures.pending.len(), 1);
        assert_eq!(failures.known.len(), 1);
        assert_eq!(
            failures.is_expected("diacritics.ann", "P0.0.w2:respondent"),
            FailureState::Known
        );
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[known]]\nfixture = 3").unwrap();
        assert!(matches!(
            ExpectedFailures::load(file.path()),
            Err(SpecError::Load { .. })
        ));
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let failures = ExpectedFailures::load(Path::new("/nonexistent/path.toml")).unwrap();
        assert_eq!(failures.count(), 0);
    }
}
