//! Runs fixtures through the merge engine and compares flags word by word.

use crate::failures::{ExpectedFailures, FailureState, HarnessResult};
use crate::fixture::AnnFixture;
use crate::formatter::{format_mismatch, format_summary};
use crate::loader::FixtureSuite;
use layered_annotate::{Category, MatchConfig, MergeEngine, Merged};
use tracing::{debug, info};

/// A word whose flag for one category differs from the fixture's marks.
#[derive(Debug, Clone, PartialEq)]
pub struct WordMismatch {
    pub page: usize,
    pub paragraph: usize,
    pub word: usize,
    pub text: String,
    pub category: Category,
    pub expected: bool,
    pub actual: bool,
}

impl WordMismatch {
    /// Reference used in `expected-failures.toml`.
    pub fn reference(&self) -> String {
        ExpectedFailures::format_ref(self.page, self.paragraph, self.word, self.category)
    }
}

/// Result of running one fixture.
#[derive(Debug, Clone)]
pub struct FixtureRun {
    pub merged: Merged,
    /// Word/category pairs compared.
    pub checked: usize,
    pub mismatches: Vec<WordMismatch>,
}

impl FixtureRun {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// The engine a fixture asks for.
pub fn engine_for(fixture: &AnnFixture) -> MergeEngine {
    let config = match fixture.threshold {
        Some(threshold) => MatchConfig::new().with_threshold(threshold),
        None => MatchConfig::default(),
    };
    MergeEngine::new(config)
}

/// Merge the fixture's responses into its document and compare every flag
/// of every word against the marks.
pub fn run_fixture(fixture: &AnnFixture) -> FixtureRun {
    let document = fixture.to_document();
    let merged = engine_for(fixture).merge(&document, &fixture.category_responses());

    let mut checked = 0;
    let mut mismatches = Vec::new();
    for expected in fixture.expected_words() {
        let word = merged
            .document
            .pages
            .get(expected.page)
            .and_then(|page| page.paragraphs.get(expected.paragraph))
            .and_then(|paragraph| paragraph.words.get(expected.word));

        for category in Category::ALL {
            checked += 1;
            let wanted = expected.categories.contains(&category);
            let actual = word.map_or(false, |w| w.flag(category));
            if wanted != actual {
                mismatches.push(WordMismatch {
                    page: expected.page,
                    paragraph: expected.paragraph,
                    word: expected.word,
                    text: expected.text.clone(),
                    category,
                    expected: wanted,
                    actual,
                });
            }
        }
    }

    FixtureRun {
        merged,
        checked,
        mismatches,
    }
}

/// What [`check_fixture`] found in one fixture.
#[derive(Debug, Clone, Default)]
pub struct FixtureCheck {
    /// References of every mismatch, expected or not.
    pub references: Vec<String>,
    /// Formatted output for mismatches not listed as expected.
    pub regressions: Vec<String>,
}

/// Run a fixture and record its outcome in `result`.
///
/// Mismatches listed in `expected` are counted as expected failures; the
/// rest are regressions.
pub fn check_fixture(
    name: &str,
    fixture: &AnnFixture,
    expected: &ExpectedFailures,
    result: &mut HarnessResult,
) -> FixtureCheck {
    let run = run_fixture(fixture);
    debug!(
        fixture = name,
        checked = run.checked,
        mismatches = run.mismatches.len(),
        "fixture merged"
    );
    let mut check = FixtureCheck::default();

    for _ in 0..run.checked - run.mismatches.len() {
        result.record_pass();
    }
    for mismatch in &run.mismatches {
        let reference = mismatch.reference();
        let state = expected.is_expected(name, &reference);
        result.record_failure(state);
        if state == FailureState::Regression {
            let context = fixture
                .paragraph(mismatch.page, mismatch.paragraph)
                .map(|p| p.text.as_str());
            check.regressions.push(format_mismatch(name, mismatch, context));
        }
        check.references.push(reference);
    }

    check
}

/// Outcome of running a whole [`FixtureSuite`].
#[derive(Debug, Clone, Default)]
pub struct SuiteRun {
    pub result: HarnessResult,
    /// Mismatch details and per-fixture summaries of failing fixtures.
    pub report: String,
    /// Expected-failure entries that no mismatch matched, as
    /// `fixture word` pairs.
    pub stale: Vec<String>,
}

impl SuiteRun {
    /// No regressions and no stale expected failures.
    pub fn success(&self) -> bool {
        self.result.success() && self.stale.is_empty()
    }
}

/// Check every fixture of `suite` against its expected failures.
pub fn run_suite(suite: &FixtureSuite) -> SuiteRun {
    let mut run = SuiteRun::default();
    let mut seen = Vec::new();

    for named in &suite.fixtures {
        let mut result = HarnessResult::new();
        let check = check_fixture(&named.name, &named.fixture, &suite.expected, &mut result);
        seen.extend(
            check
                .references
                .into_iter()
                .map(|reference| (named.name.clone(), reference)),
        );

        if !result.success() {
            run.report.extend(check.regressions);
            run.report.push_str(&format_summary(
                &named.name,
                result.passed,
                result.expected_failures + result.regressions,
                result.expected_failures,
                result.regressions,
            ));
        }
        run.result.merge(&result);
    }

    run.stale = suite
        .expected
        .unused(&seen)
        .into_iter()
        .map(|entry| format!("{} {}", entry.fixture, entry.word))
        .collect();
    info!(
        fixtures = suite.len(),
        checked = run.result.total,
        expected_failures = run.result.expected_failures,
        regressions = run.result.regressions,
        stale = run.stale.len(),
        "fixture suite finished"
    );
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::NamedFixture;
    use crate::parse_fixture;

    #[test]
    fn test_passing_fixture() {
        let fixture = parse_fixture(
            "Subsemnatul «claimant:Ion Popescu» solicită anularea actului.\n> claimant: <p>Ion Popescu</p>\n",
        )
        .unwrap();
        let run = run_fixture(&fixture);
        assert!(run.passed(), "{:?}", run.mismatches);
        assert_eq!(run.checked, 6 * 6);
    }

    #[test]
    fn test_missing_and_extra_flags_reported() {
        let fixture = parse_fixture(
            "«claimant:Ion» Popescu contra Alfa\n> claimant: <p>Popescu</p>\n",
        )
        .unwrap();
        let run = run_fixture(&fixture);
        let found: Vec<(usize, bool, bool)> = run
            .mismatches
            .iter()
            .map(|m| (m.word, m.expected, m.actual))
            .collect();
        assert_eq!(found, vec![(0, true, false), (1, false, true)]);
        assert_eq!(run.mismatches[0].reference(), "P0.0.w0:claimant");
    }

    #[test]
    fn test_threshold_directive_used() {
        let fixture = parse_fixture(
            "a «evidence:b» c d e f g h i j k l\n> evidence: <p>zz b yy</p>\n@threshold: 0.05\n",
        )
        .unwrap();
        assert!(run_fixture(&fixture).passed());
    }

    #[test]
    fn test_check_fixture_splits_expected_and_regressions() {
        let fixture = parse_fixture(
            "«claimant:Ion» Popescu contra Alfa\n> claimant: <p>Popescu</p>\n",
        )
        .unwrap();
        let expected: ExpectedFailures = toml::from_str(
            r#"
[[known]]
fixture = "t.ann"
word = "P0.0.w0:claimant"
"#,
        )
        .unwrap();

        let mut result = HarnessResult::new();
        let check = check_fixture("t.ann", &fixture, &expected, &mut result);
        assert_eq!(result.total, 24);
        assert_eq!(result.expected_failures, 1);
        assert_eq!(result.regressions, 1);
        assert_eq!(check.references, vec!["P0.0.w0:claimant", "P0.0.w1:claimant"]);
        assert_eq!(check.regressions.len(), 1);
        assert!(check.regressions[0].contains("P0.0.w1:claimant"));
    }

    fn suite(expected: &str) -> FixtureSuite {
        let fixture = parse_fixture(
            "«claimant:Ion» Popescu contra Alfa\n> claimant: <p>Ion Popescu</p>\n",
        )
        .unwrap();
        FixtureSuite {
            fixtures: vec![NamedFixture {
                name: "t.ann".to_string(),
                fixture,
            }],
            expected: toml::from_str(expected).unwrap(),
        }
    }

    #[test]
    fn test_run_suite_reports_regressions() {
        let run = run_suite(&suite(""));
        assert_eq!(run.result.regressions, 1);
        assert!(run.report.contains("FAIL: t.ann P0.0.w1:claimant"));
        assert!(run.report.contains("1 regressions"));
        assert!(!run.success());
    }

    #[test]
    fn test_run_suite_flags_stale_entries() {
        let run = run_suite(&suite(
            r#"
[[known]]
fixture = "t.ann"
word = "P0.0.w1:claimant"

[[pending]]
fixture = "t.ann"
word = "P0.0.w3:respondent"
"#,
        ));
        assert!(run.result.success());
        assert!(run.report.is_empty());
        assert_eq!(run.stale, vec!["t.ann P0.0.w3:respondent"]);
        assert!(!run.success());
    }
}
