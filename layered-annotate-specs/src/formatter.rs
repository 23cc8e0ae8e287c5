//! Readable output for flag mismatches.

use crate::runner::WordMismatch;
use std::fmt::Write;

/// Format a flag mismatch with the paragraph it occurred in.
pub fn format_mismatch(
    fixture_name: &str,
    mismatch: &WordMismatch,
    text_context: Option<&str>,
) -> String {
    let mut output = String::new();

    writeln!(output, "\nFAIL: {} {}", fixture_name, mismatch.reference()).unwrap();
    writeln!(output).unwrap();

    if let Some(context) = text_context {
        writeln!(output, "  {}", context).unwrap();
        if let Some((offset, width)) = word_columns(context, mismatch.word) {
            writeln!(output, "  {}{}", " ".repeat(offset), "^".repeat(width)).unwrap();
        }
        writeln!(output).unwrap();
    }

    writeln!(
        output,
        "  word {} \"{}\": expected {}, found {}",
        mismatch.word,
        mismatch.text,
        flag_state(mismatch.expected),
        flag_state(mismatch.actual),
    )
    .unwrap();
    writeln!(output, "  category: {}", mismatch.category.label()).unwrap();

    writeln!(output).unwrap();
    writeln!(output, "  hint: {}", hint(mismatch)).unwrap();

    output
}

/// Format a summary of one fixture's results.
pub fn format_summary(
    fixture_name: &str,
    passed: usize,
    failed: usize,
    expected_failures: usize,
    regressions: usize,
) -> String {
    let mut output = String::new();

    let status = if regressions > 0 { "FAIL" } else { "PASS" };

    writeln!(output, "\n{}: {}", status, fixture_name).unwrap();
    writeln!(
        output,
        "  {} passed, {} failed ({} expected, {} regressions)",
        passed, failed, expected_failures, regressions
    )
    .unwrap();

    output
}

fn flag_state(flagged: bool) -> &'static str {
    if flagged {
        "flagged"
    } else {
        "unflagged"
    }
}

/// Character offset and width of the `index`th whitespace-separated word.
fn word_columns(context: &str, index: usize) -> Option<(usize, usize)> {
    let mut column = 0;
    let mut seen = 0;
    let mut chars = context.chars().peekable();
    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            column += 1;
            continue;
        }
        let mut width = 0;
        while chars.peek().map_or(false, |c| !c.is_whitespace()) {
            chars.next();
            width += 1;
        }
        if seen == index {
            return Some((column, width));
        }
        seen += 1;
        column += width;
    }
    None
}

fn hint(mismatch: &WordMismatch) -> &'static str {
    if mismatch.expected {
        "no accepted fragment covered this word: the quote may have matched another paragraph \
         better or scored below the acceptance threshold"
    } else {
        "a fragment flagged this word: every contiguous sub-phrase of the quote is matched, \
         so short common words match wherever they occur in the chosen paragraph"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_annotate::Category;

    fn mismatch(word: usize, text: &str, expected: bool) -> WordMismatch {
        WordMismatch {
            page: 0,
            paragraph: 1,
            word,
            text: text.to_string(),
            category: Category::Claimant,
            expected,
            actual: !expected,
        }
    }

    #[test]
    fn test_format_missing_flag() {
        let output = format_mismatch(
            "claimant.ann",
            &mismatch(2, "Popescu", true),
            Some("Subsemnatul Ion Popescu solicită"),
        );
        assert!(output.contains("FAIL: claimant.ann P0.1.w2:claimant"));
        assert!(output.contains("expected flagged, found unflagged"));
        assert!(output.contains("acceptance threshold"));
    }

    #[test]
    fn test_underline_targets_word() {
        let output = format_mismatch(
            "claimant.ann",
            &mismatch(2, "Popescu", true),
            Some("Subsemnatul Ion Popescu solicită"),
        );
        let underline = output
            .lines()
            .find(|line| line.contains('^'))
            .unwrap();
        assert_eq!(underline, format!("  {}{}", " ".repeat(16), "^".repeat(7)));
    }

    #[test]
    fn test_underline_counts_chars_not_bytes() {
        assert_eq!(word_columns("în București azi", 2), Some((13, 3)));
        assert_eq!(word_columns("one two", 5), None);
    }

    #[test]
    fn test_format_extra_flag_without_context() {
        let output = format_mismatch("facts.ann", &mismatch(0, "în", false), None);
        assert!(output.contains("expected unflagged, found flagged"));
        assert!(output.contains("sub-phrase"));
        assert!(!output.contains('^'));
    }

    #[test]
    fn test_format_summary_pass() {
        let output = format_summary("petition.ann", 36, 0, 0, 0);
        assert!(output.contains("PASS: petition.ann"));
        assert!(output.contains("36 passed"));
    }

    #[test]
    fn test_format_summary_with_regressions() {
        let output = format_summary("petition.ann", 30, 2, 1, 1);
        assert!(output.contains("FAIL: petition.ann"));
        assert!(output.contains("1 regressions"));
    }
}
