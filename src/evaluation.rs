//! Word-level comparison of a predicted document against a gold one.

use serde::Serialize;

use crate::category::Category;
use crate::document::Document;

/// Word-level metrics for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMetrics {
    pub category: Category,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Words compared after truncating to the shorter document.
    pub total_words: usize,
    pub gold_positive: usize,
    pub predicted_positive: usize,
    /// Predicted flags with no gold counterpart (false positives).
    pub extra: usize,
    /// `extra` as a percentage of `total_words`.
    pub extra_percentage: f64,
    /// Flagged texts in document order, for side-by-side inspection.
    pub gold_words: String,
    pub predicted_words: String,
}

impl CategoryMetrics {
    fn empty(category: Category) -> Self {
        Self {
            category,
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
            total_words: 0,
            gold_positive: 0,
            predicted_positive: 0,
            extra: 0,
            extra_percentage: 0.0,
            gold_words: String::new(),
            predicted_words: String::new(),
        }
    }

    pub fn recall_percentage(&self) -> f64 {
        self.recall * 100.0
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: recall={:.1}%, extra={} ({:.1}%), f1={:.3}",
            self.category,
            self.recall_percentage(),
            self.extra,
            self.extra_percentage,
            self.f1
        )
    }
}

struct FlagColumn<'a> {
    flags: Vec<bool>,
    flagged_texts: Vec<&'a str>,
}

fn flag_column(document: &Document, category: Category) -> FlagColumn<'_> {
    let mut flags = Vec::new();
    let mut flagged_texts = Vec::new();
    for word in document.words().filter(|w| !w.is_blank()) {
        let flag = word.flag(category);
        flags.push(flag);
        if flag {
            flagged_texts.push(word.text.trim());
        }
    }
    FlagColumn {
        flags,
        flagged_texts,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Compare `predicted` against `gold` for each of `categories`.
///
/// Only non-blank words take part. The two word sequences are compared
/// position by position; when their lengths differ the longer one is
/// truncated.
pub fn evaluate(
    gold: &Document,
    predicted: &Document,
    categories: &[Category],
) -> Vec<CategoryMetrics> {
    categories
        .iter()
        .map(|&category| evaluate_category(gold, predicted, category))
        .collect()
}

fn evaluate_category(gold: &Document, predicted: &Document, category: Category) -> CategoryMetrics {
    let gold_column = flag_column(gold, category);
    let predicted_column = flag_column(predicted, category);

    let total_words = gold_column.flags.len().min(predicted_column.flags.len());
    let mut metrics = CategoryMetrics::empty(category);
    metrics.gold_words = gold_column.flagged_texts.join(" ");
    metrics.predicted_words = predicted_column.flagged_texts.join(" ");
    if total_words == 0 {
        return metrics;
    }

    let gold_flags = &gold_column.flags[..total_words];
    let predicted_flags = &predicted_column.flags[..total_words];

    let (mut tp, mut fp, mut fn_) = (0, 0, 0);
    for (&g, &p) in gold_flags.iter().zip(predicted_flags) {
        match (g, p) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }

    metrics.precision = ratio(tp, tp + fp);
    metrics.recall = ratio(tp, tp + fn_);
    metrics.f1 = if metrics.precision + metrics.recall > 0.0 {
        2.0 * metrics.precision * metrics.recall / (metrics.precision + metrics.recall)
    } else {
        0.0
    };
    metrics.total_words = total_words;
    metrics.gold_positive = gold_flags.iter().filter(|&&f| f).count();
    metrics.predicted_positive = predicted_flags.iter().filter(|&&f| f).count();
    metrics.extra = fp;
    metrics.extra_percentage = ratio(fp, total_words) * 100.0;
    metrics
}
