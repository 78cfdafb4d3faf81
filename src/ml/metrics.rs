use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scores produced by one evaluation pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Weighted-average precision across classes
    pub precision: f64,

    /// Weighted-average recall across classes
    pub recall: f64,

    /// Harmonic mean of the weighted precision and recall values above.
    /// This differs from a per-class-weighted F1 whenever class scores are
    /// uneven; callers comparing against a reference ML library must use
    /// the same definition.
    pub f1_score: f64,
}

/// Per-class support: how often each class occurs in the true labels
fn class_support(actual: &[i32]) -> BTreeMap<i32, usize> {
    let mut support = BTreeMap::new();
    for &class in actual {
        *support.entry(class).or_insert(0) += 1;
    }
    support
}

/// Weighted-average precision, with zero-division defined as 0.
///
/// Classes are weighted by their frequency in `actual`; a class with no
/// predicted positives contributes 0 rather than failing.
pub fn weighted_precision(actual: &[i32], predicted: &[i32]) -> f64 {
    let total = actual.len();
    if total == 0 {
        return 0.0;
    }

    class_support(actual)
        .iter()
        .map(|(&class, &support)| {
            let true_positives = actual
                .iter()
                .zip(predicted.iter())
                .filter(|(a, p)| **a == class && **p == class)
                .count();
            let predicted_positives = predicted.iter().filter(|&&p| p == class).count();

            let precision = if predicted_positives > 0 {
                true_positives as f64 / predicted_positives as f64
            } else {
                0.0
            };

            (support as f64 / total as f64) * precision
        })
        .sum()
}

/// Weighted-average recall, with zero-division defined as 0.
pub fn weighted_recall(actual: &[i32], predicted: &[i32]) -> f64 {
    let total = actual.len();
    if total == 0 {
        return 0.0;
    }

    class_support(actual)
        .iter()
        .map(|(&class, &support)| {
            let true_positives = actual
                .iter()
                .zip(predicted.iter())
                .filter(|(a, p)| **a == class && **p == class)
                .count();

            // support > 0 for every class taken from `actual`
            let recall = true_positives as f64 / support as f64;

            (support as f64 / total as f64) * recall
        })
        .sum()
}

/// Score `predicted` against `actual`
pub fn weighted_report(actual: &[i32], predicted: &[i32]) -> EvaluationReport {
    let precision = weighted_precision(actual, predicted);
    let recall = weighted_recall(actual, predicted);
    let f1_score = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    EvaluationReport {
        precision,
        recall,
        f1_score,
    }
}
