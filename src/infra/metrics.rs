// ============================================================
// Layer 6 — Classification Metrics
// ============================================================
// Accuracy and a per-class precision / recall / F1 / support
// report, rendered in the usual fixed-width text layout:
//
//                 precision    recall  f1-score   support
//
//         setosa       1.00      1.00      1.00        20
//     versicolor       0.95      0.90      0.92        20
//      virginica       0.90      0.95      0.93        20
//
//       accuracy                           0.95        60
//      macro avg       0.95      0.95      0.95        60
//   weighted avg       0.95      0.95      0.95        60
//
// Classes are the sorted union of true and predicted labels.
// A ratio with a zero denominator is reported as 0.0.
//
// Reference: Rust Book §8 (Strings), std::fmt width/precision

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Decimal digits printed for every ratio in the report
const DIGITS: usize = 2;

/// Errors raised when true and predicted labels do not line up.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("{truth} true labels but {predicted} predictions")]
    LengthMismatch { truth: usize, predicted: usize },
}

/// Fraction of predictions equal to the true label; 0.0 for no samples.
pub fn accuracy(y_true: &[String], y_pred: &[String]) -> Result<f64, MetricsError> {
    check_lengths(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(ratio(correct, y_true.len()))
}

/// Scores of a single class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label:     String,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    /// Number of true samples of this class
    pub support:   usize,
}

/// Precision / recall / F1 averaged over classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
}

/// Full per-class report for one set of predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes:      Vec<ClassMetrics>,
    pub accuracy:     f64,
    pub macro_avg:    AverageMetrics,
    pub weighted_avg: AverageMetrics,
    /// Total number of samples
    pub support:      usize,
}

impl ClassificationReport {
    pub fn new(y_true: &[String], y_pred: &[String]) -> Result<Self, MetricsError> {
        check_lengths(y_true, y_pred)?;

        let labels: BTreeSet<&String> = y_true.iter().chain(y_pred).collect();

        let classes: Vec<ClassMetrics> = labels
            .into_iter()
            .map(|label| {
                let mut tp        = 0usize;
                let mut predicted = 0usize;
                let mut support   = 0usize;
                for (t, p) in y_true.iter().zip(y_pred) {
                    let is_true = t == label;
                    let is_pred = p == label;
                    tp        += usize::from(is_true && is_pred);
                    predicted += usize::from(is_pred);
                    support   += usize::from(is_true);
                }
                let precision = ratio(tp, predicted);
                let recall    = ratio(tp, support);
                let f1        = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics { label: label.clone(), precision, recall, f1, support }
            })
            .collect();

        let total = y_true.len();
        let n     = classes.len().max(1) as f64;

        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
            recall:    classes.iter().map(|c| c.recall).sum::<f64>() / n,
            f1:        classes.iter().map(|c| c.f1).sum::<f64>() / n,
        };

        let weighted = |metric: fn(&ClassMetrics) -> f64| {
            let sum: f64 = classes.iter().map(|c| metric(c) * c.support as f64).sum();
            if total == 0 { 0.0 } else { sum / total as f64 }
        };
        let weighted_avg = AverageMetrics {
            precision: weighted(|c: &ClassMetrics| c.precision),
            recall:    weighted(|c: &ClassMetrics| c.recall),
            f1:        weighted(|c: &ClassMetrics| c.f1),
        };

        Ok(Self {
            accuracy: accuracy(y_true, y_pred)?,
            classes,
            macro_avg,
            weighted_avg,
            support: total,
        })
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.chars().count())
            .chain(["weighted avg".len(), DIGITS])
            .max()
            .unwrap_or_default();

        write!(f, "{:>width$} ", "")?;
        for header in ["precision", "recall", "f1-score", "support"] {
            write!(f, " {header:>9}")?;
        }
        writeln!(f)?;
        writeln!(f)?;

        for c in &self.classes {
            write_row(f, width, &c.label, c.precision, c.recall, c.f1, c.support)?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.DIGITS$} {:>9}",
            "accuracy", "", "", self.accuracy, self.support
        )?;

        let m = &self.macro_avg;
        write_row(f, width, "macro avg", m.precision, m.recall, m.f1, self.support)?;
        let w = &self.weighted_avg;
        write_row(f, width, "weighted avg", w.precision, w.recall, w.f1, self.support)
    }
}

fn write_row(
    f:         &mut fmt::Formatter<'_>,
    width:     usize,
    heading:   &str,
    precision: f64,
    recall:    f64,
    f1:        f64,
    support:   usize,
) -> fmt::Result {
    writeln!(
        f,
        "{heading:>width$}  {precision:>9.DIGITS$} {recall:>9.DIGITS$} {f1:>9.DIGITS$} {support:>9}"
    )
}

fn check_lengths(y_true: &[String], y_pred: &[String]) -> Result<(), MetricsError> {
    if y_true.len() != y_pred.len() {
        return Err(MetricsError::LengthMismatch {
            truth:     y_true.len(),
            predicted: y_pred.len(),
        });
    }
    Ok(())
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}
