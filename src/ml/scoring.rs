// ============================================================
// Layer 5 — Standard Classification Metrics
// ============================================================
// Accuracy, precision, recall and F1 over flat predictions,
// with the averaging strategies of scikit-learn's
// `precision_recall_fscore_support`:
//
//   binary   → scores of the positive class (label 1) only
//   micro    → one global TP / FP / FN count over all labels
//   macro    → unweighted mean of the per-label scores
//   weighted → per-label scores weighted by gold support
//
// "All labels" means every label seen in the gold labels or the
// predictions. A zero denominator scores 0.0 and logs a warning.
//
// Example (binary):
//   preds: 0 0 1 0 0 1 1 1
//   gold:  1 0 1 1 0 1 1 1
//   TP=4 FP=0 FN=2 → precision 1.0, recall 0.667, F1 0.8
//   accuracy 6/8 = 0.75

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{Com2SenseError, Result};

/// Label treated as the positive class by binary averaging.
pub const POSITIVE_LABEL: i64 = 1;

/// Averaging strategy for precision, recall and F1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Average {
    #[default]
    Binary,
    Micro,
    Macro,
    Weighted,
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Average::Binary => "binary",
            Average::Micro => "micro",
            Average::Macro => "macro",
            Average::Weighted => "weighted",
        };
        f.write_str(name)
    }
}

impl FromStr for Average {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(Average::Binary),
            "micro" => Ok(Average::Micro),
            "macro" => Ok(Average::Macro),
            "weighted" => Ok(Average::Weighted),
            other => Err(format!(
                "unknown averaging mode '{other}' (expected binary, micro, macro or weighted)"
            )),
        }
    }
}

/// The four scores returned by `evaluate_standard`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScores {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// True / false positive and false negative counts for one label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LabelCounts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

impl LabelCounts {
    fn of(label: i64, predictions: &[i64], gold: &[i64]) -> Self {
        let mut c = LabelCounts::default();
        for (&p, &g) in predictions.iter().zip(gold) {
            match (p == label, g == label) {
                (true, true) => c.tp += 1,
                (true, false) => c.fp += 1,
                (false, true) => c.fn_ += 1,
                (false, false) => {}
            }
        }
        c
    }

    fn add(self, other: Self) -> Self {
        Self {
            tp: self.tp + other.tp,
            fp: self.fp + other.fp,
            fn_: self.fn_ + other.fn_,
        }
    }

    fn support(&self) -> usize {
        self.tp + self.fn_
    }

    fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp, "precision")
    }

    fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_, "recall")
    }

    /// F1 from counts, 2TP / (2TP + FP + FN)
    fn f1(&self) -> f64 {
        ratio(2 * self.tp, 2 * self.tp + self.fp + self.fn_, "F1")
    }
}

fn ratio(num: usize, den: usize, what: &str) -> f64 {
    if den == 0 {
        tracing::warn!("{} is ill-defined (zero denominator), scoring 0.0", what);
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Accuracy plus precision, recall and F1 under `average`.
///
/// Fails with `EmptyInput` when the inputs are empty or of
/// different lengths, and with `NonBinaryLabels` when binary
/// averaging sees more than two labels, or two labels without 1.
pub fn evaluate_standard(predictions: &[i64], gold: &[i64], average: Average) -> Result<StandardScores> {
    if predictions.is_empty() || predictions.len() != gold.len() {
        return Err(Com2SenseError::EmptyInput {
            predictions: predictions.len(),
            labels: gold.len(),
        });
    }

    let correct = predictions.iter().zip(gold).filter(|(p, g)| p == g).count();
    let accuracy = correct as f64 / predictions.len() as f64;

    let labels: BTreeSet<i64> = predictions.iter().chain(gold).copied().collect();

    let (precision, recall, f1) = match average {
        Average::Binary => {
            // At most two labels, and label 1 must be one of them when there are two
            let binary = match labels.len() {
                0 | 1 => true,
                2 => labels.contains(&POSITIVE_LABEL),
                _ => false,
            };
            if !binary {
                return Err(Com2SenseError::NonBinaryLabels {
                    labels: labels.into_iter().collect(),
                });
            }
            let c = LabelCounts::of(POSITIVE_LABEL, predictions, gold);
            (c.precision(), c.recall(), c.f1())
        }
        Average::Micro => {
            let c = labels
                .iter()
                .map(|&l| LabelCounts::of(l, predictions, gold))
                .fold(LabelCounts::default(), LabelCounts::add);
            (c.precision(), c.recall(), c.f1())
        }
        Average::Macro => {
            let per_label: Vec<LabelCounts> =
                labels.iter().map(|&l| LabelCounts::of(l, predictions, gold)).collect();
            let n = per_label.len() as f64;
            (
                per_label.iter().map(LabelCounts::precision).sum::<f64>() / n,
                per_label.iter().map(LabelCounts::recall).sum::<f64>() / n,
                per_label.iter().map(LabelCounts::f1).sum::<f64>() / n,
            )
        }
        Average::Weighted => {
            let per_label: Vec<LabelCounts> =
                labels.iter().map(|&l| LabelCounts::of(l, predictions, gold)).collect();
            let total: usize = per_label.iter().map(LabelCounts::support).sum();
            let weighted = |score: fn(&LabelCounts) -> f64| {
                per_label
                    .iter()
                    .map(|c| score(c) * c.support() as f64)
                    .sum::<f64>()
                    / total as f64
            };
            (
                weighted(LabelCounts::precision),
                weighted(LabelCounts::recall),
                weighted(LabelCounts::f1),
            )
        }
    };

    Ok(StandardScores { accuracy, precision, recall, f1 })
}
