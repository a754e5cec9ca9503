// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records evaluation scores to a CSV file, one row per run.
//
// Metrics recorded per evaluation:
//   - run:       free-form name, e.g. the predictions file
//   - average:   averaging mode used for precision/recall/F1
//   - accuracy:  fraction of statements classified correctly
//   - precision, recall, f1
//   - pairwise:  fraction of complementary pairs with both
//                statements correct
//
// Output file: <dir>/metrics.csv
//
// Example CSV output:
//   run,average,accuracy,precision,recall,f1,pairwise
//   dev_preds.json,binary,0.750000,1.000000,0.666667,0.800000,0.500000
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use crate::ml::scoring::{Average, StandardScores};

const HEADER: &str = "run,average,accuracy,precision,recall,f1,pairwise";

/// One row of evaluation results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub run: String,
    pub average: Average,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,

    /// None when the predictions cannot be paired (odd length)
    pub pairwise: Option<f64>,
}

impl EvalMetrics {
    pub fn new(run: impl Into<String>, average: Average, scores: StandardScores, pairwise: Option<f64>) -> Self {
        Self {
            run: run.into(),
            average,
            accuracy: scores.accuracy,
            precision: scores.precision,
            recall: scores.recall,
            f1: scores.f1,
            pairwise,
        }
    }

    fn csv_row(&self) -> String {
        let pairwise = self.pairwise.map(|p| format!("{p:.6}")).unwrap_or_default();
        format!(
            "{},{},{:.6},{:.6},{:.6},{:.6},{}",
            self.run.replace(',', ";"),
            self.average,
            self.accuracy,
            self.precision,
            self.recall,
            self.f1,
            pairwise,
        )
    }
}

/// Appends evaluation metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one evaluation as a new row.
    pub fn log(&self, m: &EvalMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(f, "{}", m.csv_row())?;

        tracing::debug!(
            "Logged metrics for '{}': accuracy={:.4}, f1={:.4}",
            m.run,
            m.accuracy,
            m.f1,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
