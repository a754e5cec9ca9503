// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Scores a predictions file produced by an external model:
//
//   Step 1: Read the JSON array of PredictionRecords
//   Step 2: Standard metrics with the chosen averaging mode
//   Step 3: Pairwise accuracy over complementary pairs
//   Step 4: Append the scores to metrics.csv (optional)
//
// The records must be in the loader's document order, i.e. the
// two statements of every pair next to each other.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::domain::error::Com2SenseError;
use crate::domain::prediction::{PredictionColumns, PredictionRecord};
use crate::infra::metrics::{EvalMetrics, MetricsLogger};
use crate::ml::pairwise::pairwise_accuracy;
use crate::ml::scoring::{evaluate_standard, Average};

// ─── Evaluation Configuration ────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    pub predictions: String,
    pub average: Average,
    /// Directory of metrics.csv; nothing is logged when None
    pub metrics_dir: Option<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            predictions: "predictions.json".to_string(),
            average: Average::Binary,
            metrics_dir: None,
        }
    }
}

// ─── EvaluateUseCase ──────────────────────────────────────────────────────────
pub struct EvaluateUseCase {
    config: EvalConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<EvalMetrics> {
        let cfg = &self.config;

        // ── Step 1: Predictions ───────────────────────────────────────────────
        let records = read_predictions(Path::new(&cfg.predictions))?;
        let cols: PredictionColumns = records.into_iter().collect();
        tracing::info!("Scoring {} predictions from '{}'", cols.labels.len(), cfg.predictions);

        // ── Step 2: Accuracy, precision, recall, F1 ───────────────────────────
        let scores = evaluate_standard(&cols.predictions, &cols.labels, cfg.average)
            .context("Standard evaluation failed")?;

        // ── Step 3: Pairwise accuracy ─────────────────────────────────────────
        // An odd number of records cannot be paired; the standard
        // scores are still reported.
        let pairwise = match pairwise_accuracy(&cols.guids, &cols.predictions, &cols.labels) {
            Ok(acc) => Some(acc),
            Err(e @ Com2SenseError::OddLengthInput { .. }) => {
                tracing::warn!("Skipping pairwise accuracy: {}", e);
                None
            }
            Err(e) => return Err(e).context("Pairwise evaluation failed"),
        };

        let run = Path::new(&cfg.predictions)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("predictions")
            .to_string();
        let metrics = EvalMetrics::new(run, cfg.average, scores, pairwise);

        // ── Step 4: CSV log ───────────────────────────────────────────────────
        if let Some(dir) = &cfg.metrics_dir {
            let logger = MetricsLogger::new(dir.as_str())?;
            logger.log(&metrics)?;
            tracing::info!("Metrics appended to '{}'", logger.csv_path().display());
        }

        Ok(metrics)
    }
}

/// Parse a JSON array of prediction records.
pub fn read_predictions(path: &Path) -> Result<Vec<PredictionRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read predictions from '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid predictions JSON in '{}'", path.display()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn write_predictions(dir: &TempDir, guids: &[i64], preds: &[i64], gold: &[i64]) -> String {
        let records: Vec<PredictionRecord> = guids
            .iter()
            .zip(preds)
            .zip(gold)
            .map(|((&guid, &prediction), &label)| PredictionRecord { guid, prediction, label })
            .collect();
        let path = dir.path().join("dev_preds.json");
        fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_reference_scores() {
        let dir = TempDir::new().unwrap();
        let predictions = write_predictions(
            &dir,
            &[0, 0, 1, 1, 2, 2, 3, 3],
            &[0, 0, 1, 0, 0, 1, 1, 1],
            &[1, 0, 1, 1, 0, 1, 1, 1],
        );
        let metrics_dir = dir.path().join("metrics").to_string_lossy().into_owned();

        let m = EvaluateUseCase::new(EvalConfig {
            predictions,
            average: Average::Binary,
            metrics_dir: Some(metrics_dir.clone()),
        })
        .execute()
        .unwrap();

        assert_eq!(m.run, "dev_preds.json");
        assert_eq!(m.accuracy, 0.75);
        assert_eq!(m.precision, 1.0);
        assert_relative_eq!(m.recall, 4.0 / 6.0, epsilon = 1e-12);
        assert_eq!(m.f1, 0.8);
        assert_eq!(m.pairwise, Some(0.5));

        let csv = fs::read_to_string(Path::new(&metrics_dir).join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_odd_length_skips_pairwise() {
        let dir = TempDir::new().unwrap();
        let predictions = write_predictions(&dir, &[0, 0, 1], &[1, 0, 1], &[1, 0, 0]);

        let m = EvaluateUseCase::new(EvalConfig { predictions, ..EvalConfig::default() })
            .execute()
            .unwrap();
        assert!(m.pairwise.is_none());
        assert_relative_eq!(m.accuracy, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_predictions_fail() {
        let dir = TempDir::new().unwrap();
        let predictions = write_predictions(&dir, &[], &[], &[]);
        assert!(EvaluateUseCase::new(EvalConfig { predictions, ..EvalConfig::default() })
            .execute()
            .is_err());
    }
}
