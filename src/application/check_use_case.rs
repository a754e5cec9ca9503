// ============================================================
// Layer 2 — CheckUseCase
// ============================================================
// End-to-end smoke check of the data pipeline on one split:
//
//   Step 1: Load statements               (Layer 4 - data)
//   Step 2: Load / build the tokenizer    (Layer 6 - infra)
//   Step 3: Encode into a dataset         (Layer 4 - data)
//   Step 4: Collate the first batch       (Layer 4 - data)
//   Step 5: Mask it for MLM               (Layer 5 - ml)
//
// The first batch must come out as [batch_size, max_seq_length]
// (fewer rows only if the split is smaller than one batch).

use anyhow::{bail, Context, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::{
    batcher::StatementBatcher,
    dataset::{StatementDataset, StatementEncoder},
    loader::Com2SenseLoader,
};
use crate::domain::statement::Split;
use crate::domain::traits::StatementSource;
use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::masking::{mask_tokens_with_tokenizer, MaskingConfig};
use crate::ml::rng::seeded_rng;

// ─── Check Configuration ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub data_dir: String,
    pub split: Split,
    pub tokenizer_dir: String,
    pub max_seq_length: usize,
    pub batch_size: usize,
    pub vocab_size: usize,
    pub mlm_probability: f64,
    pub seed: u64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            data_dir: "datasets/com2sense".to_string(),
            split: Split::Dev,
            tokenizer_dir: "tokenizer".to_string(),
            max_seq_length: 32,
            batch_size: 2,
            vocab_size: 30522,
            mlm_probability: 0.15,
            seed: 42,
        }
    }
}

/// What the check saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub statements: usize,
    pub batches: usize,
    pub first_batch_shape: (usize, usize),
    /// Non-padding positions in the first batch
    pub real_tokens: usize,
    /// Whether the first batch carries gold labels
    pub labelled: bool,
    pub masked_positions: usize,
}

// ─── CheckUseCase ─────────────────────────────────────────────────────────────
pub struct CheckUseCase {
    config: CheckConfig,
}

impl CheckUseCase {
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<CheckReport> {
        let cfg = &self.config;
        if cfg.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        let mut rng = seeded_rng(cfg.seed);

        // ── Step 1: Statements ────────────────────────────────────────────────
        let statements = Com2SenseLoader::new(&cfg.data_dir, cfg.split)
            .load_statements()
            .with_context(|| format!("Cannot load the {} split from '{}'", cfg.split, cfg.data_dir))?;
        if statements.is_empty() {
            bail!("The {} split in '{}' has no records", cfg.split, cfg.data_dir);
        }

        // ── Step 2: Tokenizer ─────────────────────────────────────────────────
        let texts: Vec<String> = statements.iter().map(|s| s.text.clone()).collect();
        let tokenizer = TokenizerStore::new(&cfg.tokenizer_dir).load_or_build(&texts, cfg.vocab_size)?;

        // ── Step 3: Encoded dataset ───────────────────────────────────────────
        let encoder = StatementEncoder::new(&tokenizer, cfg.max_seq_length)?;
        let dataset = StatementDataset::new(encoder.encode_all(&statements)?);
        tracing::info!("Encoded {} statements", dataset.len());

        // ── Step 4: First batch ───────────────────────────────────────────────
        let first = dataset
            .chunks(cfg.batch_size)
            .next()
            .context("Dataset produced no batches")?;
        let batch = StatementBatcher::new().batch(first)?;

        let expected = (cfg.batch_size.min(dataset.len()), cfg.max_seq_length);
        if batch.shape() != expected {
            bail!(
                "Batch not loading correctly: expected shape {:?}, got {:?}",
                expected,
                batch.shape()
            );
        }

        tracing::debug!(
            "First batch guids {:?}, token types {:?}",
            batch.guids,
            batch.token_type_ids
        );

        // ── Step 5: MLM masking of the batch ──────────────────────────────────
        let masking = MaskingConfig::for_tokenizer(&tokenizer, cfg.mlm_probability);
        let masked = mask_tokens_with_tokenizer(&batch.input_ids, None, &tokenizer, &masking, &mut rng)?;

        let report = CheckReport {
            statements: dataset.len(),
            batches: dataset.len().div_ceil(cfg.batch_size),
            first_batch_shape: batch.shape(),
            real_tokens: batch.attention_mask.iter().flatten().filter(|&&m| m == 1).count(),
            labelled: batch.labels.is_some(),
            masked_positions: masked.selected_count(masking.ignore_index),
        };
        tracing::info!("{} dataset loading correctly: {:?}", cfg.split, report);
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const DEV: &str = r#"[
        {"sent_1": "The sofa is heavier than the pillow.", "sent_2": "The pillow is heavier than the sofa.",
         "label_1": "True", "label_2": "False",
         "domain": "physical", "scenario": "comparison", "numeracy": "False"},
        {"sent_1": "She thanked him for the gift.", "sent_2": "She scolded him for the gift.",
         "label_1": "True", "label_2": "False",
         "domain": "social", "scenario": "causal", "numeracy": "False"}
    ]"#;

    fn config(dir: &TempDir) -> CheckConfig {
        fs::write(dir.path().join("dev.json"), DEV).unwrap();
        CheckConfig {
            data_dir: dir.path().to_string_lossy().into_owned(),
            tokenizer_dir: dir.path().join("tok").to_string_lossy().into_owned(),
            ..CheckConfig::default()
        }
    }

    #[test]
    fn test_dev_split_batches() {
        let dir = TempDir::new().unwrap();
        let report = CheckUseCase::new(config(&dir)).execute().unwrap();

        assert_eq!(report.statements, 4);
        assert_eq!(report.batches, 2);
        assert_eq!(report.first_batch_shape, (2, 32));
        assert!(report.labelled);
        assert!(report.real_tokens > 4 && report.real_tokens < 64);
    }

    #[test]
    fn test_test_split_batches_are_unlabelled() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("test.json"),
            r#"[{"sent_1": "a b", "sent_2": "c d", "domain": "social", "scenario": "causal"}]"#,
        )
        .unwrap();
        let cfg = CheckConfig { split: Split::Test, ..config(&dir) };
        let report = CheckUseCase::new(cfg).execute().unwrap();
        assert!(!report.labelled);
        assert_eq!(report.real_tokens, 8);
    }

    #[test]
    fn test_missing_split_fails() {
        let dir = TempDir::new().unwrap();
        let cfg = CheckConfig { split: Split::Train, ..config(&dir) };
        assert!(CheckUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_zero_batch_size_fails() {
        let dir = TempDir::new().unwrap();
        let cfg = CheckConfig { batch_size: 0, ..config(&dir) };
        assert!(CheckUseCase::new(cfg).execute().is_err());
    }
}
