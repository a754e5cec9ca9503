// ============================================================
// Layer 2 — PartitionUseCase
// ============================================================
// Writes the per-domain and per-scenario slices of one split
// so that each slice can be evaluated on its own.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    loader::Com2SenseLoader,
    partition::{write_partitions, PartitionSummary},
};
use crate::domain::statement::Split;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub data_dir: String,
    pub split: Split,
    pub out_dir: String,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            data_dir: "datasets/com2sense".to_string(),
            split: Split::Dev,
            out_dir: "datasets/com2sense".to_string(),
        }
    }
}

pub struct PartitionUseCase {
    config: PartitionConfig,
}

impl PartitionUseCase {
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<PartitionSummary> {
        let cfg = &self.config;
        let records = Com2SenseLoader::new(&cfg.data_dir, cfg.split)
            .load_records()
            .with_context(|| format!("Cannot read the {} split from '{}'", cfg.split, cfg.data_dir))?;

        tracing::info!("Partitioning {} records of the {} split", records.len(), cfg.split);

        let summary = write_partitions(&records, cfg.split, Path::new(&cfg.out_dir))?;
        Ok(summary)
    }
}
