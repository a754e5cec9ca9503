// ============================================================
// Layer 2 — MaskUseCase
// ============================================================
// Masks one sentence the way a training batch would be masked,
// so the MLM policy can be inspected by eye:
//
//   Step 1: Seed the random generator     (Layer 5 - ml)
//   Step 2: Load / build the tokenizer    (Layer 6 - infra)
//   Step 3: Encode [CLS] sentence [SEP]   (Layer 4 - data)
//   Step 4: Apply the 80/10/10 masking    (Layer 5 - ml)
//
// Reference: Devlin et al. (2019) BERT §3.1

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::dataset::StatementEncoder;
use crate::domain::statement::Statement;
use crate::domain::traits::TokenId;
use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::masking::{mask_tokens_with_tokenizer, MaskingConfig, RandomTokenPool, DEFAULT_IGNORE_INDEX};
use crate::ml::rng::seeded_rng;

// ─── Mask Configuration ──────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskConfig {
    pub tokenizer_dir: String,
    pub text: String,
    pub probability: f64,
    pub seed: u64,
    pub ignore_index: TokenId,
    pub random_pool: RandomTokenPool,
    pub max_seq_length: usize,
    pub vocab_size: usize,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            tokenizer_dir: "tokenizer".to_string(),
            text: "I am a good student and I love NLP.".to_string(),
            probability: 0.15,
            seed: 42,
            ignore_index: DEFAULT_IGNORE_INDEX,
            random_pool: RandomTokenPool::Batch,
            max_seq_length: 128,
            vocab_size: 30522,
        }
    }
}

/// The sentence before and after masking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskOutcome {
    pub original: Vec<TokenId>,
    pub input_ids: Vec<TokenId>,
    pub labels: Vec<TokenId>,
}

impl MaskOutcome {
    pub fn masked_positions(&self, ignore_index: TokenId) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l != ignore_index)
            .map(|(i, _)| i)
            .collect()
    }
}

// ─── MaskUseCase ──────────────────────────────────────────────────────────────
pub struct MaskUseCase {
    config: MaskConfig,
}

impl MaskUseCase {
    pub fn new(config: MaskConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<MaskOutcome> {
        let cfg = &self.config;

        // ── Step 1: One generator for the whole run ───────────────────────────
        let mut rng = seeded_rng(cfg.seed);

        // ── Step 2: Tokenizer ─────────────────────────────────────────────────
        let tokenizer = TokenizerStore::new(&cfg.tokenizer_dir)
            .load_or_build(std::slice::from_ref(&cfg.text), cfg.vocab_size)?;

        // ── Step 3: [CLS] sentence [SEP], padding dropped ─────────────────────
        let statement = Statement {
            guid: 0,
            text: cfg.text.clone(),
            label: None,
            domain: String::new(),
            scenario: String::new(),
            numeracy: false,
        };
        let encoded = StatementEncoder::new(&tokenizer, cfg.max_seq_length)?.encode(&statement)?;
        let original: Vec<TokenId> = encoded.input_ids[..encoded.real_length()].to_vec();
        tracing::info!("Encoded {} tokens: {:?}", original.len(), original);

        // ── Step 4: Mask ──────────────────────────────────────────────────────
        let masking = MaskingConfig::for_tokenizer(&tokenizer, cfg.probability)
            .with_ignore_index(cfg.ignore_index)
            .with_random_pool(cfg.random_pool);

        let batch = vec![original.clone()];
        let mut masked = mask_tokens_with_tokenizer(&batch, None, &tokenizer, &masking, &mut rng)
            .context("Masking failed")?;

        Ok(MaskOutcome {
            original,
            input_ids: masked.input_ids.swap_remove(0),
            labels: masked.labels.swap_remove(0),
        })
    }
}
