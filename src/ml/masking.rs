// ============================================================
// Layer 5 — Masked Language Model Token Masking
// ============================================================
// Turns a batch of token id sequences into the (inputs, labels)
// pair used for masked-language-model training.
//
// The 80/10/10 policy (Devlin et al. 2019):
//
//   1. Every non-special position is selected with probability p
//   2. Selected positions keep their original id as label,
//      every other position gets the ignore index
//   3. A selected position is then
//        80% → replaced by the [MASK] id
//        10% → replaced by a random token id
//        10% → left unchanged
//
// Example with p=0.4, ignore_index=-100:
//   input:   [CLS] I  am   a  good [SEP]
//   ids:      101 146 1821 170 1363 102
//   inputs:   101 146 103  170 103  102
//   labels:  -100 -100 1821 -100 1363 -100
//
// Random replacement tokens come from the batch itself by
// default: ids are sampled with replacement from the flattened
// input batch. Sampling from the whole vocabulary is available
// through RandomTokenPool::Vocabulary.
//
// Reference: Devlin et al. (2019) BERT §3.1
//            Rust Book §8 (Vectors)

use serde::{Deserialize, Serialize};

use crate::domain::error::{Com2SenseError, Result};
use crate::domain::traits::{TokenId, TokenizerAdapter};
use crate::ml::rng::MaskingRng;

/// Draws at or below this value become the mask token.
pub const MASK_REPLACE_THRESHOLD: f64 = 0.8;

/// Draws in (0.8, 0.9] become a random token; above stays unchanged.
pub const RANDOM_REPLACE_THRESHOLD: f64 = 0.9;

/// Label value skipped by the cross entropy loss.
pub const DEFAULT_IGNORE_INDEX: TokenId = -100;

// ─── Replacement policy ───────────────────────────────────────────────────────
/// What happens to one selected position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementChoice {
    MaskToken,
    RandomToken,
    Unchanged,
}

impl ReplacementChoice {
    /// Map a uniform draw in [0, 1) to its replacement category.
    pub fn from_draw(u: f64) -> Self {
        if u <= MASK_REPLACE_THRESHOLD {
            ReplacementChoice::MaskToken
        } else if u <= RANDOM_REPLACE_THRESHOLD {
            ReplacementChoice::RandomToken
        } else {
            ReplacementChoice::Unchanged
        }
    }
}

/// Where random replacement tokens are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomTokenPool {
    /// Ids present in the current input batch, sampled with replacement
    #[default]
    Batch,
    /// Any id in `0..vocab_size`
    Vocabulary,
}

// ─── Configuration ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Selection probability for each non-special position
    pub probability: f64,
    pub mask_token_id: TokenId,
    pub vocab_size: usize,
    pub ignore_index: TokenId,
    pub random_pool: RandomTokenPool,
}

impl MaskingConfig {
    /// Take the mask id and vocabulary size from a tokenizer.
    pub fn for_tokenizer<T: TokenizerAdapter + ?Sized>(tokenizer: &T, probability: f64) -> Self {
        Self {
            probability,
            mask_token_id: tokenizer.mask_token_id(),
            vocab_size: tokenizer.vocab_size(),
            ignore_index: DEFAULT_IGNORE_INDEX,
            random_pool: RandomTokenPool::Batch,
        }
    }

    pub fn with_ignore_index(mut self, ignore_index: TokenId) -> Self {
        self.ignore_index = ignore_index;
        self
    }

    pub fn with_random_pool(mut self, pool: RandomTokenPool) -> Self {
        self.random_pool = pool;
        self
    }

    /// Check the probability and, for vocabulary sampling, the vocabulary size.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(Com2SenseError::InvalidProbability { value: self.probability });
        }
        if self.random_pool == RandomTokenPool::Vocabulary && self.vocab_size == 0 {
            return Err(Com2SenseError::InvalidVocabulary { size: self.vocab_size });
        }
        Ok(())
    }
}

// ─── Output ───────────────────────────────────────────────────────────────────
/// Corrupted inputs and their MLM labels, both shaped like the input batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedBatch {
    pub input_ids: Vec<Vec<TokenId>>,
    pub labels: Vec<Vec<TokenId>>,
}

impl MaskedBatch {
    /// Number of positions selected for the MLM objective
    pub fn selected_count(&self, ignore_index: TokenId) -> usize {
        self.labels
            .iter()
            .flatten()
            .filter(|&&l| l != ignore_index)
            .count()
    }
}

// ─── Masking ──────────────────────────────────────────────────────────────────
/// Mask a batch, deriving the special-token mask from the
/// tokenizer when the caller does not supply one.
pub fn mask_tokens_with_tokenizer<T, R>(
    batch: &[Vec<TokenId>],
    special_mask: Option<&[Vec<bool>]>,
    tokenizer: &T,
    config: &MaskingConfig,
    rng: &mut R,
) -> Result<MaskedBatch>
where
    T: TokenizerAdapter + ?Sized,
    R: MaskingRng + ?Sized,
{
    match special_mask {
        Some(mask) => mask_tokens(batch, mask, config, rng),
        None => {
            let derived: Vec<Vec<bool>> = batch
                .iter()
                .map(|seq| tokenizer.special_tokens_mask(seq))
                .collect();
            mask_tokens(batch, &derived, config, rng)
        }
    }
}

/// Apply the 80/10/10 masking policy to `batch`.
///
/// `special_mask` must have the same shape as `batch`; true
/// positions are never selected. The input is not modified.
///
/// Draw order: one Bernoulli trial per position in row-major
/// order, then one uniform draw per selected position (plus one
/// index draw when it becomes a random token), also row-major.
pub fn mask_tokens<R: MaskingRng + ?Sized>(
    batch: &[Vec<TokenId>],
    special_mask: &[Vec<bool>],
    config: &MaskingConfig,
    rng: &mut R,
) -> Result<MaskedBatch> {
    config.validate()?;
    check_shape(batch, special_mask)?;

    // ── Step 1: labels start as a copy of the inputs ─────────────────────────
    let mut input_ids: Vec<Vec<TokenId>> = batch.to_vec();
    let mut labels: Vec<Vec<TokenId>> = batch.to_vec();

    // ── Step 2: Bernoulli selection, forced off at special positions ─────────
    let selected: Vec<Vec<bool>> = special_mask
        .iter()
        .map(|row| {
            row.iter()
                .map(|&special| {
                    let p = if special { 0.0 } else { config.probability };
                    rng.bernoulli(p)
                })
                .collect()
        })
        .collect();

    // ── Step 3: unselected positions are ignored by the loss ─────────────────
    for (label_row, sel_row) in labels.iter_mut().zip(&selected) {
        for (label, &sel) in label_row.iter_mut().zip(sel_row) {
            if !sel {
                *label = config.ignore_index;
            }
        }
    }

    // ── Step 4: replace the selected inputs ──────────────────────────────────
    let pool: Vec<TokenId> = batch.iter().flatten().copied().collect();

    for (input_row, sel_row) in input_ids.iter_mut().zip(&selected) {
        for (token, &sel) in input_row.iter_mut().zip(sel_row) {
            if !sel {
                continue;
            }
            match ReplacementChoice::from_draw(rng.uniform()) {
                ReplacementChoice::MaskToken => *token = config.mask_token_id,
                ReplacementChoice::RandomToken => {
                    *token = random_token(&pool, config, rng);
                }
                ReplacementChoice::Unchanged => {}
            }
        }
    }

    let masked = MaskedBatch { input_ids, labels };
    tracing::debug!(
        "Masked {} of {} positions (p={})",
        masked.selected_count(config.ignore_index),
        pool.len(),
        config.probability,
    );
    Ok(masked)
}

/// A selected position always contributes its own id to the
/// batch pool, so the pool is never empty here.
fn random_token<R: MaskingRng + ?Sized>(
    pool: &[TokenId],
    config: &MaskingConfig,
    rng: &mut R,
) -> TokenId {
    match config.random_pool {
        RandomTokenPool::Batch => pool[rng.index(pool.len())],
        RandomTokenPool::Vocabulary => rng.index(config.vocab_size) as TokenId,
    }
}

/// The batch must be rectangular and the special mask must match it.
fn check_shape(batch: &[Vec<TokenId>], special_mask: &[Vec<bool>]) -> Result<()> {
    let seq_len = batch.first().map_or(0, Vec::len);

    if let Some(row) = batch.iter().find(|row| row.len() != seq_len) {
        return Err(Com2SenseError::InvalidShape {
            expected: vec![batch.len(), seq_len],
            actual: vec![batch.len(), row.len()],
        });
    }

    let mask_cols = special_mask.first().map_or(0, Vec::len);
    let ragged = special_mask.iter().any(|row| row.len() != seq_len);
    if special_mask.len() != batch.len() || ragged {
        return Err(Com2SenseError::InvalidShape {
            expected: vec![batch.len(), seq_len],
            actual: vec![special_mask.len(), mask_cols],
        });
    }
    Ok(())
}
