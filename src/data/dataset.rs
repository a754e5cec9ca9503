// ============================================================
// Layer 4 — Encoded Statement Dataset
// ============================================================
// Tokenises statements into fixed-length feature rows and
// exposes them through Burn's Dataset trait.
//
// Sequence format (max_seq_length = 8):
//   [CLS] the sofa is heavy [SEP] [PAD] [PAD]
//    101   ...              102    0     0
//   attention_mask: 1 1 1 1 1 1 0 0
//   token_type_ids: 0 0 0 0 0 0 0 0
//
// Long statements are truncated so [CLS] and [SEP] always fit.
// Tokenizers without segment ids (e.g. RoBERTa) get an all-zero
// token_type_ids row.
//
// Reference: Burn Book §4 (Datasets)
//            Devlin et al. (2019) BERT input representation

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::error::{Com2SenseError, Result};
use crate::domain::statement::Statement;
use crate::domain::traits::{TokenId, TokenizerAdapter};

/// One fully tokenised and padded statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedStatement {
    pub input_ids: Vec<TokenId>,
    pub attention_mask: Vec<TokenId>,
    pub token_type_ids: Vec<TokenId>,
    pub label: Option<i64>,
    pub guid: usize,
}

impl EncodedStatement {
    /// Number of non-padding positions
    pub fn real_length(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }
}

/// Turns statements into EncodedStatements with one tokenizer.
pub struct StatementEncoder<'a, T: TokenizerAdapter + ?Sized> {
    tokenizer: &'a T,
    max_seq_length: usize,
}

impl<'a, T: TokenizerAdapter + ?Sized> StatementEncoder<'a, T> {
    /// `max_seq_length` must leave room for [CLS] and [SEP].
    pub fn new(tokenizer: &'a T, max_seq_length: usize) -> Result<Self> {
        if max_seq_length < 2 {
            return Err(Com2SenseError::InvalidShape {
                expected: vec![2],
                actual: vec![max_seq_length],
            });
        }
        Ok(Self { tokenizer, max_seq_length })
    }

    pub fn encode(&self, statement: &Statement) -> Result<EncodedStatement> {
        let raw = self.tokenizer.encode(&statement.text)?;
        let budget = self.max_seq_length - 2;

        // ── [CLS] tokens [SEP] ────────────────────────────────────────────────
        let content = &raw.ids[..raw.ids.len().min(budget)];
        let mut input_ids = Vec::with_capacity(self.max_seq_length);
        input_ids.push(self.tokenizer.cls_token_id());
        input_ids.extend_from_slice(content);
        input_ids.push(self.tokenizer.sep_token_id());

        // ── Segment ids, zero-filled when the tokenizer has none ──────────────
        let mut token_type_ids = vec![0; input_ids.len()];
        if let Some(types) = &raw.type_ids {
            for (slot, &t) in token_type_ids[1..].iter_mut().zip(types.iter().take(content.len())) {
                *slot = t;
            }
        }

        // ── Pad to max_seq_length ─────────────────────────────────────────────
        let real = input_ids.len();
        let mut attention_mask = vec![1; real];
        input_ids.resize(self.max_seq_length, self.tokenizer.pad_token_id());
        attention_mask.resize(self.max_seq_length, 0);
        token_type_ids.resize(self.max_seq_length, 0);

        Ok(EncodedStatement {
            input_ids,
            attention_mask,
            token_type_ids,
            label: statement.label,
            guid: statement.guid,
        })
    }

    pub fn encode_all(&self, statements: &[Statement]) -> Result<Vec<EncodedStatement>> {
        statements.iter().map(|s| self.encode(s)).collect()
    }
}

/// In-memory dataset of encoded statements, in document order.
pub struct StatementDataset {
    items: Vec<EncodedStatement>,
}

impl StatementDataset {
    pub fn new(items: Vec<EncodedStatement>) -> Self {
        Self { items }
    }

    /// Consecutive chunks of `batch_size` items, like a sequential sampler.
    pub fn chunks(&self, batch_size: usize) -> impl Iterator<Item = &[EncodedStatement]> {
        self.items.chunks(batch_size.max(1))
    }
}

impl Dataset<EncodedStatement> for StatementDataset {
    fn get(&self, index: usize) -> Option<EncodedStatement> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::RawEncoding;

    /// Maps every word to its length + 1000; optional segment ids.
    struct WordLengths {
        with_types: bool,
    }

    impl TokenizerAdapter for WordLengths {
        fn encode(&self, text: &str) -> Result<RawEncoding> {
            let ids: Vec<TokenId> = text.split_whitespace().map(|w| 1000 + w.len() as TokenId).collect();
            let type_ids = self.with_types.then(|| vec![0; ids.len()]);
            Ok(RawEncoding { ids, type_ids })
        }
        fn special_tokens_mask(&self, ids: &[TokenId]) -> Vec<bool> {
            ids.iter().map(|&id| id < 1000).collect()
        }
        fn mask_token_id(&self) -> TokenId { 103 }
        fn pad_token_id(&self) -> TokenId { 0 }
        fn cls_token_id(&self) -> TokenId { 101 }
        fn sep_token_id(&self) -> TokenId { 102 }
        fn vocab_size(&self) -> usize { 2000 }
    }

    fn statement(text: &str) -> Statement {
        Statement {
            guid: 3,
            text: text.to_string(),
            label: Some(1),
            domain: "physical".into(),
            scenario: "causal".into(),
            numeracy: false,
        }
    }

    #[test]
    fn test_padding_layout() {
        let tok = WordLengths { with_types: true };
        let enc = StatementEncoder::new(&tok, 8).unwrap();
        let row = enc.encode(&statement("a bb ccc")).unwrap();

        assert_eq!(row.input_ids, vec![101, 1001, 1002, 1003, 102, 0, 0, 0]);
        assert_eq!(row.attention_mask, vec![1, 1, 1, 1, 1, 0, 0, 0]);
        assert_eq!(row.token_type_ids, vec![0; 8]);
        assert_eq!(row.label, Some(1));
        assert_eq!(row.guid, 3);
        assert_eq!(row.real_length(), 5);
    }

    #[test]
    fn test_truncation_keeps_structural_tokens() {
        let tok = WordLengths { with_types: false };
        let enc = StatementEncoder::new(&tok, 4).unwrap();
        let row = enc.encode(&statement("a bb ccc dddd")).unwrap();

        assert_eq!(row.input_ids, vec![101, 1001, 1002, 102]);
        assert_eq!(row.attention_mask, vec![1; 4]);
    }

    #[test]
    fn test_missing_type_ids_are_zero_filled() {
        let tok = WordLengths { with_types: false };
        let enc = StatementEncoder::new(&tok, 6).unwrap();
        let row = enc.encode(&statement("a")).unwrap();
        assert_eq!(row.token_type_ids, vec![0; 6]);
    }

    #[test]
    fn test_too_short_max_length() {
        let tok = WordLengths { with_types: false };
        assert!(StatementEncoder::new(&tok, 1).is_err());
    }

    #[test]
    fn test_dataset_access() {
        let tok = WordLengths { with_types: false };
        let enc = StatementEncoder::new(&tok, 6).unwrap();
        let items = enc.encode_all(&[statement("a"), statement("b c"), statement("d")]).unwrap();
        let ds = StatementDataset::new(items);

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.get(1).unwrap().real_length(), 4);
        assert!(ds.get(3).is_none());

        let sizes: Vec<usize> = ds.chunks(2).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![2, 1]);
    }
}
