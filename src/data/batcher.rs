// ============================================================
// Layer 4 — Statement Batcher
// ============================================================
// Stacks a list of EncodedStatements into one rectangular batch.
//
// How batching works here:
//   Input:  N EncodedStatements, each with rows of length S
//   Output: StatementBatch with matrices of shape [N, S]
//
// The rows are already padded by the encoder, so a row of a
// different length means the items came from two encoders with
// different max_seq_length. That is reported as InvalidShape.
//
// The input_ids matrix is what the MLM masking engine consumes.
//
// Reference: Rust Book §8 (Vectors)

use crate::domain::error::{Com2SenseError, Result};
use crate::domain::traits::TokenId;
use crate::data::dataset::EncodedStatement;

/// A batch of statements ready for a model forward pass.
/// All matrices have batch_size rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementBatch {
    /// Token id sequences, shape [batch_size, seq_len]
    pub input_ids: Vec<Vec<TokenId>>,

    /// 1 = real token, 0 = padding, shape [batch_size, seq_len]
    pub attention_mask: Vec<Vec<TokenId>>,

    /// Segment ids, shape [batch_size, seq_len]
    pub token_type_ids: Vec<Vec<TokenId>>,

    /// Gold labels, shape [batch_size]; None for the test split
    pub labels: Option<Vec<i64>>,

    /// Group ids, shape [batch_size]
    pub guids: Vec<usize>,
}

impl StatementBatch {
    /// (batch_size, seq_len)
    pub fn shape(&self) -> (usize, usize) {
        let seq_len = self.input_ids.first().map_or(0, Vec::len);
        (self.input_ids.len(), seq_len)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatementBatcher;

impl StatementBatcher {
    pub fn new() -> Self {
        Self
    }

    /// Stack `items` row by row.
    ///
    /// Labels are only kept when every item has one; a batch
    /// mixing labelled and unlabelled items gets `labels: None`.
    pub fn batch(&self, items: &[EncodedStatement]) -> Result<StatementBatch> {
        let seq_len = items.first().map_or(0, |s| s.input_ids.len());

        for item in items {
            let lens = [
                item.input_ids.len(),
                item.attention_mask.len(),
                item.token_type_ids.len(),
            ];
            if lens.iter().any(|&l| l != seq_len) {
                return Err(Com2SenseError::InvalidShape {
                    expected: vec![seq_len; 3],
                    actual: lens.to_vec(),
                });
            }
        }

        let labels: Option<Vec<i64>> = items.iter().map(|s| s.label).collect();

        Ok(StatementBatch {
            input_ids: items.iter().map(|s| s.input_ids.clone()).collect(),
            attention_mask: items.iter().map(|s| s.attention_mask.clone()).collect(),
            token_type_ids: items.iter().map(|s| s.token_type_ids.clone()).collect(),
            labels,
            guids: items.iter().map(|s| s.guid).collect(),
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn item(ids: Vec<TokenId>, label: Option<i64>, guid: usize) -> EncodedStatement {
        let n = ids.len();
        EncodedStatement {
            input_ids: ids,
            attention_mask: vec![1; n],
            token_type_ids: vec![0; n],
            label,
            guid,
        }
    }

    #[test]
    fn test_stacks_rows_in_order() {
        let items = vec![item(vec![101, 5, 102], Some(1), 0), item(vec![101, 6, 102], Some(0), 0)];
        let batch = StatementBatcher::new().batch(&items).unwrap();

        assert_eq!(batch.shape(), (2, 3));
        assert_eq!(batch.input_ids[1], vec![101, 6, 102]);
        assert_eq!(batch.labels, Some(vec![1, 0]));
        assert_eq!(batch.guids, vec![0, 0]);
    }

    #[test]
    fn test_unlabelled_items_give_no_labels() {
        let items = vec![item(vec![1, 2], None, 4), item(vec![3, 4], None, 4)];
        let batch = StatementBatcher::new().batch(&items).unwrap();
        assert!(batch.labels.is_none());
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let items = vec![item(vec![1, 2, 3], Some(1), 0), item(vec![1, 2], Some(1), 0)];
        let err = StatementBatcher::new().batch(&items).unwrap_err();
        assert!(matches!(err, Com2SenseError::InvalidShape { .. }));
    }

    #[test]
    fn test_empty_batch() {
        let batch = StatementBatcher::new().batch(&[]).unwrap();
        assert_eq!(batch.shape(), (0, 0));
    }
}
