// ============================================================
// Layer 5 — Pairwise Accuracy
// ============================================================
// Com2Sense scores a model on complementary pairs: a pair only
// counts when BOTH of its statements are classified correctly.
//
// Pairing is positional. Entries 2g and 2g+1 form pair g:
//
//   guids: 0 0 | 1 1 | 2 2 | 3 3
//   preds: 0 0 | 1 0 | 0 1 | 1 1
//   gold:  1 0 | 1 1 | 0 1 | 1 1
//          ✗     ✗     ✓     ✓     → 2 / 4 = 0.5
//
// Callers must pass entries grouped in consecutive pairs in
// document order (the order the dataset loader produces). The
// guid values are not used to find partners; a pair whose two
// guids differ is only reported in the log.

use crate::domain::error::{Com2SenseError, Result};

/// Fraction of consecutive (first, second) pairs where both
/// predictions equal their gold labels.
pub fn pairwise_accuracy(guids: &[i64], predictions: &[i64], gold: &[i64]) -> Result<f64> {
    let len = guids.len();
    if len == 0 || predictions.len() != len || gold.len() != len {
        return Err(Com2SenseError::EmptyInput {
            predictions: predictions.len(),
            labels: gold.len(),
        });
    }
    if len % 2 != 0 {
        return Err(Com2SenseError::OddLengthInput { len });
    }

    let pairs = len / 2;
    let mut correct = 0usize;
    let mut split_groups = 0usize;

    for g in 0..pairs {
        let (first, second) = (2 * g, 2 * g + 1);
        if guids[first] != guids[second] {
            split_groups += 1;
        }
        if predictions[first] == gold[first] && predictions[second] == gold[second] {
            correct += 1;
        }
    }

    if split_groups > 0 {
        tracing::warn!(
            "{} of {} pairs have differing guids; entries may not be grouped in pairs",
            split_groups,
            pairs
        );
    }

    Ok(correct as f64 / pairs as f64)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const GUIDS: [i64; 8] = [0, 0, 1, 1, 2, 2, 3, 3];
    const PREDS: [i64; 8] = [0, 0, 1, 0, 0, 1, 1, 1];
    const GOLD: [i64; 8] = [1, 0, 1, 1, 0, 1, 1, 1];

    #[test]
    fn test_reference_value() {
        assert_eq!(pairwise_accuracy(&GUIDS, &PREDS, &GOLD).unwrap(), 0.5);
    }

    #[test]
    fn test_perfect_and_zero() {
        assert_eq!(pairwise_accuracy(&GUIDS, &GOLD, &GOLD).unwrap(), 1.0);

        let flipped: Vec<i64> = GOLD.iter().map(|g| 1 - g).collect();
        assert_eq!(pairwise_accuracy(&GUIDS, &flipped, &GOLD).unwrap(), 0.0);
    }

    #[test]
    fn test_pairing_ignores_guid_values() {
        // Same layout with arbitrary guids gives the same score
        let guids = [9, 9, 4, 4, 7, 7, 1, 1];
        assert_eq!(pairwise_accuracy(&guids, &PREDS, &GOLD).unwrap(), 0.5);

        // Misgrouped guids are still paired by position
        let shuffled = [0, 1, 0, 1, 2, 3, 2, 3];
        assert_eq!(pairwise_accuracy(&shuffled, &PREDS, &GOLD).unwrap(), 0.5);
    }

    #[test]
    fn test_odd_length_is_rejected() {
        let err = pairwise_accuracy(&[0, 0, 1], &[1, 1, 1], &[1, 1, 1]).unwrap_err();
        assert!(matches!(err, Com2SenseError::OddLengthInput { len: 3 }));
    }

    #[test]
    fn test_empty_and_mismatched_are_rejected() {
        assert!(matches!(
            pairwise_accuracy(&[], &[], &[]),
            Err(Com2SenseError::EmptyInput { .. })
        ));
        assert!(matches!(
            pairwise_accuracy(&[0, 0], &[1], &[1, 1]),
            Err(Com2SenseError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let a = pairwise_accuracy(&GUIDS, &PREDS, &GOLD).unwrap();
        let b = pairwise_accuracy(&GUIDS, &PREDS, &GOLD).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
