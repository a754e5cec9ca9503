// ============================================================
// Layer 3 — PredictionRecord Domain Type
// ============================================================
// The output of an external classifier for one statement.
// Records of the same complementary pair share a group id and
// appear in document order (first statement, then second).
//
// A predictions file is a JSON array of these records:
//   [{"guid": 0, "prediction": 1, "label": 1},
//    {"guid": 0, "prediction": 0, "label": 0}, ...]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Group id of the complementary pair
    #[serde(alias = "group_id")]
    pub guid: i64,

    /// Class predicted by the model
    #[serde(alias = "pred")]
    pub prediction: i64,

    /// Gold class
    #[serde(alias = "gold")]
    pub label: i64,
}

/// The three parallel columns consumed by the metric engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionColumns {
    pub guids: Vec<i64>,
    pub predictions: Vec<i64>,
    pub labels: Vec<i64>,
}

impl FromIterator<PredictionRecord> for PredictionColumns {
    fn from_iter<I: IntoIterator<Item = PredictionRecord>>(iter: I) -> Self {
        let mut cols = PredictionColumns::default();
        for r in iter {
            cols.guids.push(r.guid);
            cols.predictions.push(r.prediction);
            cols.labels.push(r.label);
        }
        cols
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn record(guid: i64, prediction: i64, label: i64) -> PredictionRecord {
        PredictionRecord { guid, prediction, label }
    }

    #[test]
    fn test_columns_preserve_order() {
        let cols: PredictionColumns = vec![
            record(0, 1, 1),
            record(0, 0, 1),
            record(1, 1, 0),
        ]
        .into_iter()
        .collect();

        assert_eq!(cols.guids, vec![0, 0, 1]);
        assert_eq!(cols.predictions, vec![1, 0, 1]);
        assert_eq!(cols.labels, vec![1, 1, 0]);
    }

    #[test]
    fn test_aliases_are_accepted() {
        let r: PredictionRecord =
            serde_json::from_str(r#"{"group_id": 3, "pred": 1, "gold": 0}"#).unwrap();
        assert_eq!(r, record(3, 1, 0));
    }
}
