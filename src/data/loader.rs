// ============================================================
// Layer 4 — Com2Sense Loader
// ============================================================
// Reads one split of the Com2Sense dataset from disk.
//
// Directory layout:
//   datasets/com2sense/
//     train.json
//     dev.json
//     test.json    ← no label_1 / label_2 fields
//
// Each file is a JSON array of records. Record i becomes TWO
// statements, both with guid = i, in this order:
//
//   record 0 → Statement { guid: 0, text: sent_1, label: label_1 }
//              Statement { guid: 0, text: sent_2, label: label_2 }
//   record 1 → Statement { guid: 1, text: sent_1, ... }
//   ...
//
// The order matters: pairwise accuracy pairs entries by
// position, so sent_1 must always directly precede sent_2.
//
// Labels: "True" → 1, "False" → 0. The test split always gets
// None, whatever the file contains.
//
// Reference: serde_json crate documentation
//            Rust Book §9 (Error Handling)

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::{Com2SenseError, Result};
use crate::domain::statement::{Com2SenseRecord, FlagValue, Split, Statement};
use crate::domain::traits::StatementSource;

/// Loads one split of a Com2Sense dataset directory.
/// Implements the StatementSource trait from Layer 3.
pub struct Com2SenseLoader {
    /// Directory holding train.json / dev.json / test.json
    dir: PathBuf,
    split: Split,
}

impl Com2SenseLoader {
    pub fn new(dir: impl Into<PathBuf>, split: Split) -> Self {
        Self { dir: dir.into(), split }
    }

    /// Full path of the JSON file for this split
    pub fn path(&self) -> PathBuf {
        split_path(&self.dir, self.split)
    }

    /// Read the raw records without expanding them.
    pub fn load_records(&self) -> Result<Vec<Com2SenseRecord>> {
        read_records(&self.path())
    }
}

impl StatementSource for Com2SenseLoader {
    fn load_statements(&self) -> Result<Vec<Statement>> {
        let records = self.load_records()?;
        let statements = expand_records(&records, self.split)?;

        tracing::info!(
            "Loaded {} records ({} statements) from '{}'",
            records.len(),
            statements.len(),
            self.path().display()
        );
        Ok(statements)
    }
}

/// `<dir>/<split>.json`
pub fn split_path(dir: &Path, split: Split) -> PathBuf {
    dir.join(format!("{}.json", split.as_str()))
}

/// Parse a JSON array of Com2Sense records.
pub fn read_records(path: &Path) -> Result<Vec<Com2SenseRecord>> {
    let text = fs::read_to_string(path).map_err(|e| Com2SenseError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| Com2SenseError::json(path, e))
}

/// Turn every record into its two statements, keeping document order.
pub fn expand_records(records: &[Com2SenseRecord], split: Split) -> Result<Vec<Statement>> {
    let mut statements = Vec::with_capacity(records.len() * 2);

    for (index, rec) in records.iter().enumerate() {
        let (label_1, label_2) = if split.has_labels() {
            (
                parse_label(index, "label_1", rec.label_1.as_deref())?,
                parse_label(index, "label_2", rec.label_2.as_deref())?,
            )
        } else {
            (None, None)
        };

        for (text, label) in [(&rec.sent_1, label_1), (&rec.sent_2, label_2)] {
            statements.push(Statement {
                guid: index,
                text: text.clone(),
                label,
                domain: rec.domain.clone(),
                scenario: rec.scenario.clone(),
                numeracy: rec.numeracy.is_some_and(FlagValue::as_bool),
            });
        }
    }

    Ok(statements)
}

fn parse_label(index: usize, field: &'static str, raw: Option<&str>) -> Result<Option<i64>> {
    match raw {
        Some("True") => Ok(Some(1)),
        Some("False") => Ok(Some(0)),
        Some(other) => Err(Com2SenseError::InvalidLabel {
            index,
            value: other.to_string(),
        }),
        None => Err(Com2SenseError::MissingLabel { index, field }),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DEV: &str = r#"[
        {"sent_1": "A feather is lighter than a brick.", "sent_2": "A feather is heavier than a brick.",
         "label_1": "True", "label_2": "False",
         "domain": "physical", "scenario": "comparison", "numeracy": "False"},
        {"sent_1": "Two apples are more than one.", "sent_2": "Two apples are fewer than one.",
         "label_1": "True", "label_2": "False",
         "domain": "physical", "scenario": "comparison", "numeracy": "True"}
    ]"#;

    const TEST: &str = r#"[
        {"sent_1": "x", "sent_2": "y", "domain": "social", "scenario": "causal", "numeracy": "False"}
    ]"#;

    fn write(dir: &TempDir, name: &str, body: &str) {
        fs::write(dir.path().join(name), body).unwrap();
    }

    #[test]
    fn test_records_expand_into_ordered_pairs() {
        let dir = TempDir::new().unwrap();
        write(&dir, "dev.json", DEV);

        let statements = Com2SenseLoader::new(dir.path(), Split::Dev).load_statements().unwrap();

        assert_eq!(statements.len(), 4);
        let guids: Vec<usize> = statements.iter().map(|s| s.guid).collect();
        assert_eq!(guids, vec![0, 0, 1, 1]);
        let labels: Vec<Option<i64>> = statements.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec![Some(1), Some(0), Some(1), Some(0)]);
        assert_eq!(statements[0].text, "A feather is lighter than a brick.");
        assert_eq!(statements[1].text, "A feather is heavier than a brick.");
        assert!(!statements[0].numeracy);
        assert!(statements[2].numeracy);
        assert_eq!(statements[3].domain, "physical");
    }

    #[test]
    fn test_test_split_has_no_labels() {
        let dir = TempDir::new().unwrap();
        write(&dir, "test.json", TEST);

        let statements = Com2SenseLoader::new(dir.path(), Split::Test).load_statements().unwrap();
        assert_eq!(statements.len(), 2);
        assert!(statements.iter().all(|s| s.label.is_none()));
    }

    #[test]
    fn test_missing_label_in_labelled_split() {
        let dir = TempDir::new().unwrap();
        write(&dir, "train.json", TEST);

        let err = Com2SenseLoader::new(dir.path(), Split::Train).load_statements().unwrap_err();
        assert!(matches!(err, Com2SenseError::MissingLabel { index: 0, field: "label_1" }));
    }

    #[test]
    fn test_invalid_label_string() {
        let rec = Com2SenseRecord {
            sent_1: "a".into(),
            sent_2: "b".into(),
            label_1: Some("True".into()),
            label_2: Some("maybe".into()),
            domain: "temporal".into(),
            scenario: "causal".into(),
            numeracy: None,
            extra: Default::default(),
        };
        let err = expand_records(&[rec], Split::Dev).unwrap_err();
        assert!(matches!(err, Com2SenseError::InvalidLabel { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Com2SenseLoader::new(dir.path(), Split::Dev).load_statements().unwrap_err();
        assert!(matches!(err, Com2SenseError::Io { .. }));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "dev.json", "{not json");
        let err = Com2SenseLoader::new(dir.path(), Split::Dev).load_records().unwrap_err();
        assert!(matches!(err, Com2SenseError::Json { .. }));
    }
}
