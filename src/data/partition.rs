// ============================================================
// Layer 4 — Domain / Scenario Partitioner
// ============================================================
// Splits one Com2Sense split file into per-domain and
// per-scenario subsets so a model can be scored on each slice.
//
// Output layout for `dev`:
//   <out>/domain/physical/dev.json
//   <out>/domain/social/dev.json
//   <out>/scenario/causal/dev.json
//   <out>/scenario/comparison/dev.json
//   ...
//
// Each file is a JSON array of the raw records of that slice,
// in their original order, so the loader reads it like any
// other split file. Fields the loader does not use are written
// back unchanged.
//
// Slice names become directory names, so a name must be one
// plain path component: not empty, no '/' or '\', not "." or "..".

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::data::loader::split_path;
use crate::domain::error::{Com2SenseError, Result};
use crate::domain::statement::{Com2SenseRecord, Split};

/// Files written by one partition run, keyed by slice name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartitionSummary {
    pub domains: BTreeMap<String, usize>,
    pub scenarios: BTreeMap<String, usize>,
}

/// Group `records` by the key returned from `key`, preserving order.
pub fn group_by<'a, F>(records: &'a [Com2SenseRecord], key: F) -> BTreeMap<String, Vec<&'a Com2SenseRecord>>
where
    F: Fn(&Com2SenseRecord) -> &str,
{
    let mut groups: BTreeMap<String, Vec<&Com2SenseRecord>> = BTreeMap::new();
    for rec in records {
        groups.entry(key(rec).to_string()).or_default().push(rec);
    }
    groups
}

/// Write the domain and scenario slices of `records` under `out_dir`.
///
/// Every slice name is checked before anything is written.
pub fn write_partitions(records: &[Com2SenseRecord], split: Split, out_dir: &Path) -> Result<PartitionSummary> {
    let domains = group_by(records, |r| r.domain.as_str());
    let scenarios = group_by(records, |r| r.scenario.as_str());
    for name in domains.keys() {
        check_slice_name("domain", name)?;
    }
    for name in scenarios.keys() {
        check_slice_name("scenario", name)?;
    }

    let mut summary = PartitionSummary::default();

    for (name, group) in domains {
        write_slice(&out_dir.join("domain").join(&name), split, &group)?;
        summary.domains.insert(name, group.len());
    }

    for (name, group) in scenarios {
        write_slice(&out_dir.join("scenario").join(&name), split, &group)?;
        summary.scenarios.insert(name, group.len());
    }

    tracing::info!(
        "Wrote {} domain and {} scenario slices under '{}'",
        summary.domains.len(),
        summary.scenarios.len(),
        out_dir.display()
    );
    Ok(summary)
}

fn check_slice_name(kind: &'static str, name: &str) -> Result<()> {
    let bad = name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']);
    if bad {
        return Err(Com2SenseError::InvalidSliceName { kind, value: name.to_string() });
    }
    Ok(())
}

fn write_slice(dir: &Path, split: Split, records: &[&Com2SenseRecord]) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| Com2SenseError::io(dir, e))?;
    let path = split_path(dir, split);

    let json = serde_json::to_string_pretty(records).map_err(|e| Com2SenseError::json(&path, e))?;
    fs::write(&path, json).map_err(|e| Com2SenseError::io(&path, e))?;

    tracing::debug!("Wrote {} records to '{}'", records.len(), path.display());
    Ok(path)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_records;
    use tempfile::TempDir;

    fn record(sent: &str, domain: &str, scenario: &str) -> Com2SenseRecord {
        Com2SenseRecord {
            sent_1: format!("{sent} 1"),
            sent_2: format!("{sent} 2"),
            label_1: Some("True".into()),
            label_2: Some("False".into()),
            domain: domain.into(),
            scenario: scenario.into(),
            numeracy: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_group_by_keeps_order() {
        let recs = vec![
            record("a", "physical", "causal"),
            record("b", "social", "causal"),
            record("c", "physical", "comparison"),
        ];
        let groups = group_by(&recs, |r| r.domain.as_str());
        let physical: Vec<&str> = groups["physical"].iter().map(|r| r.sent_1.as_str()).collect();
        assert_eq!(physical, vec!["a 1", "c 1"]);
        assert_eq!(groups["social"].len(), 1);
    }

    #[test]
    fn test_writes_readable_slices() {
        let out = TempDir::new().unwrap();
        let recs = vec![
            record("a", "physical", "causal"),
            record("b", "social", "causal"),
            record("c", "physical", "comparison"),
        ];

        let summary = write_partitions(&recs, Split::Dev, out.path()).unwrap();
        assert_eq!(summary.domains["physical"], 2);
        assert_eq!(summary.scenarios["causal"], 2);

        let back = read_records(&out.path().join("domain/physical/dev.json")).unwrap();
        assert_eq!(back, vec![recs[0].clone(), recs[2].clone()]);

        let back = read_records(&out.path().join("scenario/comparison/dev.json")).unwrap();
        assert_eq!(back, vec![recs[2].clone()]);
    }

    #[test]
    fn test_slices_keep_unused_fields() {
        let out = TempDir::new().unwrap();
        let recs: Vec<Com2SenseRecord> = serde_json::from_str(
            r#"[{"id":"abc-1","sent_1":"a","sent_2":"b","label_1":"True","label_2":"False",
                 "domain":"physical","scenario":"causal"}]"#,
        )
        .unwrap();

        write_partitions(&recs, Split::Dev, out.path()).unwrap();

        let text = fs::read_to_string(out.path().join("domain/physical/dev.json")).unwrap();
        let written: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(written[0]["id"], "abc-1");
        assert!(written[0].get("numeracy").is_none());
    }

    #[test]
    fn test_slice_names_must_stay_inside_out_dir() {
        let out = TempDir::new().unwrap();
        for bad in ["../escape", "a/b", "a\\b", "..", ""] {
            let recs = vec![record("a", bad, "causal")];
            let err = write_partitions(&recs, Split::Dev, out.path()).unwrap_err();
            assert!(matches!(err, Com2SenseError::InvalidSliceName { kind: "domain", .. }));
        }

        let recs = vec![record("a", "physical", "../up")];
        let err = write_partitions(&recs, Split::Dev, out.path()).unwrap_err();
        assert!(matches!(err, Com2SenseError::InvalidSliceName { kind: "scenario", .. }));
        // Nothing is written when any name is rejected
        assert!(!out.path().join("domain").exists());
    }
}
