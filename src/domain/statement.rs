// ============================================================
// Layer 3 — Statement Domain Types
// ============================================================
// A Com2Sense record holds two complementary statements about
// the same scenario, e.g.
//
//   sent_1: "Kate was able to lift the sofa by herself."  True
//   sent_2: "Kate was unable to lift the sofa by herself." False
//
// Every record is expanded into two Statements which share the
// record's index as their group id (guid). The first statement
// always precedes the second one.
//
// Reference: Singh et al. (2021) Com2Sense benchmark
//            Rust Book §5 (Structs), §6 (Enums)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A boolean field that the dataset stores either as a JSON
/// boolean or as the strings "True" / "False".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(TextFlag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextFlag {
    #[serde(rename = "True", alias = "true")]
    True,
    #[serde(rename = "False", alias = "false")]
    False,
}

impl FlagValue {
    pub fn as_bool(self) -> bool {
        match self {
            FlagValue::Bool(b) => b,
            FlagValue::Text(TextFlag::True) => true,
            FlagValue::Text(TextFlag::False) => false,
        }
    }
}

/// One raw record of a Com2Sense `<split>.json` file.
///
/// Labels are kept as raw strings here; the loader decides how
/// to interpret them for the split being read. Fields this crate
/// does not use (e.g. `id`) are kept in `extra` so a record is
/// written back exactly as it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Com2SenseRecord {
    pub sent_1: String,
    pub sent_2: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_1: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_2: Option<String>,

    pub domain: String,
    pub scenario: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeracy: Option<FlagValue>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One statement ready for tokenisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Index of the source record; both statements of a
    /// complementary pair carry the same guid
    pub guid: usize,

    /// The natural language statement
    pub text: String,

    /// 1 = plausible, 0 = implausible, None for the test split
    pub label: Option<i64>,

    /// Knowledge domain, e.g. "physical", "social", "temporal"
    pub domain: String,

    /// Reasoning scenario, e.g. "causal", "comparison"
    pub scenario: String,

    /// Whether the statement requires numerical reasoning
    pub numeracy: bool,
}

/// Which file of the dataset directory to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Dev,
    Test,
}

impl Split {
    /// File stem used on disk: `train`, `dev` or `test`
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Dev => "dev",
            Split::Test => "test",
        }
    }

    /// The test split ships without gold labels
    pub fn has_labels(self) -> bool {
        !matches!(self, Split::Test)
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "dev" => Ok(Split::Dev),
            "test" => Ok(Split::Test),
            other => Err(format!("unknown split '{other}' (expected train, dev or test)")),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accepts_string_and_bool_numeracy() {
        let with_text: Com2SenseRecord = serde_json::from_str(
            r#"{"sent_1":"a","sent_2":"b","domain":"physical","scenario":"causal","numeracy":"True"}"#,
        )
        .unwrap();
        assert_eq!(with_text.numeracy.map(FlagValue::as_bool), Some(true));

        let with_bool: Com2SenseRecord = serde_json::from_str(
            r#"{"sent_1":"a","sent_2":"b","domain":"physical","scenario":"causal","numeracy":false}"#,
        )
        .unwrap();
        assert_eq!(with_bool.numeracy.map(FlagValue::as_bool), Some(false));
    }

    #[test]
    fn test_record_labels_are_optional() {
        let rec: Com2SenseRecord = serde_json::from_str(
            r#"{"sent_1":"a","sent_2":"b","domain":"social","scenario":"comparison","numeracy":"False"}"#,
        )
        .unwrap();
        assert!(rec.label_1.is_none());
        assert!(rec.label_2.is_none());
    }

    #[test]
    fn test_unused_fields_survive_a_round_trip() {
        let raw = r#"{"id":"abc-1","sent_1":"a","sent_2":"b","domain":"social","scenario":"causal"}"#;
        let rec: Com2SenseRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.extra["id"], "abc-1");
        assert!(rec.numeracy.is_none());

        let back: Value = serde_json::to_value(&rec).unwrap();
        let expected: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(back, expected);
    }

    #[test]
    fn test_split_parsing() {
        assert_eq!("dev".parse::<Split>().unwrap(), Split::Dev);
        assert_eq!("TRAIN".parse::<Split>().unwrap(), Split::Train);
        assert!("validation".parse::<Split>().is_err());
        assert!(!Split::Test.has_labels());
        assert_eq!(Split::Dev.to_string(), "dev");
    }
}
