// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every failure of the masking engine, the metric engine and
// the dataset reader is one of these variants. They are all
// local precondition violations or I/O problems and are
// reported immediately; nothing here retries or recovers.
//
// The application and CLI layers wrap these in anyhow errors
// with extra context.
//
// Reference: Rust Book §9 (Error Handling)
//            thiserror crate documentation

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the core and data layers.
pub type Result<T> = std::result::Result<T, Com2SenseError>;

#[derive(Error, Debug)]
pub enum Com2SenseError {
    /// A matrix is ragged or does not match the batch it belongs to.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    InvalidShape { expected: Vec<usize>, actual: Vec<usize> },

    /// Masking probability outside [0, 1] (or NaN).
    #[error("Invalid masking probability {value}: must lie in [0, 1]")]
    InvalidProbability { value: f64 },

    /// Random-token replacement from the vocabulary needs a vocabulary.
    #[error("Invalid vocabulary size {size}: must be greater than zero")]
    InvalidVocabulary { size: usize },

    /// Metric inputs are empty or of different lengths.
    #[error("Empty or length-mismatched input: {predictions} predictions, {labels} labels")]
    EmptyInput { predictions: usize, labels: usize },

    /// Pairwise accuracy needs complete (first, second) statement pairs.
    #[error("Pairwise input must have an even length, got {len}")]
    OddLengthInput { len: usize },

    /// Binary averaging accepts at most two labels, one of them 1.
    #[error("Binary averaging needs at most two labels with 1 among them, found {labels:?}")]
    NonBinaryLabels { labels: Vec<i64> },

    /// A labelled split has a record without a gold label.
    #[error("Record {index} has no '{field}' field")]
    MissingLabel { index: usize, field: &'static str },

    /// A label string other than "True" / "False".
    #[error("Record {index} has an invalid label '{value}' (expected \"True\" or \"False\")")]
    InvalidLabel { index: usize, value: String },

    /// A domain or scenario value that is not a single path component.
    #[error("Invalid {kind} name '{value}': must be one non-empty path component")]
    InvalidSliceName { kind: &'static str, value: String },

    /// The tokenizer vocabulary lacks a required structural token.
    #[error("Tokenizer has no id for special token '{token}'")]
    MissingSpecialToken { token: String },

    /// Error reported by the tokenizer backend.
    #[error("Tokenizer error: {message}")]
    Tokenizer { message: String },

    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Com2SenseError {
    /// Attach a path to an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Attach a path to a JSON error.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_values() {
        let err = Com2SenseError::InvalidProbability { value: 1.5 };
        assert!(err.to_string().contains("1.5"));

        let err = Com2SenseError::OddLengthInput { len: 7 };
        assert!(err.to_string().contains('7'));

        let err = Com2SenseError::NonBinaryLabels { labels: vec![0, 1, 2] };
        assert!(err.to_string().contains("[0, 1, 2]"));
    }

    #[test]
    fn test_io_error_keeps_path_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Com2SenseError::io("dev.json", io);
        assert!(err.to_string().contains("dev.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
