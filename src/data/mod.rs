// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw Com2Sense JSON files
// to rectangular token id batches.
//
// The pipeline flows in this order:
//
//   <split>.json
//       │
//       ▼
//   Com2SenseLoader    → reads records, expands each into two statements
//       │
//       ▼
//   StatementEncoder   → [CLS] tokens [SEP] + padding, attention mask,
//       │                 token type ids
//       ▼
//   StatementDataset   → implements Burn's Dataset trait
//       │
//       ▼
//   StatementBatcher   → stacks rows into [batch, seq_len] matrices
//
// partition.rs is a side tool: it splits a split file into
// per-domain and per-scenario files.
//
// Reference: Burn Book §4 (Datasets)
//            Rust Book §13 (Iterators and Closures)

/// Reads Com2Sense split files
pub mod loader;

/// Encodes statements and implements Burn's Dataset trait
pub mod dataset;

/// Stacks encoded statements into batches
pub mod batcher;

/// Writes per-domain / per-scenario subsets of a split
pub mod partition;
