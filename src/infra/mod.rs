// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Concerns shared by the use cases that don't belong to any
// one of them:
//
//   tokenizer_store.rs — Loads a HuggingFace tokenizer.json, or
//                        builds a word-level one from the corpus,
//                        and adapts it to TokenizerAdapter
//
//   metrics.rs         — Appends evaluation scores to a CSV file
//                        for later comparison across runs
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Tokenizer loading / building and the TokenizerAdapter impl
pub mod tokenizer_store;

/// Evaluation metrics CSV logger
pub mod metrics;
