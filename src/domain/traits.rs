// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The masking engine and the dataset encoder never talk to a
// concrete tokenizer or a concrete random generator. They are
// written against these traits:
//
//   TokenizerAdapter → HfTokenizerAdapter (infra/tokenizer_store.rs)
//   StatementSource  → Com2SenseLoader    (data/loader.rs)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::error::Result;
use crate::domain::statement::Statement;

/// Token ids are signed so that label matrices can hold the
/// negative ignore sentinel next to real ids.
pub type TokenId = i64;

/// The output of encoding one piece of text, without special
/// tokens, truncation or padding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEncoding {
    pub ids: Vec<TokenId>,

    /// Segment ids, when the tokenizer model produces them.
    /// RoBERTa-style tokenizers have none.
    pub type_ids: Option<Vec<TokenId>>,
}

// ─── TokenizerAdapter ─────────────────────────────────────────────────────────
/// The pieces of a pretrained tokenizer this crate relies on.
pub trait TokenizerAdapter {
    /// Encode text to ids with no structural tokens added.
    fn encode(&self, text: &str) -> Result<RawEncoding>;

    /// One flag per position: true where the id is a structural
    /// token. The sequence is assumed to already contain them.
    fn special_tokens_mask(&self, ids: &[TokenId]) -> Vec<bool>;

    fn mask_token_id(&self) -> TokenId;
    fn pad_token_id(&self) -> TokenId;
    fn cls_token_id(&self) -> TokenId;
    fn sep_token_id(&self) -> TokenId;

    /// Number of ids in the vocabulary, added tokens included
    fn vocab_size(&self) -> usize;
}

// ─── StatementSource ──────────────────────────────────────────────────────────
/// Anything that yields statements in document order.
pub trait StatementSource {
    fn load_statements(&self) -> Result<Vec<Statement>>;
}
