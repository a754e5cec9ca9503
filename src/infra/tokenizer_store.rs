// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the pretrained tokenizer used to encode statements and
// adapts it to the TokenizerAdapter trait of Layer 3.
//
// Two ways to get a tokenizer:
//   1. `<dir>/tokenizer.json` exists (e.g. bert-base-cased
//      exported from HuggingFace) → load it
//   2. otherwise build a word-level tokenizer from the corpus
//      text and save it there
//
// The built tokenizer uses the BERT id layout:
//   [PAD]=0  [unused1..99]=1..99  [UNK]=100
//   [CLS]=101  [SEP]=102  [MASK]=103  words from 104 upwards
//
// Special tokens are looked up by their string form, so any
// tokenizer with [CLS]/[SEP]/[PAD]/[MASK] entries works.
//
// Reference: HuggingFace tokenizers crate documentation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, collections::HashSet, path::PathBuf};
use tokenizers::Tokenizer;

use crate::domain::error::{Com2SenseError, Result as CoreResult};
use crate::domain::traits::{RawEncoding, TokenId, TokenizerAdapter};

/// Number of words reserved for special and unused tokens
const RESERVED_IDS: usize = 104;

// ─── SpecialTokens ────────────────────────────────────────────────────────────
/// String forms of the structural tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    pub cls: String,
    pub sep: String,
    pub pad: String,
    pub mask: String,
    /// Unknown token, counted as special when present
    pub unk: String,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self {
            cls: "[CLS]".to_string(),
            sep: "[SEP]".to_string(),
            pad: "[PAD]".to_string(),
            mask: "[MASK]".to_string(),
            unk: "[UNK]".to_string(),
        }
    }
}

// ─── HfTokenizerAdapter ───────────────────────────────────────────────────────
/// A HuggingFace tokenizer with its special ids resolved.
pub struct HfTokenizerAdapter {
    inner: Tokenizer,
    cls_id: TokenId,
    sep_id: TokenId,
    pad_id: TokenId,
    mask_id: TokenId,
    special_ids: HashSet<TokenId>,
}

impl HfTokenizerAdapter {
    /// Resolve the special ids of `tokenizer`.
    /// Fails if [CLS], [SEP], [PAD] or [MASK] has no id.
    pub fn new(tokenizer: Tokenizer, specials: &SpecialTokens) -> CoreResult<Self> {
        let lookup = |token: &str| -> CoreResult<TokenId> {
            tokenizer
                .token_to_id(token)
                .map(TokenId::from)
                .ok_or_else(|| Com2SenseError::MissingSpecialToken { token: token.to_string() })
        };

        let cls_id = lookup(&specials.cls)?;
        let sep_id = lookup(&specials.sep)?;
        let pad_id = lookup(&specials.pad)?;
        let mask_id = lookup(&specials.mask)?;

        let mut special_ids: HashSet<TokenId> = [cls_id, sep_id, pad_id, mask_id].into_iter().collect();
        if let Some(unk) = tokenizer.token_to_id(&specials.unk) {
            special_ids.insert(TokenId::from(unk));
        }

        Ok(Self {
            inner: tokenizer,
            cls_id,
            sep_id,
            pad_id,
            mask_id,
            special_ids,
        })
    }
}

impl TokenizerAdapter for HfTokenizerAdapter {
    fn encode(&self, text: &str) -> CoreResult<RawEncoding> {
        let enc = self
            .inner
            .encode(text, false)
            .map_err(|e| Com2SenseError::Tokenizer { message: e.to_string() })?;

        Ok(RawEncoding {
            ids: enc.get_ids().iter().map(|&id| TokenId::from(id)).collect(),
            type_ids: Some(enc.get_type_ids().iter().map(|&t| TokenId::from(t)).collect()),
        })
    }

    fn special_tokens_mask(&self, ids: &[TokenId]) -> Vec<bool> {
        ids.iter().map(|id| self.special_ids.contains(id)).collect()
    }

    fn mask_token_id(&self) -> TokenId {
        self.mask_id
    }

    fn pad_token_id(&self) -> TokenId {
        self.pad_id
    }

    fn cls_token_id(&self) -> TokenId {
        self.cls_id
    }

    fn sep_token_id(&self) -> TokenId {
        self.sep_id
    }

    fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

// ─── TokenizerStore ───────────────────────────────────────────────────────────
pub struct TokenizerStore {
    dir: PathBuf,
    specials: SpecialTokens,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            specials: SpecialTokens::default(),
        }
    }

    fn tokenizer_path(&self) -> PathBuf {
        self.dir.join("tokenizer.json")
    }

    /// Load an existing tokenizer or build a new one from texts
    pub fn load_or_build(&self, texts: &[String], vocab_size: usize) -> Result<HfTokenizerAdapter> {
        if self.tokenizer_path().exists() {
            tracing::info!("Loading existing tokenizer from '{}'", self.dir.display());
            self.load()
        } else {
            tracing::info!("Building new tokenizer (vocab_size={})", vocab_size);
            self.build_and_save(texts, vocab_size)
        }
    }

    /// Load a previously saved tokenizer from JSON file
    pub fn load(&self) -> Result<HfTokenizerAdapter> {
        let path = self.tokenizer_path();
        let tokenizer = Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))?;
        HfTokenizerAdapter::new(tokenizer, &self.specials)
            .with_context(|| format!("Tokenizer '{}' lacks a special token", path.display()))
    }

    /// Build a word-level vocabulary from the texts and write a
    /// HuggingFace tokenizer JSON for it.
    fn build_and_save(&self, texts: &[String], vocab_size: usize) -> Result<HfTokenizerAdapter> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        // ── Step 1: Word frequencies ──────────────────────────────────────────
        let mut freq: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for word in text.split_whitespace() {
                let w = word.to_lowercase();
                let w = w.trim_matches(|c: char| !c.is_alphanumeric());
                if !w.is_empty() {
                    *freq.entry(w.to_string()).or_insert(0) += 1;
                }
            }
        }

        // Most frequent first, ties broken alphabetically so the
        // ids do not depend on HashMap iteration order
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(vocab_size.saturating_sub(RESERVED_IDS));

        // ── Step 2: Vocab with the BERT special id layout ─────────────────────
        let sp = &self.specials;
        let mut vocab = serde_json::Map::new();
        vocab.insert(sp.pad.clone(), 0.into());
        for i in 1..100 {
            vocab.insert(format!("[unused{i}]"), i.into());
        }
        vocab.insert(sp.unk.clone(), 100.into());
        vocab.insert(sp.cls.clone(), 101.into());
        vocab.insert(sp.sep.clone(), 102.into());
        vocab.insert(sp.mask.clone(), 103.into());

        let mut next_id = RESERVED_IDS;
        for (word, _) in &words {
            if !vocab.contains_key(word) {
                vocab.insert(word.clone(), next_id.into());
                next_id += 1;
            }
        }

        // ── Step 3: Tokenizer JSON in HuggingFace format ──────────────────────
        let added = |id: usize, content: &str| {
            serde_json::json!({
                "id": id, "content": content, "single_word": false, "lstrip": false,
                "rstrip": false, "normalized": false, "special": true
            })
        };
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                added(0, &sp.pad),
                added(100, &sp.unk),
                added(101, &sp.cls),
                added(102, &sp.sep),
                added(103, &sp.mask),
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": sp.unk
            }
        });

        let tok_path = self.tokenizer_path();
        std::fs::write(&tok_path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer JSON to '{}'", tok_path.display()))?;

        tracing::info!(
            "Tokenizer built with {} entries, saved to '{}'",
            next_id,
            tok_path.display()
        );

        self.load()
    }
}
