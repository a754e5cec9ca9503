// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and all their flags:
//   mask, evaluate, check, partition
//
// Each Args struct converts into its application-layer config
// through From, so the application layer never sees clap types.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{
    check_use_case::CheckConfig, evaluate_use_case::EvalConfig, mask_use_case::MaskConfig,
    partition_use_case::PartitionConfig,
};
use crate::domain::statement::Split;
use crate::ml::masking::RandomTokenPool;
use crate::ml::scoring::Average;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mask one sentence with the 80/10/10 MLM policy and print the result
    Mask(MaskArgs),

    /// Score a predictions file (accuracy, P/R/F1, pairwise accuracy)
    Evaluate(EvaluateArgs),

    /// Load, encode, batch and mask one dataset split as a smoke check
    Check(CheckArgs),

    /// Split a dataset split into per-domain and per-scenario files
    Partition(PartitionArgs),
}

// ─── Value enums ──────────────────────────────────────────────────────────────
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SplitArg {
    Train,
    Dev,
    Test,
}

impl From<SplitArg> for Split {
    fn from(s: SplitArg) -> Self {
        match s {
            SplitArg::Train => Split::Train,
            SplitArg::Dev => Split::Dev,
            SplitArg::Test => Split::Test,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum AverageArg {
    Binary,
    Micro,
    Macro,
    Weighted,
}

impl From<AverageArg> for Average {
    fn from(a: AverageArg) -> Self {
        match a {
            AverageArg::Binary => Average::Binary,
            AverageArg::Micro => Average::Micro,
            AverageArg::Macro => Average::Macro,
            AverageArg::Weighted => Average::Weighted,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PoolArg {
    /// Random tokens come from the input batch
    Batch,
    /// Random tokens come from the whole vocabulary
    Vocabulary,
}

impl From<PoolArg> for RandomTokenPool {
    fn from(p: PoolArg) -> Self {
        match p {
            PoolArg::Batch => RandomTokenPool::Batch,
            PoolArg::Vocabulary => RandomTokenPool::Vocabulary,
        }
    }
}

// ─── mask ─────────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct MaskArgs {
    /// Sentence to mask
    #[arg(long, default_value = "I am a good student and I love NLP.")]
    pub text: String,

    /// Directory containing tokenizer.json (built from the text if missing)
    #[arg(long, default_value = "tokenizer")]
    pub tokenizer_dir: String,

    /// Probability of selecting each non-special token
    #[arg(long, default_value_t = 0.15)]
    pub probability: f64,

    /// Seed for the random generator
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Label written at positions the loss must skip
    #[arg(long, default_value_t = -100, allow_hyphen_values = true)]
    pub ignore_index: i64,

    /// Where random replacement tokens are drawn from
    #[arg(long, value_enum, default_value_t = PoolArg::Batch)]
    pub random_pool: PoolArg,

    /// Maximum tokens including [CLS] and [SEP]
    #[arg(long, default_value_t = 128)]
    pub max_seq_length: usize,

    /// Vocabulary size when a tokenizer has to be built
    #[arg(long, default_value_t = 30522)]
    pub vocab_size: usize,
}

impl From<MaskArgs> for MaskConfig {
    fn from(a: MaskArgs) -> Self {
        MaskConfig {
            tokenizer_dir:  a.tokenizer_dir,
            text:           a.text,
            probability:    a.probability,
            seed:           a.seed,
            ignore_index:   a.ignore_index,
            random_pool:    a.random_pool.into(),
            max_seq_length: a.max_seq_length,
            vocab_size:     a.vocab_size,
        }
    }
}

// ─── evaluate ─────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// JSON array of {"guid", "prediction", "label"} records in document order
    #[arg(long)]
    pub predictions: String,

    /// Averaging mode for precision, recall and F1
    #[arg(long, value_enum, default_value_t = AverageArg::Binary)]
    pub average: AverageArg,

    /// Append the scores to <metrics-dir>/metrics.csv
    #[arg(long)]
    pub metrics_dir: Option<String>,
}

impl From<EvaluateArgs> for EvalConfig {
    fn from(a: EvaluateArgs) -> Self {
        EvalConfig {
            predictions: a.predictions,
            average:     a.average.into(),
            metrics_dir: a.metrics_dir,
        }
    }
}

// ─── check ────────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory with train.json / dev.json / test.json
    #[arg(long, default_value = "datasets/com2sense")]
    pub data_dir: String,

    #[arg(long, value_enum, default_value_t = SplitArg::Dev)]
    pub split: SplitArg,

    /// Directory containing tokenizer.json (built from the split if missing)
    #[arg(long, default_value = "tokenizer")]
    pub tokenizer_dir: String,

    #[arg(long, default_value_t = 32)]
    pub max_seq_length: usize,

    #[arg(long, default_value_t = 2)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 30522)]
    pub vocab_size: usize,

    #[arg(long, default_value_t = 0.15)]
    pub mlm_probability: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl From<CheckArgs> for CheckConfig {
    fn from(a: CheckArgs) -> Self {
        CheckConfig {
            data_dir:        a.data_dir,
            split:           a.split.into(),
            tokenizer_dir:   a.tokenizer_dir,
            max_seq_length:  a.max_seq_length,
            batch_size:      a.batch_size,
            vocab_size:      a.vocab_size,
            mlm_probability: a.mlm_probability,
            seed:            a.seed,
        }
    }
}

// ─── partition ────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct PartitionArgs {
    #[arg(long, default_value = "datasets/com2sense")]
    pub data_dir: String,

    #[arg(long, value_enum, default_value_t = SplitArg::Dev)]
    pub split: SplitArg,

    /// Root of the domain/ and scenario/ output trees
    #[arg(long, default_value = "datasets/com2sense")]
    pub out_dir: String,
}

impl From<PartitionArgs> for PartitionConfig {
    fn from(a: PartitionArgs) -> Self {
        PartitionConfig {
            data_dir: a.data_dir,
            split:    a.split.into(),
            out_dir:  a.out_dir,
        }
    }
}
