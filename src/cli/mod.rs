// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Four commands are supported:
//   1. `mask`      — masks one sentence with the MLM policy
//   2. `evaluate`  — scores a predictions file
//   3. `check`     — smoke-checks loading, batching and masking
//   4. `partition` — splits a split by domain and scenario
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{CheckArgs, Commands, EvaluateArgs, MaskArgs, PartitionArgs};

/// Com2Sense masked-LM preprocessing and evaluation tools.
#[derive(Parser, Debug)]
#[command(
    name = "com2sense-mlm",
    version = "0.1.0",
    about = "Mask Com2Sense statements for MLM training and score classifier predictions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route the subcommand to its use case. Nothing is computed here.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Mask(args)      => run_mask(args),
            Commands::Evaluate(args)  => run_evaluate(args),
            Commands::Check(args)     => run_check(args),
            Commands::Partition(args) => run_partition(args),
        }
    }
}

fn run_mask(args: MaskArgs) -> Result<()> {
    use crate::application::mask_use_case::MaskUseCase;

    let ignore_index = args.ignore_index;
    let outcome = MaskUseCase::new(args.into()).execute()?;

    println!("original : {:?}", outcome.original);
    println!("masked   : {:?}", outcome.input_ids);
    println!("labels   : {:?}", outcome.labels);
    println!("positions: {:?}", outcome.masked_positions(ignore_index));
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    tracing::info!("Evaluating predictions in: {}", args.predictions);
    let m = EvaluateUseCase::new(args.into()).execute()?;

    println!("\nResults for {} ({} averaging)", m.run, m.average);
    println!("  accuracy : {:.4}", m.accuracy);
    println!("  precision: {:.4}", m.precision);
    println!("  recall   : {:.4}", m.recall);
    println!("  f1       : {:.4}", m.f1);
    match m.pairwise {
        Some(p) => println!("  pairwise : {:.4}", p),
        None    => println!("  pairwise : n/a"),
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    use crate::application::check_use_case::CheckUseCase;

    let split = args.split;
    let report = CheckUseCase::new(args.into()).execute()?;

    println!(
        "{:?} split OK: {} statements, {} batches, first batch {:?} ({} real tokens, {}), {} positions masked",
        split,
        report.statements,
        report.batches,
        report.first_batch_shape,
        report.real_tokens,
        if report.labelled { "labelled" } else { "unlabelled" },
        report.masked_positions
    );
    Ok(())
}

fn run_partition(args: PartitionArgs) -> Result<()> {
    use crate::application::partition_use_case::PartitionUseCase;

    let out_dir = args.out_dir.clone();
    let summary = PartitionUseCase::new(args.into()).execute()?;

    println!("Partitions written under {}", out_dir);
    for (domain, n) in &summary.domains {
        println!("  domain/{:<12} {} records", domain, n);
    }
    for (scenario, n) in &summary.scenarios {
        println!("  scenario/{:<10} {} records", scenario, n);
    }
    Ok(())
}
