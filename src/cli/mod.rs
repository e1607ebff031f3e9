// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All work is delegated to Layer 2 (application); this layer
// only routes and prints results.
//
// Three commands are supported:
//   1. `preprocess` — encode a corpus into an id dump
//   2. `keys`       — write gold label keys for a dump
//   3. `inspect`    — batch a dump and summarise it

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, KeysArgs, PreprocessArgs};

#[derive(Parser, Debug)]
#[command(
    name = "sdp-prep",
    version,
    about = "Prepare shortest-dependency-path relation extraction data: vocab, ids, CV folds and batches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Preprocess(args) => run_preprocess(args),
            Commands::Keys(args) => run_keys(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_preprocess(args: PreprocessArgs) -> Result<()> {
    use crate::application::preprocess_use_case::PreprocessUseCase;

    let report = PreprocessUseCase::new(args.into()).execute()?;

    println!("Max sequence length: {}", report.max_seq_len);
    println!(
        "Encoded {} train / {} test examples, vocab size {}",
        report.train_examples, report.test_examples, report.vocab_size
    );
    println!("Wrote {} CV folds to '{}'", report.folds, report.output_dir.display());
    Ok(())
}

fn run_keys(args: KeysArgs) -> Result<()> {
    use crate::application::keys_use_case::KeysUseCase;

    let output = args.output.clone();
    let written = KeysUseCase::new(args.into()).execute()?;
    println!("Wrote {} keys to '{}'", written, output.display());
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let report = InspectUseCase::new(args.into()).execute()?;

    println!("Examples:      {}", report.examples);
    println!("Full batches:  {}", report.full_batches);
    println!("Residual rows: {}", report.residual);
    println!("Longest row:   {} (pad length {})", report.longest, report.pad_len);
    println!("Tokens:        {} ({} UNK)", report.tokens, report.unk_tokens);
    println!("Labels:");
    for (label, count) in &report.labels {
        println!("  {count:>8}  {label}");
    }
    Ok(())
}
