// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train-mlp`     — trains the MNIST image classifier
//   2. `train-seq2seq` — trains the character-level translator
//   3. `translate`     — loads a checkpoint and translates a sentence
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainMlpArgs, TrainSeq2seqArgs, TranslateArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "mnist-seq2seq",
    version = "0.1.0",
    about = "Train an MNIST MLP classifier and a character-level seq2seq translator."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::TrainMlp(args) => Self::run_train_mlp(args),
            Commands::TrainSeq2seq(args) => Self::run_train_seq2seq(args),
            Commands::Translate(args) => Self::run_translate(args),
        }
    }

    /// Handles the `train-mlp` subcommand.
    /// Converts CLI args into an MlpTrainConfig and hands off to Layer 2.
    fn run_train_mlp(args: TrainMlpArgs) -> Result<()> {
        use crate::application::train_mlp_use_case::TrainMlpUseCase;

        tracing::info!(
            "Starting classifier training on IDX data in: {}",
            args.data_dir
        );

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainMlpUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    /// Handles the `train-seq2seq` subcommand.
    fn run_train_seq2seq(args: TrainSeq2seqArgs) -> Result<()> {
        use crate::application::train_seq2seq_use_case::TrainSeq2seqUseCase;

        tracing::info!(
            "Starting translator training on sentence pairs in: {}",
            args.data_file
        );

        let use_case = TrainSeq2seqUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint and vocabularies saved.");
        Ok(())
    }

    /// Handles the `translate` subcommand.
    /// Loads the model from checkpoint and prints the decoded output.
    fn run_translate(args: TranslateArgs) -> Result<()> {
        use crate::application::translate_use_case::TranslateUseCase;

        // Build the use case from the checkpoint directory alone —
        // config, vocabularies and weights all live there
        let use_case = TranslateUseCase::new(args.checkpoint_dir.clone())?;

        let output = use_case.translate(&args.text)?;
        println!("\nTranslation: {}", output);
        Ok(())
    }
}
