// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train-mlp`, `train-seq2seq`
// and `translate`, and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::train_mlp_use_case::MlpTrainConfig;
use crate::application::train_seq2seq_use_case::Seq2SeqTrainConfig;

/// The three top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the MLP digit classifier on the MNIST IDX files
    TrainMlp(TrainMlpArgs),

    /// Train the character-level seq2seq translator on a pairs file
    TrainSeq2seq(TrainSeq2seqArgs),

    /// Translate a sentence using a trained seq2seq checkpoint
    Translate(TranslateArgs),
}

/// All arguments for the `train-mlp` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainMlpArgs {
    /// Directory containing the four MNIST IDX files
    /// (train-images-idx3-ubyte, train-labels-idx1-ubyte,
    /// t10k-images-idx3-ubyte, t10k-labels-idx1-ubyte)
    #[arg(long, default_value = "data/mnist")]
    pub data_dir: String,

    /// Directory to save model checkpoints, config and metrics
    #[arg(long, default_value = "checkpoints/mlp")]
    pub checkpoint_dir: String,

    /// Width of both hidden layers
    #[arg(long, default_value_t = 512)]
    pub hidden_size: usize,

    /// Dropout probability after each hidden layer — randomly zeroes
    /// activations during training to prevent overfitting
    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Maximum number of full passes through the training data.
    /// Early stopping usually halts well before this.
    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// How fast the model learns — too high causes instability,
    /// too low causes slow convergence
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Fraction of the training set kept for training; the rest
    /// becomes the validation set that early stopping monitors
    #[arg(long, default_value_t = 0.9)]
    pub train_fraction: f64,

    /// Stop after this many epochs without validation improvement
    #[arg(long, default_value_t = 3)]
    pub patience: usize,

    /// Seed for shuffling and weight initialisation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainMlpArgs into the application-layer MlpTrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainMlpArgs> for MlpTrainConfig {
    fn from(a: TrainMlpArgs) -> Self {
        MlpTrainConfig {
            data_dir: a.data_dir,
            checkpoint_dir: a.checkpoint_dir,
            hidden_size: a.hidden_size,
            dropout: a.dropout,
            batch_size: a.batch_size,
            epochs: a.epochs,
            lr: a.lr,
            train_fraction: a.train_fraction,
            patience: a.patience,
            seed: a.seed,
        }
    }
}

/// All arguments for the `train-seq2seq` command
#[derive(Args, Debug)]
pub struct TrainSeq2seqArgs {
    /// Tab-separated sentence-pair file: one "source<TAB>target" line
    /// per pair (any third column is ignored)
    #[arg(long, default_value = "data/fra.txt")]
    pub data_file: String,

    /// Directory to save model checkpoints, config and vocabularies
    #[arg(long, default_value = "checkpoints/seq2seq")]
    pub checkpoint_dir: String,

    /// Use at most this many sentence pairs from the file
    #[arg(long, default_value_t = 10_000)]
    pub num_samples: usize,

    /// Hidden size of the encoder and decoder LSTMs.
    /// Both must match so the encoder state can seed the decoder.
    #[arg(long, default_value_t = 256)]
    pub latent_size: usize,

    /// Number of pairs processed together in one forward pass
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Maximum number of full passes through the training data
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Learning rate for the Adam optimiser
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Fraction of pairs used for training; the rest is validation
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Stop after this many epochs without validation improvement
    #[arg(long, default_value_t = 10)]
    pub patience: usize,

    /// Seed for shuffling and weight initialisation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl From<TrainSeq2seqArgs> for Seq2SeqTrainConfig {
    fn from(a: TrainSeq2seqArgs) -> Self {
        Seq2SeqTrainConfig {
            data_file: a.data_file,
            checkpoint_dir: a.checkpoint_dir,
            num_samples: a.num_samples,
            latent_size: a.latent_size,
            batch_size: a.batch_size,
            epochs: a.epochs,
            lr: a.lr,
            train_fraction: a.train_fraction,
            patience: a.patience,
            seed: a.seed,
        }
    }
}

/// All arguments for the `translate` command
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// The sentence to translate
    #[arg(long)]
    pub text: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints/seq2seq")]
    pub checkpoint_dir: String,
}
