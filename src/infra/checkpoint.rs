// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved per workflow:
//   1. Model weights (.mpk.gz file) — all learned parameters,
//      written whenever the validation loss improves, so the
//      file always holds the best epoch
//   2. The training config as JSON — model hyperparameters
//
// Why save the config separately?
//   When loading for inference, we need to know the exact
//   architecture (hidden sizes, vocab widths) to rebuild the
//   model before loading the weights into it.
//   Without the config, we can't reconstruct the model.
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack format
//   - Compresses with gzip for smaller file size
//   - Type-safe: loading fails if the architecture doesn't match
//
// File naming convention:
//   checkpoints/mlp/
//     mlp_best.mpk.gz        ← best classifier weights
//     mlp_config.json        ← classifier hyperparameters
//     mlp_metrics.csv        ← learning curve
//   checkpoints/seq2seq/
//     seq2seq_best.mpk.gz    ← best translator weights
//     seq2seq_config.json    ← translator hyperparameters
//     vocab.json             ← vocabularies + length stats
//     seq2seq_metrics.csv    ← learning curve
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use burn::{
    module::Module,
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::PathBuf};

/// Classifier weight file name (recorder adds the extension)
pub const MLP_WEIGHTS: &str = "mlp_best";
/// Translator weight file name
pub const SEQ2SEQ_WEIGHTS: &str = "seq2seq_best";
/// Classifier training-config file name
pub const MLP_CONFIG_FILE: &str = "mlp_config.json";
/// Translator training-config file name
pub const SEQ2SEQ_CONFIG_FILE: &str = "seq2seq_config.json";

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    /// Path to the directory where checkpoints are stored
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        // create_dir_all creates parent directories too, like `mkdir -p`
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save model weights under the given name.
    ///
    /// Generic over the module type because the classifier and the
    /// translator share this manager. Uses Burn's CompactRecorder:
    ///   1. model.into_record() extracts all parameters
    ///   2. MessagePack serialisation + gzip compression
    ///   3. Written to {dir}/{name}.mpk.gz
    pub fn save_model<B: Backend, M: Module<B>>(&self, model: &M, name: &str) -> Result<()> {
        let path = self.dir.join(name);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        tracing::debug!("Saved checkpoint '{}'", path.display());
        Ok(())
    }

    /// Load weights back into a freshly built model.
    ///
    /// The model must have the exact architecture the checkpoint
    /// was saved with, or loading fails.
    /// load_record() returns a new model with the loaded weights.
    pub fn load_model<B: Backend, M: Module<B>>(
        &self,
        model: M,
        name: &str,
        device: &B::Device,
    ) -> Result<M> {
        let path = self.dir.join(name);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display()
                )
            })?;

        Ok(model.load_record(record))
    }

    /// Save a training configuration to JSON.
    ///
    /// This must be called before training starts so that
    /// inference can reconstruct the exact model architecture.
    pub fn save_config<C: Serialize>(&self, cfg: &C, filename: &str) -> Result<()> {
        let path = self.dir.join(filename);

        // serde_json::to_string_pretty adds indentation for readability
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load a training configuration from JSON.
    pub fn load_config<C: DeserializeOwned>(&self, filename: &str) -> Result<C> {
        let path = self.dir.join(filename);

        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. \
                 Make sure you have run the matching train command first.",
                path.display()
            )
        })?;

        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::mlp::{Mlp, MlpConfig};
    use burn::tensor::Distribution;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_model_roundtrip_preserves_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path().to_str().unwrap());
        let device = Default::default();

        let cfg = MlpConfig::new(6, 3).with_hidden_size(4);
        let original: Mlp<TestBackend> = cfg.init(&device);
        manager.save_model(&original, "test_model").unwrap();

        // A fresh model has different random weights...
        let fresh: Mlp<TestBackend> = cfg.init(&device);
        let restored = manager.load_model(fresh, "test_model", &device).unwrap();

        // ...but after loading, it computes exactly what the original did
        let input = Tensor::<TestBackend, 2>::random([2, 6], Distribution::Default, &device);
        let expected = original.forward(input.clone());
        let actual = restored.forward(input);
        actual
            .into_data()
            .assert_approx_eq(&expected.into_data(), 5);
    }

    #[test]
    fn test_missing_checkpoint_is_helpful() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path().to_str().unwrap());
        let device = Default::default();

        let model: Mlp<TestBackend> = MlpConfig::new(4, 2).init(&device);
        let err = manager
            .load_model(model, "never_saved", &device)
            .unwrap_err();
        assert!(err.to_string().contains("trained"));
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path().to_str().unwrap());

        #[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
        struct Dummy {
            size: usize,
        }

        manager.save_config(&Dummy { size: 42 }, "dummy.json").unwrap();
        let back: Dummy = manager.load_config("dummy.json").unwrap();
        assert_eq!(back, Dummy { size: 42 });
    }
}
