// ============================================================
// Layer 2 — TrainMlpUseCase
// ============================================================
// Orchestrates the classifier training pipeline in order:
//
//   Step 1: Load the IDX training files   (Layer 4 - data)
//   Step 2: Load the IDX test files       (Layer 4 - data)
//   Step 3: Split train/validation        (Layer 4 - data)
//   Step 4: Build datasets                (Layer 4 - data)
//   Step 5: Save config                   (Layer 6 - infra)
//   Step 6: Run training loop             (Layer 5 - ml)
//   Step 7: Evaluate on the test set      (Layer 5 - ml)
//
// The loader already normalises and flattens, so by Step 3
// everything is plain Vec<LabeledImage> data.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::dataset::MnistDataset;
use crate::data::idx::IdxLoader;
use crate::data::splitter::split_train_val;
use crate::domain::image::Split;
use crate::domain::traits::ImageSource;
use crate::infra::checkpoint::{CheckpointManager, MLP_CONFIG_FILE};
use crate::ml::trainer::{evaluate_mlp, run_mlp_training};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a classifier training run.
// Serialisable so it can be saved to disk and reloaded for
// evaluation. The #[derive(Serialize, Deserialize)] macros from
// serde handle reading/writing this struct to JSON automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpTrainConfig {
    pub data_dir: String,
    pub checkpoint_dir: String,
    pub hidden_size: usize,
    pub dropout: f64,
    pub batch_size: usize,
    pub epochs: usize,
    pub lr: f64,
    pub train_fraction: f64,
    pub patience: usize,
    pub seed: u64,
}

impl Default for MlpTrainConfig {
    fn default() -> Self {
        Self {
            data_dir: "data/mnist".to_string(),
            checkpoint_dir: "checkpoints/mlp".to_string(),
            hidden_size: 512,
            dropout: 0.2,
            batch_size: 128,
            epochs: 20,
            lr: 1e-3,
            train_fraction: 0.9,
            patience: 3,
            seed: 42,
        }
    }
}

// ─── TrainMlpUseCase ──────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainMlpUseCase {
    config: MlpTrainConfig,
}

impl TrainMlpUseCase {
    pub fn new(config: MlpTrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1 + 2: Load both IDX splits ─────────────────────────────────
        // The loader validates the headers, normalises pixels to
        // [0, 1] and flattens each image to a 784-element row.
        let loader = IdxLoader::new(&cfg.data_dir);
        let train_images = loader.load_split(Split::Train)?;
        let test_images = loader.load_split(Split::Test)?;

        // ── Step 3: Train / validation split ─────────────────────────────────
        // Early stopping needs data the optimiser never sees; the
        // test set stays untouched until the final evaluation.
        let (train_samples, val_samples) =
            split_train_val(train_images, cfg.train_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation, {} test",
            train_samples.len(),
            val_samples.len(),
            test_images.len()
        );

        // ── Step 4: Build Burn datasets ──────────────────────────────────────
        let train_dataset = MnistDataset::new(train_samples);
        let val_dataset = MnistDataset::new(val_samples);
        let test_dataset = MnistDataset::new(test_images);

        // ── Step 5: Save config for evaluation/inference ─────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg, MLP_CONFIG_FILE)?;

        // ── Step 6: Run training loop (Layer 5) ──────────────────────────────
        run_mlp_training(cfg, train_dataset, val_dataset, &ckpt_manager)?;

        // ── Step 7: Final evaluation on the untouched test set ───────────────
        let (test_loss, test_acc) = evaluate_mlp(cfg, test_dataset, &ckpt_manager)?;
        println!("Test loss: {:.4}", test_loss);
        println!("Test accuracy: {:.2}%", test_acc * 100.0);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_sane() {
        let cfg = MlpTrainConfig::default();
        assert_eq!(cfg.hidden_size, 512);
        assert!(cfg.dropout > 0.0 && cfg.dropout < 1.0);
        assert!(cfg.train_fraction > 0.0 && cfg.train_fraction <= 1.0);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let cfg = MlpTrainConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: MlpTrainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.batch_size, cfg.batch_size);
        assert_eq!(back.checkpoint_dir, cfg.checkpoint_dir);
    }
}
