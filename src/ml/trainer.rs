// ============================================================
// Layer 5 — Training Loops
// ============================================================
// Full train + validation loops for both workflows, using
// Burn's DataLoader and Adam.
//
// Key backend insight:
//   - Training uses TrainingBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on InferenceBackend (NdArray)
//   - Validation batchers must also use InferenceBackend
//   - argmax(dim) keeps the rank, so predictions are flattened
//     before .equal() against the 1-D targets
//
// Early stopping:
//   The validation loss is the referee. Whenever it improves by
//   more than MIN_DELTA the current weights are checkpointed;
//   after `patience` epochs without improvement the loop stops.
//   The checkpoint on disk therefore always holds the best
//   validation epoch, never the last one.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam
//            Prechelt (1998) Early Stopping — But When?

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_mlp_use_case::MlpTrainConfig;
use crate::application::train_seq2seq_use_case::Seq2SeqTrainConfig;
use crate::data::batcher::{MnistBatcher, Seq2SeqBatcher};
use crate::data::dataset::{MnistDataset, TranslationDataset};
use crate::data::vocab::PAD_ID;
use crate::infra::checkpoint::{CheckpointManager, MLP_WEIGHTS, SEQ2SEQ_WEIGHTS};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::mlp::{Mlp, MlpConfig};
use crate::ml::seq2seq::Seq2SeqConfig;
use crate::ml::{InferenceBackend, TrainingBackend};

/// Number of input features for MNIST (28 × 28)
pub const MNIST_INPUTS: usize = 784;
/// Number of MNIST classes (digits 0–9)
pub const MNIST_CLASSES: usize = 10;

/// A validation-loss change smaller than this does not count
/// as an improvement for early stopping.
const MIN_DELTA: f64 = 1e-4;

// ─── Early Stopping ───────────────────────────────────────────────────────────
/// Watches the validation loss and decides when training has
/// stopped paying off.
pub struct EarlyStopping {
    patience: usize,
    min_delta: f64,
    best: f64,
    stale_epochs: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize, min_delta: f64) -> Self {
        Self {
            patience,
            min_delta,
            best: f64::INFINITY,
            stale_epochs: 0,
        }
    }

    /// Record one epoch's validation loss.
    /// Returns true if this epoch is the new best.
    pub fn observe(&mut self, val_loss: f64) -> bool {
        if val_loss < self.best - self.min_delta {
            self.best = val_loss;
            self.stale_epochs = 0;
            true
        } else {
            self.stale_epochs += 1;
            false
        }
    }

    /// True once `patience` consecutive epochs failed to improve.
    pub fn should_stop(&self) -> bool {
        self.stale_epochs >= self.patience
    }

    /// Best validation loss seen so far
    pub fn best(&self) -> f64 {
        self.best
    }
}

// ─── Classifier training ──────────────────────────────────────────────────────
pub fn run_mlp_training(
    cfg: &MlpTrainConfig,
    train_dataset: MnistDataset,
    val_dataset: MnistDataset,
    ckpt_manager: &CheckpointManager,
) -> Result<()> {
    let device = burn::backend::ndarray::NdArrayDevice::default();
    TrainingBackend::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = MlpConfig::new(MNIST_INPUTS, MNIST_CLASSES)
        .with_hidden_size(cfg.hidden_size)
        .with_dropout(cfg.dropout);
    let mut model: Mlp<TrainingBackend> = model_cfg.init(&device);
    tracing::info!(
        "Classifier ready: {}-{}-{}-{}",
        MNIST_INPUTS,
        cfg.hidden_size,
        cfg.hidden_size,
        MNIST_CLASSES
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = MnistBatcher::<TrainingBackend>::new(device);
    let train_loader = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = MnistBatcher::<InferenceBackend>::new(device);
    let val_loader = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let metrics = MetricsLogger::new(&cfg.checkpoint_dir, "mlp_metrics.csv")?;
    let mut stopper = EarlyStopping::new(cfg.patience, MIN_DELTA);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.images, batch.targets);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else {
            f64::NAN
        };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → Mlp<InferenceBackend>, dropout disabled
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches = 0usize;
        let mut correct = 0usize;
        let mut total = 0usize;

        for batch in val_loader.iter() {
            let (loss, logits) = model_valid.forward_loss(batch.images, batch.targets.clone());
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches += 1;

            // argmax(1) returns shape [batch, 1] — flatten to [batch]
            // before comparing with the targets which are [batch]
            let preds = logits.argmax(1).flatten::<1>(0, 1);

            total += batch.targets.dims()[0];
            let batch_correct: i64 = preds
                .equal(batch.targets)
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>();
            correct += batch_correct as usize;
        }

        let avg_val_loss = if val_batches > 0 {
            val_loss_sum / val_batches as f64
        } else {
            f64::NAN
        };
        let val_acc = if total > 0 {
            correct as f64 / total as f64
        } else {
            0.0
        };

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
            epoch,
            cfg.epochs,
            avg_train_loss,
            avg_val_loss,
            val_acc * 100.0,
        );
        metrics.log(&EpochMetrics::new(epoch, avg_train_loss, avg_val_loss, val_acc))?;

        if stopper.observe(avg_val_loss) {
            ckpt_manager.save_model(&model, MLP_WEIGHTS)?;
            tracing::info!("Validation improved — checkpoint saved (epoch {})", epoch);
        }
        if stopper.should_stop() {
            tracing::info!(
                "Early stopping: no improvement for {} epochs",
                cfg.patience
            );
            break;
        }
    }

    tracing::info!(
        "Training complete! Best val_loss={:.4}; learning curve in '{}'",
        stopper.best(),
        metrics.csv_path().display()
    );
    Ok(())
}

/// Reload the best checkpoint and measure loss + accuracy on the
/// untouched test set. Returns (test_loss, test_accuracy).
pub fn evaluate_mlp(
    cfg: &MlpTrainConfig,
    test_dataset: MnistDataset,
    ckpt_manager: &CheckpointManager,
) -> Result<(f64, f64)> {
    let device = burn::backend::ndarray::NdArrayDevice::default();

    let model_cfg = MlpConfig::new(MNIST_INPUTS, MNIST_CLASSES)
        .with_hidden_size(cfg.hidden_size)
        .with_dropout(cfg.dropout);
    let model: Mlp<InferenceBackend> = model_cfg.init(&device);
    let model = ckpt_manager.load_model(model, MLP_WEIGHTS, &device)?;

    let batcher = MnistBatcher::<InferenceBackend>::new(device);
    let loader = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(test_dataset);

    let mut loss_sum = 0.0f64;
    let mut batches = 0usize;
    let mut correct = 0usize;
    let mut total = 0usize;

    for batch in loader.iter() {
        let (loss, logits) = model.forward_loss(batch.images, batch.targets.clone());
        loss_sum += loss.into_scalar().elem::<f64>();
        batches += 1;

        let preds = logits.argmax(1).flatten::<1>(0, 1);
        total += batch.targets.dims()[0];
        correct += preds
            .equal(batch.targets)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>() as usize;
    }

    let test_loss = if batches > 0 {
        loss_sum / batches as f64
    } else {
        f64::NAN
    };
    let test_acc = if total > 0 {
        correct as f64 / total as f64
    } else {
        0.0
    };
    Ok((test_loss, test_acc))
}

// ─── Translator training ──────────────────────────────────────────────────────
pub fn run_seq2seq_training(
    cfg: &Seq2SeqTrainConfig,
    model_cfg: &Seq2SeqConfig,
    train_dataset: TranslationDataset,
    val_dataset: TranslationDataset,
    ckpt_manager: &CheckpointManager,
) -> Result<()> {
    let device = burn::backend::ndarray::NdArrayDevice::default();
    TrainingBackend::seed(cfg.seed);

    let mut model = model_cfg.init::<TrainingBackend>(&device);
    tracing::info!(
        "Translator ready: {} source chars, {} target chars, latent={}",
        model_cfg.source_vocab_size,
        model_cfg.target_vocab_size,
        model_cfg.latent_size
    );

    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    let train_batcher = Seq2SeqBatcher::<TrainingBackend>::new(
        device,
        model_cfg.source_vocab_size,
        model_cfg.target_vocab_size,
    );
    let train_loader = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    let val_batcher = Seq2SeqBatcher::<InferenceBackend>::new(
        device,
        model_cfg.source_vocab_size,
        model_cfg.target_vocab_size,
    );
    let val_loader = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let metrics = MetricsLogger::new(&cfg.checkpoint_dir, "seq2seq_metrics.csv")?;
    let mut stopper = EarlyStopping::new(cfg.patience, MIN_DELTA);

    for epoch in 1..=cfg.epochs {
        // ── Training phase (teacher forcing) ──────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) =
                model.forward_loss(batch.encoder_inputs, batch.decoder_inputs, batch.targets);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else {
            f64::NAN
        };

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches = 0usize;
        let mut correct: i64 = 0;
        let mut total: i64 = 0;

        for batch in val_loader.iter() {
            let (loss, logits) = model_valid.forward_loss(
                batch.encoder_inputs,
                batch.decoder_inputs,
                batch.targets.clone(),
            );
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches += 1;

            // Token-level accuracy over the real (non-pad) positions
            let [b, t, v] = logits.dims();
            let preds = logits.reshape([b * t, v]).argmax(1).flatten::<1>(0, 1);
            let targets_flat = batch.targets.reshape([b * t]);
            let non_pad = targets_flat.clone().not_equal_elem(PAD_ID as i64);

            correct += (preds.equal(targets_flat).int() * non_pad.clone().int())
                .sum()
                .into_scalar()
                .elem::<i64>();
            total += non_pad.int().sum().into_scalar().elem::<i64>();
        }

        let avg_val_loss = if val_batches > 0 {
            val_loss_sum / val_batches as f64
        } else {
            f64::NAN
        };
        let val_acc = if total > 0 {
            correct as f64 / total as f64
        } else {
            0.0
        };

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | char_acc={:.1}%",
            epoch,
            cfg.epochs,
            avg_train_loss,
            avg_val_loss,
            val_acc * 100.0,
        );
        metrics.log(&EpochMetrics::new(epoch, avg_train_loss, avg_val_loss, val_acc))?;

        if stopper.observe(avg_val_loss) {
            ckpt_manager.save_model(&model, SEQ2SEQ_WEIGHTS)?;
            tracing::info!("Validation improved — checkpoint saved (epoch {})", epoch);
        }
        if stopper.should_stop() {
            tracing::info!(
                "Early stopping: no improvement for {} epochs",
                cfg.patience
            );
            break;
        }
    }

    tracing::info!(
        "Training complete! Best val_loss={:.4}; learning curve in '{}'",
        stopper.best(),
        metrics.csv_path().display()
    );
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_early_stopping_improvement_resets_patience() {
        let mut stopper = EarlyStopping::new(2, 0.0);
        assert!(stopper.observe(1.0)); // first epoch is always an improvement
        assert!(!stopper.observe(1.5));
        assert!(!stopper.should_stop());
        assert!(stopper.observe(0.8)); // improvement resets the stale counter
        assert!(!stopper.should_stop());
    }

    #[test]
    fn test_early_stopping_triggers_after_patience() {
        let mut stopper = EarlyStopping::new(2, 0.0);
        stopper.observe(1.0);
        stopper.observe(1.1);
        assert!(!stopper.should_stop());
        stopper.observe(1.2);
        assert!(stopper.should_stop());
    }

    #[test]
    fn test_early_stopping_min_delta() {
        // A shrinking loss that never beats min_delta is stale
        let mut stopper = EarlyStopping::new(3, 0.1);
        assert!(stopper.observe(1.0));
        assert!(!stopper.observe(0.95));
        assert!(!stopper.observe(0.92));
        assert!(!stopper.observe(0.91));
        assert!(stopper.should_stop());
        assert!((stopper.best() - 1.0).abs() < 1e-9);
    }
}
