// ============================================================
// Layer 2 — TrainSeq2seqUseCase
// ============================================================
// Orchestrates the translator training pipeline in order:
//
//   Step 1: Load sentence pairs           (Layer 4 - data)
//   Step 2: Wrap targets in sentinels     (Layer 4 - data)
//   Step 3: Build character vocabularies  (Layer 4 - data)
//   Step 4: Encode pairs to id sequences  (Layer 4 - data)
//   Step 5: Persist the vocab bundle      (Layer 6 - infra)
//   Step 6: Split train/validation        (Layer 4 - data)
//   Step 7: Save config                   (Layer 6 - infra)
//   Step 8: Run training loop             (Layer 5 - ml)
//   Step 9: Decode a few samples          (Layer 5 - ml)
//
// Step 9 mirrors what anyone does after training a translator:
// feed a handful of training sentences back through greedy
// decoding to eyeball whether the model learned anything.
//
// Reference: Sutskever et al. (2014), Burn Book §5

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::dataset::{TranslationDataset, TranslationSample};
use crate::data::splitter::split_train_val;
use crate::data::tsv::TsvLoader;
use crate::data::vocab::{wrap_target, CharVocab, VocabBundle};
use crate::domain::sentence_pair::SentencePair;
use crate::domain::traits::PairSource;
use crate::infra::checkpoint::{CheckpointManager, SEQ2SEQ_CONFIG_FILE};
use crate::infra::vocab_store::VocabStore;
use crate::ml::seq2seq::Seq2SeqConfig;
use crate::ml::trainer::run_seq2seq_training;
use crate::ml::translator::Translator;

/// How many training sentences to decode for inspection after training
const SAMPLE_TRANSLATIONS: usize = 5;

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seq2SeqTrainConfig {
    pub data_file: String,
    pub checkpoint_dir: String,
    pub num_samples: usize,
    pub latent_size: usize,
    pub batch_size: usize,
    pub epochs: usize,
    pub lr: f64,
    pub train_fraction: f64,
    pub patience: usize,
    pub seed: u64,
}

impl Default for Seq2SeqTrainConfig {
    fn default() -> Self {
        Self {
            data_file: "data/fra.txt".to_string(),
            checkpoint_dir: "checkpoints/seq2seq".to_string(),
            num_samples: 10_000,
            latent_size: 256,
            batch_size: 64,
            epochs: 100,
            lr: 1e-3,
            train_fraction: 0.8,
            patience: 10,
            seed: 42,
        }
    }
}

// ─── TrainSeq2seqUseCase ──────────────────────────────────────────────────────
pub struct TrainSeq2seqUseCase {
    config: Seq2SeqTrainConfig,
}

impl TrainSeq2seqUseCase {
    pub fn new(config: Seq2SeqTrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load sentence pairs ──────────────────────────────────────
        let loader = TsvLoader::new(&cfg.data_file);
        let pairs = loader.load_pairs(Some(cfg.num_samples))?;

        // ── Steps 2–4: Vocabularies and encoded samples ──────────────────────
        let (bundle, samples) = build_samples(&pairs);
        tracing::info!(
            "Vocabularies: {} source chars, {} target chars; \
             longest source {} chars, longest target {} chars",
            bundle.source.len(),
            bundle.target.len(),
            bundle.max_source_len,
            bundle.max_target_len
        );

        // ── Step 5: Persist the bundle — inference depends on the
        //            exact same character ids ─────────────────────────────────
        let vocab_store = VocabStore::new(&cfg.checkpoint_dir);
        vocab_store.save(&bundle)?;

        // ── Step 6: Train / validation split ─────────────────────────────────
        let (train_samples, val_samples) =
            split_train_val(samples, cfg.train_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_samples.len(),
            val_samples.len()
        );

        let train_dataset = TranslationDataset::new(train_samples);
        let val_dataset = TranslationDataset::new(val_samples);

        // ── Step 7: Save config for inference ────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg, SEQ2SEQ_CONFIG_FILE)?;

        // ── Step 8: Run training loop (Layer 5) ──────────────────────────────
        let model_cfg = Seq2SeqConfig::new(bundle.source.len(), bundle.target.len())
            .with_latent_size(cfg.latent_size);
        run_seq2seq_training(cfg, &model_cfg, train_dataset, val_dataset, &ckpt_manager)?;

        // ── Step 9: Decode a few training sentences for inspection ───────────
        let translator = Translator::from_checkpoint(&ckpt_manager, &vocab_store)?;
        println!("\nSample translations:");
        for pair in pairs.iter().take(SAMPLE_TRANSLATIONS) {
            let decoded = translator.translate(&pair.source)?;
            println!("  {:<30} → {}", pair.source, decoded);
        }

        Ok(())
    }
}

// ─── Sample Building ──────────────────────────────────────────────────────────
// Turn raw pairs into everything the tensor pipeline needs:
// separate source/target vocabularies, id sequences per pair,
// and the length statistics used for the decoding cap.
//
// Targets are wrapped BEFORE the vocabulary is built, so the
// start/stop sentinels are ordinary members of the target
// vocabulary and the decoder can learn to emit them.
pub fn build_samples(pairs: &[SentencePair]) -> (VocabBundle, Vec<TranslationSample>) {
    let wrapped: Vec<String> = pairs.iter().map(|p| wrap_target(&p.target)).collect();

    let source = CharVocab::build(pairs.iter().map(|p| p.source.as_str()));
    let target = CharVocab::build(wrapped.iter().map(|s| s.as_str()));

    let samples: Vec<TranslationSample> = pairs
        .iter()
        .zip(&wrapped)
        .map(|(pair, wrapped_target)| TranslationSample {
            source_ids: source.encode(&pair.source),
            target_ids: target.encode(wrapped_target),
        })
        .collect();

    let max_source_len = samples.iter().map(|s| s.source_ids.len()).max().unwrap_or(0);
    let max_target_len = samples.iter().map(|s| s.target_ids.len()).max().unwrap_or(0);

    let bundle = VocabBundle {
        source,
        target,
        max_source_len,
        max_target_len,
    };
    (bundle, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_samples_wraps_targets() {
        let pairs = vec![
            SentencePair::new("Go.", "Va !"),
            SentencePair::new("Hi.", "Salut !"),
        ];
        let (bundle, samples) = build_samples(&pairs);

        assert_eq!(samples.len(), 2);
        // Every encoded target begins with start and ends with stop
        let start = bundle.target.start_id().unwrap();
        let stop = bundle.target.stop_id().unwrap();
        for sample in &samples {
            assert_eq!(*sample.target_ids.first().unwrap(), start);
            assert_eq!(*sample.target_ids.last().unwrap(), stop);
        }
        // "Salut !" wrapped is 9 chars; "Va !" wrapped is 6
        assert_eq!(bundle.max_target_len, 9);
        assert_eq!(bundle.max_source_len, 3);
    }

    #[test]
    fn test_source_vocab_has_no_sentinels() {
        let pairs = vec![SentencePair::new("abc", "def")];
        let (bundle, _) = build_samples(&pairs);
        // Sentinels only exist on the target side, where wrapping adds them
        assert!(bundle.source.start_id().is_none());
        assert!(bundle.source.stop_id().is_none());
        assert!(bundle.target.start_id().is_some());
    }

    #[test]
    fn test_default_config_is_sane() {
        let cfg = Seq2SeqTrainConfig::default();
        assert_eq!(cfg.latent_size, 256);
        assert_eq!(cfg.num_samples, 10_000);
        assert!(cfg.train_fraction > 0.0 && cfg.train_fraction <= 1.0);
    }
}
