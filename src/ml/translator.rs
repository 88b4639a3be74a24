// ============================================================
// Layer 5 — Translator (Inference Engine)
// ============================================================
// Greedy character-by-character decoding. Training runs the
// decoder over a whole teacher-forced sequence at once, but at
// inference time there is no target to force — the model's own
// previous prediction becomes the next input. That makes
// decoding an explicit loop:
//
//   1. Encode the source sentence once → (hidden, cell) state
//   2. Feed the start sentinel to the decoder
//   3. Take the argmax of the output logits → next character
//   4. Feed that character back in, carrying the LSTM state
//   5. Stop at the stop sentinel or the recorded length cap
//
// Greedy argmax is the simplest decoding strategy; it is exactly
// what the training objective optimises per step, and plenty for
// short sentences.

use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::application::train_seq2seq_use_case::Seq2SeqTrainConfig;
use crate::data::vocab::{VocabBundle, PAD_ID};
use crate::infra::checkpoint::{CheckpointManager, SEQ2SEQ_CONFIG_FILE, SEQ2SEQ_WEIGHTS};
use crate::infra::vocab_store::VocabStore;
use crate::ml::seq2seq::{Seq2SeqConfig, Seq2SeqModel};
use crate::ml::InferenceBackend;

pub struct Translator {
    model: Seq2SeqModel<InferenceBackend>,
    bundle: VocabBundle,
    device: burn::backend::ndarray::NdArrayDevice,
}

impl Translator {
    /// Rebuild the trained model from a checkpoint directory:
    /// the saved config gives the architecture, the vocab bundle
    /// gives the one-hot widths, and the recorder restores the
    /// weights into the freshly built model.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        vocab_store: &VocabStore,
    ) -> Result<Self> {
        let device = burn::backend::ndarray::NdArrayDevice::default();

        let cfg: Seq2SeqTrainConfig = ckpt_manager.load_config(SEQ2SEQ_CONFIG_FILE)?;
        let bundle = vocab_store.load()?;

        let model_cfg = Seq2SeqConfig::new(bundle.source.len(), bundle.target.len())
            .with_latent_size(cfg.latent_size);
        let model = model_cfg.init::<InferenceBackend>(&device);
        let model = ckpt_manager.load_model(model, SEQ2SEQ_WEIGHTS, &device)?;

        tracing::info!("Translator loaded from checkpoint");
        Ok(Self {
            model,
            bundle,
            device,
        })
    }

    /// Translate one sentence with greedy decoding.
    pub fn translate(&self, text: &str) -> Result<String> {
        let source_ids = self.bundle.source.encode(text);
        let known = source_ids.len();
        let seen = text.chars().count();
        if known < seen {
            tracing::warn!(
                "{} of {} input characters are not in the source vocabulary and were skipped",
                seen - known,
                seen
            );
        }

        // ── Encode the source once ────────────────────────────────────────────
        // An all-unknown input still produces a (zero-history) state
        // from a single pad step, so decoding can always proceed.
        let src_vocab = self.bundle.source.len();
        let steps = source_ids.len().max(1);
        let mut flat = vec![0.0f32; steps * src_vocab];
        for (t, &id) in source_ids.iter().enumerate() {
            if id != PAD_ID {
                flat[t * src_vocab + id] = 1.0;
            }
        }
        let encoder_inputs = Tensor::<InferenceBackend, 1>::from_floats(
            flat.as_slice(),
            &self.device,
        )
        .reshape([1, steps, src_vocab]);

        let mut state = self.model.encode(encoder_inputs);

        // ── Greedy decoding loop ──────────────────────────────────────────────
        let target = &self.bundle.target;
        let start_id = target
            .start_id()
            .ok_or_else(|| anyhow!("target vocabulary has no start sentinel"))?;
        let stop_id = target
            .stop_id()
            .ok_or_else(|| anyhow!("target vocabulary has no stop sentinel"))?;
        let tgt_vocab = target.len();

        let mut prev_id = start_id;
        let mut output = String::new();

        // The cap is the longest target seen in training — the model
        // never learned to produce anything longer.
        for _ in 0..self.bundle.max_target_len {
            let mut one_hot = vec![0.0f32; tgt_vocab];
            one_hot[prev_id] = 1.0;
            let prev = Tensor::<InferenceBackend, 1>::from_floats(
                one_hot.as_slice(),
                &self.device,
            )
            .reshape([1, 1, tgt_vocab]);

            let (logits, next_state) = self.model.decode_step(prev, state);
            state = next_state;

            let next_id = logits
                .reshape([tgt_vocab])
                .argmax(0)
                .into_scalar()
                .elem::<i64>() as usize;

            // Stop sentinel or a degenerate pad prediction ends the sentence
            if next_id == stop_id || next_id == PAD_ID {
                break;
            }
            match target.char_of(next_id) {
                Some(c) => output.push(c),
                None => break,
            }
            prev_id = next_id;
        }

        Ok(output)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vocab::{wrap_target, CharVocab};

    /// A translator around an untrained model — predictions are
    /// arbitrary, but the decoding loop contract still holds.
    fn untrained_translator() -> Translator {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let source = CharVocab::build(["abc"]);
        let target = CharVocab::build([wrap_target("xyz").as_str()]);
        let model = Seq2SeqConfig::new(source.len(), target.len())
            .with_latent_size(8)
            .init::<InferenceBackend>(&device);
        Translator {
            model,
            bundle: VocabBundle {
                source,
                target,
                max_source_len: 3,
                max_target_len: 5,
            },
            device,
        }
    }

    #[test]
    fn test_decoding_respects_length_cap() {
        let translator = untrained_translator();
        let output = translator.translate("abc").unwrap();
        // Never longer than the recorded max target length,
        // and sentinels are never emitted into the output.
        assert!(output.chars().count() <= 5);
        assert!(!output.contains('\t'));
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_unknown_characters_are_skipped_not_fatal() {
        let translator = untrained_translator();
        // None of these characters are in the source vocabulary
        assert!(translator.translate("!?#").is_ok());
    }
}
