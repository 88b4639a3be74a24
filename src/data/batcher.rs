// ============================================================
// Layer 4 — Batchers
// ============================================================
// Implements Burn's Batcher trait to convert sample Vecs into
// tensors ready for the model forward pass.
//
// What is a Batcher?
//   A Batcher takes a list of individual samples and stacks
//   them into a single batch tensor. This is necessary because
//   the backend is most efficient when processing many samples
//   at once.
//
// Classifier batching is the easy case: every image already has
// the same length (784 pixels), so we flatten all pixels into
// one long Vec and reshape:
//   [s1_p1, ..., s1_p784, s2_p1, ...] → [batch, 784]
//
// Translator batching does more work:
//   1. Sentences have different lengths, so each batch is padded
//      to the longest sentence IN THAT BATCH. Shorter sequences
//      get all-zero one-hot rows (encoder/decoder inputs) and
//      pad-id targets, which the loss masks out.
//   2. Characters are one-hot encoded on the fly: id 17 in a
//      vocabulary of 70 becomes a 70-wide row with a single 1.0
//      at position 17.
//   3. Teacher forcing needs shifted sequences. For a wrapped
//      target "\tVa !\n" the decoder reads "\tVa !" and must
//      predict "Va !\n" — input is the ids without the last
//      element, target is the ids without the first.
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::TranslationSample;
use crate::data::vocab::PAD_ID;
use crate::domain::image::LabeledImage;

// ─── MnistBatch ───────────────────────────────────────────────────────────────
/// A batch of labelled images ready for the classifier.
///
/// B is the Burn Backend (e.g. NdArray, Wgpu) —
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct MnistBatch<B: Backend> {
    /// Flattened normalised pixels — shape: [batch_size, 784]
    pub images: Tensor<B, 2>,

    /// Ground truth digit classes — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// The classifier batcher — holds the target device so tensors
/// are created in the correct place.
#[derive(Clone, Debug)]
pub struct MnistBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> MnistBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<LabeledImage, MnistBatch<B>> for MnistBatcher<B> {
    fn batch(&self, items: Vec<LabeledImage>) -> MnistBatch<B> {
        let batch_size = items.len();
        // Every image has the same pixel count (the loader flattened them)
        let pixel_count = items[0].pixel_count();

        let pixels_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.pixels.iter().copied())
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let images = Tensor::<B, 1>::from_floats(pixels_flat.as_slice(), &self.device)
            .reshape([batch_size, pixel_count]);

        let targets = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        MnistBatch { images, targets }
    }
}

// ─── Seq2SeqBatch ─────────────────────────────────────────────────────────────
/// A batch of translation pairs ready for teacher-forcing training.
#[derive(Debug, Clone)]
pub struct Seq2SeqBatch<B: Backend> {
    /// One-hot source characters — shape: [batch, src_len, src_vocab]
    pub encoder_inputs: Tensor<B, 3>,

    /// One-hot previous target characters (starts at the start
    /// sentinel) — shape: [batch, dec_len, tgt_vocab]
    pub decoder_inputs: Tensor<B, 3>,

    /// Next-character ids the decoder must predict (ends at the
    /// stop sentinel) — shape: [batch, dec_len]
    pub targets: Tensor<B, 2, Int>,
}

/// The translator batcher. Vocabulary sizes are fixed per run,
/// so they live here rather than being re-derived per batch.
#[derive(Clone, Debug)]
pub struct Seq2SeqBatcher<B: Backend> {
    pub device: B::Device,
    pub source_vocab_size: usize,
    pub target_vocab_size: usize,
}

impl<B: Backend> Seq2SeqBatcher<B> {
    pub fn new(device: B::Device, source_vocab_size: usize, target_vocab_size: usize) -> Self {
        Self {
            device,
            source_vocab_size,
            target_vocab_size,
        }
    }
}

impl<B: Backend> Batcher<TranslationSample, Seq2SeqBatch<B>> for Seq2SeqBatcher<B> {
    fn batch(&self, items: Vec<TranslationSample>) -> Seq2SeqBatch<B> {
        let batch_size = items.len();
        let src_vocab = self.source_vocab_size;
        let tgt_vocab = self.target_vocab_size;

        // Pad to the longest sequence in this batch. The minimum of 1
        // keeps the tensor shapes valid even for degenerate samples.
        let src_len = items
            .iter()
            .map(|s| s.source_ids.len())
            .max()
            .unwrap_or(0)
            .max(1);
        let dec_len = items
            .iter()
            .map(|s| s.decoder_len())
            .max()
            .unwrap_or(0)
            .max(1);

        // ── Encoder inputs: one-hot, zero rows past the sentence end ──────────
        let mut enc_flat = vec![0.0f32; batch_size * src_len * src_vocab];
        for (i, item) in items.iter().enumerate() {
            for (t, &id) in item.source_ids.iter().enumerate() {
                if id != PAD_ID {
                    enc_flat[(i * src_len + t) * src_vocab + id] = 1.0;
                }
            }
        }

        // ── Decoder inputs and shifted targets ────────────────────────────────
        // input[t]  = wrapped_target[t]      (what the decoder reads)
        // target[t] = wrapped_target[t + 1]  (what it must predict)
        let mut dec_flat = vec![0.0f32; batch_size * dec_len * tgt_vocab];
        let mut tgt_flat = vec![PAD_ID as i32; batch_size * dec_len];
        for (i, item) in items.iter().enumerate() {
            for t in 0..item.decoder_len() {
                let input_id = item.target_ids[t];
                let target_id = item.target_ids[t + 1];
                if input_id != PAD_ID {
                    dec_flat[(i * dec_len + t) * tgt_vocab + input_id] = 1.0;
                }
                tgt_flat[i * dec_len + t] = target_id as i32;
            }
        }

        let encoder_inputs = Tensor::<B, 1>::from_floats(enc_flat.as_slice(), &self.device)
            .reshape([batch_size, src_len, src_vocab]);
        let decoder_inputs = Tensor::<B, 1>::from_floats(dec_flat.as_slice(), &self.device)
            .reshape([batch_size, dec_len, tgt_vocab]);
        let targets = Tensor::<B, 1, Int>::from_ints(tgt_flat.as_slice(), &self.device)
            .reshape([batch_size, dec_len]);

        Seq2SeqBatch {
            encoder_inputs,
            decoder_inputs,
            targets,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_mnist_batch_shapes() {
        let batcher = MnistBatcher::<TestBackend>::new(Default::default());
        let batch = batcher.batch(vec![
            LabeledImage::new(vec![0.0; 784], 3),
            LabeledImage::new(vec![1.0; 784], 8),
        ]);
        assert_eq!(batch.images.dims(), [2, 784]);
        assert_eq!(batch.targets.dims(), [2]);

        let labels: Vec<i64> = batch.targets.into_data().to_vec().unwrap();
        assert_eq!(labels, vec![3, 8]);
    }

    #[test]
    fn test_seq2seq_batch_shapes_and_padding() {
        // Vocab of width 5; wrapped targets [1, x.., 2] with 1=start, 2=stop
        let batcher = Seq2SeqBatcher::<TestBackend>::new(Default::default(), 4, 5);
        let batch = batcher.batch(vec![
            TranslationSample {
                source_ids: vec![1, 2, 3],
                target_ids: vec![1, 3, 4, 2],
            },
            TranslationSample {
                source_ids: vec![2],
                target_ids: vec![1, 4, 2],
            },
        ]);

        // src_len = 3, dec_len = 3 (longest wrapped target is 4 ids)
        assert_eq!(batch.encoder_inputs.dims(), [2, 3, 4]);
        assert_eq!(batch.decoder_inputs.dims(), [2, 3, 5]);
        assert_eq!(batch.targets.dims(), [2, 3]);

        let enc: Vec<f32> = batch.encoder_inputs.into_data().to_vec().unwrap();
        // Sample 0, step 0 is id 1 → one-hot position 1 set
        assert_eq!(enc[1], 1.0);
        // Sample 1 has one character; steps 1 and 2 are all-zero padding
        let sample1_step1 = &enc[(1 * 3 + 1) * 4..(1 * 3 + 2) * 4];
        assert!(sample1_step1.iter().all(|&v| v == 0.0));

        let targets: Vec<i64> = batch.targets.into_data().to_vec().unwrap();
        // Sample 0 predicts 3, 4, stop(2); sample 1 predicts 4, stop(2), pad
        assert_eq!(targets, vec![3, 4, 2, 4, 2, PAD_ID as i64]);
    }

    #[test]
    fn test_teacher_forcing_shift() {
        let batcher = Seq2SeqBatcher::<TestBackend>::new(Default::default(), 3, 6);
        let batch = batcher.batch(vec![TranslationSample {
            source_ids: vec![1],
            target_ids: vec![1, 5, 2],
        }]);

        let dec: Vec<f32> = batch.decoder_inputs.into_data().to_vec().unwrap();
        // Step 0 input is the start sentinel (id 1)
        assert_eq!(dec[1], 1.0);
        // Step 1 input is the first real character (id 5)
        assert_eq!(dec[6 + 5], 1.0);

        let targets: Vec<i64> = batch.targets.into_data().to_vec().unwrap();
        // The decoder must predict the character then the stop sentinel
        assert_eq!(targets, vec![5, 2]);
    }
}
