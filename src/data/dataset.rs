use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::image::LabeledImage;

/// One translation pair after vocabulary lookup.
/// `target_ids` is the wrapped target, so it always begins with
/// the start sentinel and ends with the stop sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSample {
    pub source_ids: Vec<usize>,
    pub target_ids: Vec<usize>,
}

impl TranslationSample {
    /// Length of the decoder input/target sequences
    /// (one shorter than the wrapped target, see the batcher)
    pub fn decoder_len(&self) -> usize {
        self.target_ids.len().saturating_sub(1)
    }
}

/// Labelled images behind Burn's Dataset trait, so the
/// DataLoader can call .get(index) and .len() on it.
pub struct MnistDataset {
    samples: Vec<LabeledImage>,
}

impl MnistDataset {
    pub fn new(samples: Vec<LabeledImage>) -> Self {
        Self { samples }
    }
}

impl Dataset<LabeledImage> for MnistDataset {
    fn get(&self, index: usize) -> Option<LabeledImage> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

/// Encoded sentence pairs behind Burn's Dataset trait.
pub struct TranslationDataset {
    samples: Vec<TranslationSample>,
}

impl TranslationDataset {
    pub fn new(samples: Vec<TranslationSample>) -> Self {
        Self { samples }
    }
}

impl Dataset<TranslationSample> for TranslationDataset {
    fn get(&self, index: usize) -> Option<TranslationSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnist_dataset_get() {
        let ds = MnistDataset::new(vec![LabeledImage::new(vec![0.5; 4], 1)]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.get(0).unwrap().label, 1);
        assert!(ds.get(1).is_none());
    }

    #[test]
    fn test_decoder_len() {
        // start + 2 chars + stop → 4 wrapped ids → 3 decoder steps
        let sample = TranslationSample {
            source_ids: vec![1, 2],
            target_ids: vec![1, 5, 6, 2],
        };
        assert_eq!(sample.decoder_len(), 3);
    }
}
