// ============================================================
// Layer 3 — Labelled Image Domain Type
// ============================================================
// Represents a single training or test image after loading.
// By the time a LabeledImage exists, the format-specific work
// (IDX headers, byte decoding, normalisation) is already done:
// pixels are plain f32 values in [0, 1], flattened row-major.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// A single image with its ground-truth class label.
///
/// Pixels are flattened row-major (28×28 → 784 for MNIST) and
/// normalised to [0, 1], ready to feed straight into a dense layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledImage {
    /// Normalised pixel intensities, length = rows × cols
    pub pixels: Vec<f32>,

    /// The class this image belongs to (0–9 for MNIST digits)
    pub label: usize,
}

impl LabeledImage {
    /// Create a new LabeledImage from normalised pixels and a label.
    pub fn new(pixels: Vec<f32>, label: usize) -> Self {
        Self { pixels, label }
    }

    /// Number of input features this image contributes (784 for MNIST)
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }
}

/// Which portion of a dataset to load.
/// MNIST ships as two fixed splits with different file names,
/// so the loader needs to know which one the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_count() {
        let img = LabeledImage::new(vec![0.0; 784], 3);
        assert_eq!(img.pixel_count(), 784);
        assert_eq!(img.label, 3);
    }
}
