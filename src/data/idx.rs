// ============================================================
// Layer 4 — MNIST IDX Loader
// ============================================================
// Loads the classic MNIST binary files (IDX format).
//
// How IDX files work:
//   Everything is big-endian. An image file starts with four
//   32-bit header words:
//
//     magic (2051) | image count | rows | cols
//
//   followed by count × rows × cols raw pixel bytes (0–255).
//   A label file has two header words:
//
//     magic (2049) | label count
//
//   followed by count raw label bytes (0–9).
//
// The loader does the whole "load, normalise, reshape" step in
// one pass: pixel bytes become f32 in [0, 1] and each 28×28
// image is flattened to a 784-element row, which is exactly the
// input shape the dense layers expect.
//
// Reference: LeCun et al., the MNIST database format notes
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::domain::image::{LabeledImage, Split};
use crate::domain::traits::ImageSource;

/// Expected magic number for IDX image files (unsigned byte, 3 dims)
const IMAGE_MAGIC: u32 = 2051;
/// Expected magic number for IDX label files (unsigned byte, 1 dim)
const LABEL_MAGIC: u32 = 2049;

/// Loads labelled images from a directory holding the four
/// standard MNIST files. Implements the ImageSource trait
/// from Layer 3 so callers never see IDX details.
pub struct IdxLoader {
    /// Path to the directory containing the IDX files
    dir: PathBuf,
}

impl IdxLoader {
    /// Create a new IdxLoader pointed at a directory
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            dir: PathBuf::from(dir.into()),
        }
    }

    /// Standard MNIST file names for a split
    fn file_names(split: Split) -> (&'static str, &'static str) {
        match split {
            Split::Train => ("train-images-idx3-ubyte", "train-labels-idx1-ubyte"),
            Split::Test => ("t10k-images-idx3-ubyte", "t10k-labels-idx1-ubyte"),
        }
    }
}

impl ImageSource for IdxLoader {
    fn load_split(&self, split: Split) -> Result<Vec<LabeledImage>> {
        let (image_file, label_file) = Self::file_names(split);

        let images = read_idx_images(&self.dir.join(image_file))?;
        let labels = read_idx_labels(&self.dir.join(label_file))?;

        // The two files describe the same samples in the same order,
        // so their counts must agree.
        if images.len() != labels.len() {
            bail!(
                "IDX count mismatch: {} images but {} labels in '{}'",
                images.len(),
                labels.len(),
                self.dir.display()
            );
        }

        let samples: Vec<LabeledImage> = images
            .into_iter()
            .zip(labels)
            .map(|(pixels, label)| LabeledImage::new(pixels, label as usize))
            .collect();

        tracing::info!(
            "Loaded {} {:?} images from '{}'",
            samples.len(),
            split,
            self.dir.display()
        );
        Ok(samples)
    }
}

/// Read one big-endian u32 from `data` at `*offset`, advancing it.
fn read_be_u32(data: &[u8], offset: &mut usize, what: &str) -> Result<u32> {
    let end = *offset + 4;
    if data.len() < end {
        bail!("IDX file truncated while reading {what}");
    }
    let bytes = [
        data[*offset],
        data[*offset + 1],
        data[*offset + 2],
        data[*offset + 3],
    ];
    *offset = end;
    Ok(u32::from_be_bytes(bytes))
}

/// Parse an IDX image file into per-image normalised pixel rows.
fn read_idx_images(path: &Path) -> Result<Vec<Vec<f32>>> {
    let data = std::fs::read(path).with_context(|| {
        format!(
            "Cannot read IDX image file '{}'. \
             Download the MNIST files into the data directory first.",
            path.display()
        )
    })?;

    let mut offset = 0usize;
    let magic = read_be_u32(&data, &mut offset, "image magic number")?;
    if magic != IMAGE_MAGIC {
        bail!(
            "'{}' is not an IDX image file (magic {} != {})",
            path.display(),
            magic,
            IMAGE_MAGIC
        );
    }

    let count = read_be_u32(&data, &mut offset, "image count")? as usize;
    let rows = read_be_u32(&data, &mut offset, "row count")? as usize;
    let cols = read_be_u32(&data, &mut offset, "column count")? as usize;
    let image_size = rows * cols;

    if data.len() < offset + count * image_size {
        bail!(
            "IDX image file '{}' is truncated: header promises {} images of {}x{}",
            path.display(),
            count,
            rows,
            cols
        );
    }

    // Normalise while copying: u8 0–255 → f32 0.0–1.0.
    // Keeping inputs in [0, 1] makes the initial weight scale sane.
    let images = (0..count)
        .map(|i| {
            let start = offset + i * image_size;
            data[start..start + image_size]
                .iter()
                .map(|&p| p as f32 / 255.0)
                .collect()
        })
        .collect();

    Ok(images)
}

/// Parse an IDX label file into raw label bytes.
fn read_idx_labels(path: &Path) -> Result<Vec<u8>> {
    let data = std::fs::read(path).with_context(|| {
        format!("Cannot read IDX label file '{}'", path.display())
    })?;

    let mut offset = 0usize;
    let magic = read_be_u32(&data, &mut offset, "label magic number")?;
    if magic != LABEL_MAGIC {
        bail!(
            "'{}' is not an IDX label file (magic {} != {})",
            path.display(),
            magic,
            LABEL_MAGIC
        );
    }

    let count = read_be_u32(&data, &mut offset, "label count")? as usize;
    if data.len() < offset + count {
        bail!("IDX label file '{}' is truncated", path.display());
    }

    Ok(data[offset..offset + count].to_vec())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal IDX image file in memory: 2 images of 2×2
    fn tiny_image_file() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&IMAGE_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&2u32.to_be_bytes()); // count
        bytes.extend_from_slice(&2u32.to_be_bytes()); // rows
        bytes.extend_from_slice(&2u32.to_be_bytes()); // cols
        bytes.extend_from_slice(&[0, 51, 102, 255, 255, 204, 153, 0]);
        bytes
    }

    fn tiny_label_file() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&LABEL_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&[7, 3]);
        bytes
    }

    #[test]
    fn test_images_normalised_and_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imgs");
        std::fs::write(&path, tiny_image_file()).unwrap();

        let images = read_idx_images(&path).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].len(), 4);
        assert!((images[0][0] - 0.0).abs() < 1e-6);
        assert!((images[0][3] - 1.0).abs() < 1e-6);
        assert!((images[1][0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imgs");
        let mut bytes = tiny_image_file();
        bytes[3] = 9; // corrupt the magic number
        std::fs::write(&path, bytes).unwrap();

        assert!(read_idx_images(&path).is_err());
    }

    #[test]
    fn test_truncated_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imgs");
        let mut bytes = tiny_image_file();
        bytes.truncate(bytes.len() - 3); // drop pixel bytes
        std::fs::write(&path, bytes).unwrap();

        assert!(read_idx_images(&path).is_err());
    }

    #[test]
    fn test_load_split_pairs_images_with_labels() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("train-images-idx3-ubyte"), tiny_image_file()).unwrap();
        std::fs::write(dir.path().join("train-labels-idx1-ubyte"), tiny_label_file()).unwrap();

        let loader = IdxLoader::new(dir.path().to_str().unwrap());
        let samples = loader.load_split(Split::Train).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label, 7);
        assert_eq!(samples[1].label, 3);
        assert_eq!(samples[0].pixel_count(), 4);
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("train-images-idx3-ubyte"), tiny_image_file()).unwrap();

        // Label file that claims only one label
        let mut labels = Vec::new();
        labels.extend_from_slice(&LABEL_MAGIC.to_be_bytes());
        labels.extend_from_slice(&1u32.to_be_bytes());
        labels.push(7);
        std::fs::write(dir.path().join("train-labels-idx1-ubyte"), labels).unwrap();

        let loader = IdxLoader::new(dir.path().to_str().unwrap());
        assert!(loader.load_split(Split::Train).is_err());
    }
}
