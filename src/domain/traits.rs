// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Traits are Rust's way of defining shared behaviour —
// similar to interfaces in Java or abstract classes in Python.
//
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - IdxLoader implements ImageSource
//   - A future PngLoader could also implement ImageSource
//   - The application layer only sees ImageSource
//     and works with both without any changes
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use anyhow::Result;

use crate::domain::image::{LabeledImage, Split};
use crate::domain::sentence_pair::SentencePair;

// ─── ImageSource ──────────────────────────────────────────────────────────────
/// Any component that can load labelled images for a dataset split.
///
/// Implementations:
///   - IdxLoader  → loads from the MNIST IDX binary files
///   - (future) PngLoader → loads from a directory of PNG files
pub trait ImageSource {
    /// Load every image in the given split, already normalised
    /// and flattened. Returns a Vec of LabeledImages or an error.
    fn load_split(&self, split: Split) -> Result<Vec<LabeledImage>>;
}

// ─── PairSource ───────────────────────────────────────────────────────────────
/// Any component that can load translation sentence pairs.
///
/// Implementations:
///   - TsvLoader → loads from a tab-separated text file
///   - (future) JsonLoader → loads from a JSON corpus
pub trait PairSource {
    /// Load up to `limit` pairs (all of them if `limit` is None).
    fn load_pairs(&self, limit: Option<usize>) -> Result<Vec<SentencePair>>;
}
