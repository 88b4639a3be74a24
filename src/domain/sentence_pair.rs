// ============================================================
// Layer 3 — Sentence Pair Domain Type
// ============================================================
// Represents a single translation example in domain terms:
// a source-language sentence and its target-language rendering.
// This is the raw material of sequence-to-sequence learning —
// the model reads the source one character at a time and learns
// to emit the target one character at a time.
//
// Character-level means no word segmentation is needed: the
// vocabulary is just the set of characters seen in the corpus,
// which keeps the data pipeline tiny.
//
// Reference: Sutskever et al. (2014) Sequence to Sequence Learning
//            Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// A source/target sentence pair as read from the corpus,
/// before any vocabulary lookup or sentinel wrapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentencePair {
    /// The sentence in the source language (what the encoder reads)
    pub source: String,

    /// The sentence in the target language (what the decoder emits)
    pub target: String,
}

impl SentencePair {
    /// Create a new SentencePair.
    /// Uses impl Into<String> so callers can pass &str or String —
    /// this is idiomatic Rust for flexible string arguments.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_str_and_string() {
        let pair = SentencePair::new("Go.", String::from("Va !"));
        assert_eq!(pair.source, "Go.");
        assert_eq!(pair.target, "Va !");
    }
}
