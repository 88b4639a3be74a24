// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Persists the character vocabularies next to the checkpoint.
//
// Why persist the vocabulary at all?
//   Character ids are positions in the vocabulary table. The
//   trained weights only make sense with the exact table they
//   were trained against — rebuild the table from a different
//   corpus and every one-hot row points at the wrong character.
//   So the table (plus the sequence-length stats inference
//   needs) is written once at training time and reloaded by
//   the translator.
//
// The file is plain JSON with the vocabularies as character
// arrays, so it can be inspected by eye.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::vocab::VocabBundle;

/// File name of the persisted vocabulary bundle
pub const VOCAB_FILE: &str = "vocab.json";

pub struct VocabStore {
    dir: PathBuf,
}

impl VocabStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            dir: PathBuf::from(dir.into()),
        }
    }

    /// Write the vocabulary bundle as pretty JSON
    pub fn save(&self, bundle: &VocabBundle) -> Result<()> {
        std::fs::create_dir_all(&self.dir).ok();
        let path = self.dir.join(VOCAB_FILE);

        let json = serde_json::to_string_pretty(bundle)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Cannot write vocabularies to '{}'", path.display()))?;

        tracing::info!(
            "Saved vocabularies ({} source chars, {} target chars) to '{}'",
            bundle.source.len(),
            bundle.target.len(),
            path.display()
        );
        Ok(())
    }

    /// Load a previously saved vocabulary bundle
    pub fn load(&self) -> Result<VocabBundle> {
        let path = self.dir.join(VOCAB_FILE);

        let json = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read vocabularies from '{}'. \
                 Have you run 'train-seq2seq' first?",
                path.display()
            )
        })?;

        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vocab::{wrap_target, CharVocab};

    #[test]
    fn test_bundle_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = VocabStore::new(dir.path().to_str().unwrap());

        let bundle = VocabBundle {
            source: CharVocab::build(["go home"]),
            target: CharVocab::build([wrap_target("va maison").as_str()]),
            max_source_len: 7,
            max_target_len: 11,
        };
        store.save(&bundle).unwrap();

        let back = store.load().unwrap();
        assert_eq!(back.source.len(), bundle.source.len());
        assert_eq!(back.target.id_of('v'), bundle.target.id_of('v'));
        assert_eq!(back.max_target_len, 11);
        assert!(back.target.start_id().is_some());
    }

    #[test]
    fn test_missing_file_is_helpful() {
        let dir = tempfile::tempdir().unwrap();
        let store = VocabStore::new(dir.path().to_str().unwrap());
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("train-seq2seq"));
    }
}
