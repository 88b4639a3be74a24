// ============================================================
// Layer 4 — Sentence Pair Loader
// ============================================================
// Loads translation pairs from a tab-separated text file in the
// common "Tatoeba export" layout:
//
//   Go.<TAB>Va !<TAB>CC-BY 2.0 (France) Attribution: ...
//
// Only the first two columns matter — the source sentence and
// its translation. Anything after the second tab (attribution,
// ids) is ignored. Lines without a tab are skipped with a
// warning rather than failing the whole load, so a slightly
// messy corpus still trains.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §13 (Iterators and Closures)

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::domain::sentence_pair::SentencePair;
use crate::domain::traits::PairSource;

/// Loads sentence pairs from a single tab-separated file.
/// Implements the PairSource trait from Layer 3.
pub struct TsvLoader {
    /// Path to the pairs file
    path: PathBuf,
}

impl TsvLoader {
    /// Create a new TsvLoader pointed at a pairs file
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: PathBuf::from(path.into()),
        }
    }
}

impl PairSource for TsvLoader {
    fn load_pairs(&self, limit: Option<usize>) -> Result<Vec<SentencePair>> {
        let text = std::fs::read_to_string(&self.path).with_context(|| {
            format!("Cannot read sentence-pair file '{}'", self.path.display())
        })?;

        let mut pairs = Vec::new();
        let mut skipped = 0usize;

        for line in text.lines() {
            if let Some(limit) = limit {
                if pairs.len() >= limit {
                    break;
                }
            }

            // Empty lines are silently fine; lines without a tab are not
            if line.is_empty() {
                continue;
            }

            let mut columns = line.split('\t');
            match (columns.next(), columns.next()) {
                (Some(source), Some(target)) if !source.is_empty() => {
                    pairs.push(SentencePair::new(source, target));
                }
                _ => {
                    skipped += 1;
                    tracing::warn!("Skipping malformed line: '{}'", line);
                }
            }
        }

        if pairs.is_empty() {
            bail!(
                "No usable sentence pairs found in '{}'",
                self.path.display()
            );
        }

        tracing::info!(
            "Loaded {} sentence pairs from '{}' ({} lines skipped)",
            pairs.len(),
            self.path.display(),
            skipped
        );
        Ok(pairs)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn write_corpus(content: &str) -> (tempfile::TempDir, TsvLoader) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.txt");
        std::fs::write(&path, content).unwrap();
        let loader = TsvLoader::new(path.to_str().unwrap());
        (dir, loader)
    }

    #[test]
    fn test_loads_first_two_columns() {
        let (_dir, loader) = write_corpus("Go.\tVa !\tattribution here\nHi.\tSalut !\n");
        let pairs = loader.load_pairs(None).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].source, "Go.");
        assert_eq!(pairs[0].target, "Va !");
        assert_eq!(pairs[1].target, "Salut !");
    }

    #[test]
    fn test_limit_caps_pair_count() {
        let (_dir, loader) = write_corpus("a\tb\nc\td\ne\tf\n");
        let pairs = loader.load_pairs(Some(2)).unwrap();
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let (_dir, loader) = write_corpus("no tab here\nGo.\tVa !\n");
        let pairs = loader.load_pairs(None).unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let (_dir, loader) = write_corpus("only garbage\n");
        assert!(loader.load_pairs(None).is_err());
    }
}
