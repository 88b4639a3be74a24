// ============================================================
// Layer 4 — Character Vocabulary
// ============================================================
// Character-level modelling needs a table mapping each character
// the corpus contains to a small integer id, and back. Source
// and target languages get separate tables because their
// alphabets differ (accents, punctuation).
//
// Three ids are special:
//   - id 0 is the padding sentinel. It never corresponds to a
//     real character; batch positions past the end of a sentence
//     carry it, and the loss masks it out.
//   - the tab character '\t' marks start-of-sequence. Every
//     target sentence is wrapped so the decoder's first input
//     is always the start sentinel.
//   - the newline character '\n' marks end-of-sequence. The
//     decoder learns to emit it when the sentence is finished,
//     and greedy decoding stops on it.
//
// Characters are collected into a BTreeSet before numbering, so
// the same corpus always produces the same vocabulary — ids are
// stable across runs, which checkpoint reuse depends on.
//
// Reference: Rust Book §8 (HashMaps), serde documentation

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Id reserved for padding in every vocabulary
pub const PAD_ID: usize = 0;
/// Placeholder character stored at index 0 — never emitted
const PAD_CHAR: char = '\0';
/// Start-of-sequence sentinel (prepended to every target)
pub const START_CHAR: char = '\t';
/// End-of-sequence sentinel (appended to every target)
pub const STOP_CHAR: char = '\n';

/// Wrap a raw target sentence in the start/stop sentinels.
/// "Va !" → "\tVa !\n"
pub fn wrap_target(text: &str) -> String {
    format!("{START_CHAR}{text}{STOP_CHAR}")
}

/// A character → id table with a reserved pad slot at index 0.
///
/// Serialises as a plain JSON array of characters — the id of a
/// character is simply its position in the array, so the file
/// stays human-readable and the lookup map is rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<char>", into = "Vec<char>")]
pub struct CharVocab {
    /// id → character (index 0 is the pad placeholder)
    chars: Vec<char>,
    /// character → id, rebuilt from `chars`
    index: HashMap<char, usize>,
}

impl CharVocab {
    /// Build a vocabulary from a corpus of texts.
    /// Characters are sorted for determinism; the pad placeholder
    /// always occupies index 0.
    pub fn build<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let seen: BTreeSet<char> = texts.into_iter().flat_map(|t| t.chars()).collect();
        let chars: Vec<char> = std::iter::once(PAD_CHAR)
            .chain(seen.into_iter().filter(|&c| c != PAD_CHAR))
            .collect();
        Self::from_chars(chars)
    }

    fn from_chars(chars: Vec<char>) -> Self {
        let index = chars
            .iter()
            .enumerate()
            .map(|(id, &c)| (c, id))
            .collect();
        Self { chars, index }
    }

    /// Number of ids, pad slot included — this is the one-hot width
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Look up the id of a character, if the corpus contained it
    pub fn id_of(&self, c: char) -> Option<usize> {
        self.index.get(&c).copied()
    }

    /// Look up the character behind an id
    pub fn char_of(&self, id: usize) -> Option<char> {
        self.chars.get(id).copied()
    }

    /// Id of the start-of-sequence sentinel, if present (target vocab)
    pub fn start_id(&self) -> Option<usize> {
        self.id_of(START_CHAR)
    }

    /// Id of the end-of-sequence sentinel, if present (target vocab)
    pub fn stop_id(&self) -> Option<usize> {
        self.id_of(STOP_CHAR)
    }

    /// Encode a text to ids, silently dropping characters the
    /// vocabulary does not know. During training every character
    /// is known by construction; at inference time unknown input
    /// is better skipped than fatal.
    pub fn encode(&self, text: &str) -> Vec<usize> {
        text.chars().filter_map(|c| self.id_of(c)).collect()
    }
}

impl From<Vec<char>> for CharVocab {
    fn from(chars: Vec<char>) -> Self {
        Self::from_chars(chars)
    }
}

impl From<CharVocab> for Vec<char> {
    fn from(vocab: CharVocab) -> Self {
        vocab.chars
    }
}

/// Everything inference needs to rebuild the text pipeline:
/// both vocabularies plus the sequence-length statistics observed
/// at training time. The max target length doubles as the hard
/// cap on greedy decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabBundle {
    pub source: CharVocab,
    pub target: CharVocab,
    /// Longest source sentence in the training corpus (chars)
    pub max_source_len: usize,
    /// Longest wrapped target in the corpus (chars, sentinels included)
    pub max_target_len: usize,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_slot_reserved() {
        let vocab = CharVocab::build(["ba"]);
        assert_eq!(vocab.char_of(PAD_ID), Some(PAD_CHAR));
        // 'a' and 'b' follow the pad slot in sorted order
        assert_eq!(vocab.id_of('a'), Some(1));
        assert_eq!(vocab.id_of('b'), Some(2));
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_deterministic_across_text_order() {
        let a = CharVocab::build(["abc", "xyz"]);
        let b = CharVocab::build(["xyz", "abc"]);
        for c in "abcxyz".chars() {
            assert_eq!(a.id_of(c), b.id_of(c));
        }
    }

    #[test]
    fn test_sentinels_present_after_wrapping() {
        let wrapped = wrap_target("Va !");
        let vocab = CharVocab::build([wrapped.as_str()]);
        assert!(vocab.start_id().is_some());
        assert!(vocab.stop_id().is_some());
        assert_ne!(vocab.start_id(), vocab.stop_id());
    }

    #[test]
    fn test_encode_skips_unknown() {
        let vocab = CharVocab::build(["abc"]);
        let ids = vocab.encode("aZc");
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], vocab.id_of('a').unwrap());
        assert_eq!(ids[1], vocab.id_of('c').unwrap());
    }

    #[test]
    fn test_roundtrip_through_json() {
        let vocab = CharVocab::build([wrap_target("héllo").as_str()]);
        let json = serde_json::to_string(&vocab).unwrap();
        let back: CharVocab = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), vocab.len());
        assert_eq!(back.id_of('é'), vocab.id_of('é'));
        assert_eq!(back.stop_id(), vocab.stop_id());
    }
}
