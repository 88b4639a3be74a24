// ============================================================
// Layer 2 — Translate Use Case
// ============================================================
// The inference workflow: everything a translation needs lives
// in the checkpoint directory (weights, config, vocabularies),
// so the use case is built from that one path and the training
// corpus is not required at all.

use anyhow::Result;

use crate::infra::checkpoint::CheckpointManager;
use crate::infra::vocab_store::VocabStore;
use crate::ml::translator::Translator;

pub struct TranslateUseCase {
    translator: Translator,
}

impl TranslateUseCase {
    pub fn new(checkpoint_dir: String) -> Result<Self> {
        let ckpt_manager = CheckpointManager::new(checkpoint_dir.clone());
        let vocab_store = VocabStore::new(checkpoint_dir);
        let translator = Translator::from_checkpoint(&ckpt_manager, &vocab_store)?;
        Ok(Self { translator })
    }

    /// Greedily decode the translation of one sentence.
    pub fn translate(&self, text: &str) -> Result<String> {
        tracing::debug!("Translating: '{}'", text);
        self.translator.translate(text)
    }
}
