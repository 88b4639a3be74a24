// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles all cross-cutting concerns that don't belong in
// any specific business layer:
//
//   checkpoint.rs  — Saving and loading model weights
//                    Uses Burn's CompactRecorder to serialise
//                    model parameters to disk. Also saves/loads
//                    the training configs as JSON so inference
//                    can rebuild the exact architecture.
//
//   vocab_store.rs — Vocabulary persistence
//                    Writes the source/target character tables
//                    (plus sequence-length stats) as JSON next
//                    to the checkpoint. Ensures the exact same
//                    character ids are used for training and
//                    inference — a checkpoint is useless with a
//                    different vocabulary.
//
//   metrics.rs     — Training metrics logging
//                    Writes epoch-level metrics (loss, accuracy)
//                    to a CSV file for later analysis and
//                    plotting of learning curves.
//
// Why is this a separate layer?
//   These concerns are used by multiple other layers but
//   don't belong to any one of them. Keeping them here:
//   - Prevents duplication across layers
//   - Makes it easy to swap implementations
//     (e.g. swap file checkpoints for S3 cloud storage)
//   - Keeps other layers focused on their core logic
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint and config saving/loading
pub mod checkpoint;

/// Vocabulary bundle saving/loading
pub mod vocab_store;

/// Training metrics CSV logger
pub mod metrics;
