// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (training one of the models, or translating).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here beyond result summaries (Layer 1)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Think of this layer as the "director" — it tells other
// layers what to do but doesn't do the work itself.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The classifier training workflow
pub mod train_mlp_use_case;

// The translator training workflow
pub mod train_seq2seq_use_case;

// The translation inference workflow
pub mod translate_use_case;
