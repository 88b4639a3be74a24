// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the data batchers.
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - Other layers are testable without a tensor backend
//   - The model architectures are clearly separated from
//     data loading and application logic
//
// What's in this layer:
//
//   mlp.rs        — The MLP digit classifier
//                   Two hidden Linear layers with ReLU and
//                   dropout, plus a 10-way output projection.
//                   Softmax lives inside the cross-entropy loss.
//
//   seq2seq.rs    — The encoder/decoder translation model
//                   An encoder LSTM compresses the source
//                   sentence into its final (hidden, cell)
//                   state; a decoder LSTM starts from that
//                   state and a Linear layer projects each
//                   decoder step to target-character logits.
//
//   trainer.rs    — The training loops
//                   Forward pass, loss, backward pass, Adam
//                   step, validation metrics, early stopping
//                   and best-checkpoint saving for both models.
//
//   translator.rs — The inference engine
//                   Loads a checkpoint, encodes the input once,
//                   then greedily decodes character by character
//                   until the stop sentinel or the length cap.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Sutskever et al. (2014) Sequence to Sequence Learning
//            Hochreiter & Schmidhuber (1997) LSTM

/// MLP classifier architecture
pub mod mlp;

/// Encoder/decoder LSTM architecture
pub mod seq2seq;

/// Training loops with validation, early stopping and checkpointing
pub mod trainer;

/// Inference engine — loads a checkpoint and decodes greedily
pub mod translator;

/// CPU backend used for validation and inference.
/// Training wraps it in Autodiff to track gradients.
pub type InferenceBackend = burn::backend::NdArray;

/// Backend used during training — same ndarray backend with
/// automatic differentiation enabled.
pub type TrainingBackend = burn::backend::Autodiff<InferenceBackend>;
