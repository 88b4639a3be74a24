// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw files on disk
// all the way to tensor batches ready for the model.
//
// The classifier pipeline flows in this order:
//
//   MNIST IDX files
//       │
//       ▼
//   IdxLoader         → validates headers, normalises pixels to [0,1],
//       │               flattens 28×28 → 784
//       ▼
//   split_train_val   → seeded shuffle + train/validation split
//       │
//       ▼
//   MnistDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   MnistBatcher      → stacks samples into [batch, 784] tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// The translator pipeline adds a vocabulary step:
//
//   pairs file (TSV)
//       │
//       ▼
//   TsvLoader         → reads "source<TAB>target" lines
//       │
//       ▼
//   CharVocab         → per-language character → id tables,
//       │               pad/start/stop sentinels
//       ▼
//   TranslationDataset → encoded id sequences per pair
//       │
//       ▼
//   Seq2SeqBatcher    → pads per batch, one-hot encodes,
//       │               builds teacher-forcing inputs/targets
//       ▼
//   DataLoader
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Loads the MNIST IDX binary image/label files
pub mod idx;

/// Loads tab-separated sentence pairs
pub mod tsv;

/// Character vocabularies with pad/start/stop sentinels
pub mod vocab;

/// Implements Burn's Dataset trait for both workflows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
