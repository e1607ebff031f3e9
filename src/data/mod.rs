// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the parsed corpus files and padded id
// batches.
//
//   instance + label JSON files
//       │
//       ▼
//   JsonPathLoader    → raw sequences per instance
//       │
//       ▼
//   Preprocessor      → root markers, POS casing, shape checks
//       │
//       ▼
//   RelationDataset   → field-major symbolic columns
//       │
//       ▼
//   build_vocab       → word table from the training split
//       │
//       ▼
//   encode_fields     → symbols to ids, one field at a time
//       │
//       ▼
//   cv_splits         → repeated dev/test subsamples
//       │
//       ▼
//   BatchIterator     → padded, optionally corrupted batches
//
// Each step is tested on its own in its module.

/// Reads instance and label files
pub mod loader;

/// Turns raw sequences into instances with root markers
pub mod preprocessor;

/// Field-major symbolic and encoded datasets
pub mod dataset;

/// Frequency-based vocabulary construction
pub mod vocab;

/// Symbol → id encoding of dataset columns
pub mod encoder;

/// Dev/test cross-validation folds
pub mod splitter;

/// Padded batches over an encoded dataset
pub mod batcher;
