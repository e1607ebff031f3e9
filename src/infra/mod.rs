// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-system concerns shared by the use cases:
//
//   store.rs — JSON persistence of vocabularies, encoded
//              datasets, CV folds and the preprocessing
//              config, plus the on-disk layout of a dump.

/// Dump layout and JSON persistence
pub mod store;
