// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case wires the data and infra layers together for
// one command. No printing here (that's Layer 1) and no symbol
// or batching logic (that's Layer 4).

/// Corpus files → encoded dump with CV folds
pub mod preprocess_use_case;

/// Encoded dump → label key file
pub mod keys_use_case;

/// Encoded dump → batch statistics
pub mod inspect_use_case;
