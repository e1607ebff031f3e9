// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe the relation extraction data:
// what an instance is, which fields it carries, how symbols map
// to ids, and which fixed tables each corpus ships with.
//
// Rules for this layer:
//   - NO file I/O
//   - NO randomness
//   - Only structs, enums, traits and static tables
//
// Everything above this layer (data, infra, application) speaks
// in these types.

// Field names, raw and prepared instances
pub mod instance;

// Symbol → id tables with reserved PAD / UNK ids
pub mod symbols;

// Per-corpus fixed tables (TACRED, KBP, NYT)
pub mod corpus;

// Error kinds raised by the data pipeline
pub mod error;

// Core abstractions other layers implement
pub mod traits;
