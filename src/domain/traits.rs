// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits rather
// than against concrete loaders or file formats:
//   - JsonPathLoader implements InstanceSource
//   - SymbolTable and EncodedDataset implement Persistable

use std::path::Path;

use anyhow::Result;

use crate::domain::instance::RawInstance;

// ─── InstanceSource ───────────────────────────────────────────────────────────
/// Anything that can produce raw relation instances, paired with
/// their labels, in a stable order.
pub trait InstanceSource {
    /// Human readable origin, used in log lines.
    fn describe(&self) -> String;

    fn load_raw(&self) -> Result<Vec<RawInstance>>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any artifact whose state can be written to and restored from disk.
pub trait Persistable: Sized {
    fn save(&self, path: &Path) -> Result<()>;

    fn load(path: &Path) -> Result<Self>;
}
