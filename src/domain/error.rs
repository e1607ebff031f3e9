// ============================================================
// Layer 3 — Data Errors
// ============================================================
// Every recoverable failure of the data pipeline is one variant
// here. The application layer wraps these in anyhow with file
// context; tests match on the variants directly.

use crate::domain::instance::Field;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("instance file has {instances} entries but label file has {labels}")]
    CountMismatch { instances: usize, labels: usize },

    #[error("instance {index} has {found} parallel sequences, expected {expected}")]
    MissingSequences { index: usize, found: usize, expected: usize },

    #[error("instance {index}: {field} has length {found}, expected {expected}")]
    RaggedInstance { index: usize, field: &'static str, found: usize, expected: usize },

    #[error("{field} column is already encoded")]
    AlreadyEncoded { field: Field },

    #[error("{field} column has not been encoded")]
    NotEncoded { field: Field },

    #[error("unknown {field} symbol '{symbol}' at row {row}")]
    UnknownSymbol { field: Field, symbol: String, row: usize },

    #[error("row {row}: {field} length {len} exceeds pad length {pad_len}")]
    PadOverflow { row: usize, field: Field, len: usize, pad_len: usize },

    #[error("label id {0} has no display label")]
    UnknownLabelId(u32),

    #[error("dataset columns disagree: {field} has {found} rows, expected {expected}")]
    ColumnLength { field: Field, found: usize, expected: usize },

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
