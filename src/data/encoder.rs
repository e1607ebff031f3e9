// ============================================================
// Layer 4 — Field Encoder
// ============================================================
// Replaces the symbols of one or more columns with ids.
//
//   per-position fields  unknown symbol → <UNK>
//   scalar fields        unknown symbol → decided by ScalarPolicy
//
// A column can be encoded once; a second attempt is an error
// rather than a silent double mapping. Datasets are consumed and
// handed back in the same order.

use serde::{Deserialize, Serialize};

use crate::data::dataset::{Column, RelationDataset};
use crate::domain::error::DataError;
use crate::domain::instance::Field;
use crate::domain::symbols::SymbolTable;

/// What to do with a scalar value (a label) that has no id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy", content = "id")]
pub enum ScalarPolicy {
    /// Stop with `DataError::UnknownSymbol`.
    #[default]
    Reject,
    /// Substitute the given id and log a warning.
    MapTo(u32),
}

fn encode_column(
    column: &Column,
    field: Field,
    table: &SymbolTable,
    policy: ScalarPolicy,
) -> Result<Column, DataError> {
    match column {
        Column::Symbols(rows) => Ok(Column::Ids(
            rows.iter()
                .map(|row| row.iter().map(|s| table.id_or_unk(s)).collect())
                .collect(),
        )),
        Column::ScalarSymbols(values) => {
            let mut ids = Vec::with_capacity(values.len());
            for (row, value) in values.iter().enumerate() {
                let id = match (table.get(value), policy) {
                    (Some(id), _) => id,
                    (None, ScalarPolicy::MapTo(fallback)) => {
                        tracing::warn!("Unknown {} '{}' at row {} mapped to {}", field, value, row, fallback);
                        fallback
                    }
                    (None, ScalarPolicy::Reject) => {
                        return Err(DataError::UnknownSymbol {
                            field,
                            symbol: value.clone(),
                            row,
                        })
                    }
                };
                ids.push(id);
            }
            Ok(Column::ScalarIds(ids))
        }
        Column::Ids(_) | Column::ScalarIds(_) => Err(DataError::AlreadyEncoded { field }),
    }
}

/// Encode the given fields of every dataset, each through its own table.
pub fn encode_fields(
    mut datasets: Vec<RelationDataset>,
    tables: &[(Field, &SymbolTable)],
    policy: ScalarPolicy,
) -> Result<Vec<RelationDataset>, DataError> {
    for d in datasets.iter_mut() {
        for &(field, table) in tables {
            let encoded = encode_column(d.column(field), field, table, policy)?;
            *d.column_mut(field) = encoded;
        }
    }
    Ok(datasets)
}

/// Encode the token column with the word vocabulary.
pub fn encode_words(
    datasets: Vec<RelationDataset>,
    vocab: &SymbolTable,
) -> Result<Vec<RelationDataset>, DataError> {
    encode_fields(datasets, &[(Field::Token, vocab)], ScalarPolicy::Reject)
}
