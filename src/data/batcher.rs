// ============================================================
// Layer 4 — Batch Iterator
// ============================================================
// Feeds an encoded dataset to the training loop in fixed-size,
// right-padded batches.
//
//   dataset rows   [5 9 3]  [7 2]  [4 4 4 8]
//   pad_len 5      [5 9 3 0 0]
//                  [7 2 0 0 0]
//                  [4 4 4 8 0]
//   lengths        [3, 2, 4]
//
// The iterator owns a read pointer that only moves forward; a
// new epoch starts with reset_pointer(). It never wraps around:
// calls past the end return shorter or empty batches, and the
// leftover rows after the last full batch are fetched with
// get_residual().
//
// Word dropout: with unk_prob > 0 each non-UNK token id is
// replaced by UNK with that probability, freshly on every call.
// Only the token field is corrupted and lengths never change.

use anyhow::{Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::data::dataset::EncodedDataset;
use crate::domain::error::DataError;
use crate::domain::instance::Field;
use crate::domain::symbols::{PAD_ID, UNK_ID};

/// Construction-time options of a BatchIterator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Shuffle rows once at construction.
    pub shuffle:   bool,
    /// Keep only this fraction of rows, in (0, 1].
    pub subsample: f64,
    /// Per-token probability of replacing a word with UNK.
    pub unk_prob:  f64,
    pub seed:      u64,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            shuffle:   true,
            subsample: 1.0,
            unk_prob:  0.0,
            seed:      1234,
        }
    }
}

/// One padded batch, keyed by input field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Word ids, possibly with some replaced by UNK.
    pub token:   Vec<Vec<u32>>,
    /// POS tag ids.
    pub pos:     Vec<Vec<u32>>,
    /// Dependency relation ids.
    pub deprel:  Vec<Vec<u32>>,
    /// Root marker ids (`_` or `ROOT`).
    pub root:    Vec<Vec<u32>>,
    /// One relation id per row.
    pub labels:  Vec<u32>,
    /// Unpadded length of every row.
    pub lengths: Vec<usize>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Padded rows of an input field; `None` for the label.
    pub fn field(&self, field: Field) -> Option<&[Vec<u32>]> {
        match field {
            Field::Token => Some(&self.token),
            Field::Pos => Some(&self.pos),
            Field::Deprel => Some(&self.deprel),
            Field::Root => Some(&self.root),
            Field::Label => None,
        }
    }

    fn field_mut(&mut self, field: Field) -> Option<&mut Vec<Vec<u32>>> {
        match field {
            Field::Token => Some(&mut self.token),
            Field::Pos => Some(&mut self.pos),
            Field::Deprel => Some(&mut self.deprel),
            Field::Root => Some(&mut self.root),
            Field::Label => None,
        }
    }
}

pub struct BatchIterator {
    dataset:    EncodedDataset,
    batch_size: usize,
    /// Every input row is right-padded to this length.
    pad_len:    usize,
    unk_prob:   f64,
    /// Index of the next row to hand out.
    pointer:    usize,
    /// Drives the construction-time shuffle and word dropout.
    rng:        StdRng,
}

impl BatchIterator {
    pub fn new(
        mut dataset: EncodedDataset,
        batch_size: usize,
        pad_len: usize,
        options: BatchOptions,
    ) -> Result<Self, DataError> {
        if batch_size == 0 {
            return Err(DataError::InvalidParameter {
                name:   "batch size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(options.subsample > 0.0 && options.subsample <= 1.0) {
            return Err(DataError::InvalidParameter {
                name:   "subsample",
                reason: format!("{} is outside (0, 1]", options.subsample),
            });
        }
        if !(0.0..=1.0).contains(&options.unk_prob) {
            return Err(DataError::InvalidParameter {
                name:   "unk probability",
                reason: format!("{} is outside [0, 1]", options.unk_prob),
            });
        }
        dataset.validate()?;

        let mut rng = StdRng::seed_from_u64(options.seed);
        if options.shuffle {
            dataset.shuffle(&mut rng);
        }
        if options.subsample < 1.0 {
            let keep = (options.subsample * dataset.len() as f64) as usize;
            dataset.truncate(keep);
        }

        tracing::debug!(
            "Batch iterator over {} examples: batch_size={}, pad_len={}, unk_prob={}",
            dataset.len(),
            batch_size,
            pad_len,
            options.unk_prob
        );

        Ok(Self {
            dataset,
            batch_size,
            pad_len,
            unk_prob: options.unk_prob,
            pointer: 0,
            rng,
        })
    }

    pub fn num_examples(&self) -> usize {
        self.dataset.len()
    }

    /// Number of full batches.
    pub fn num_batches(&self) -> usize {
        self.num_examples() / self.batch_size
    }

    /// Rows left over after the full batches.
    pub fn num_residual(&self) -> usize {
        self.num_examples() - self.batch_size * self.num_batches()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn pad_len(&self) -> usize {
        self.pad_len
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// The next `batch_size` rows. The pointer advances even when a row
    /// overflows `pad_len`, so a failing batch is not retried forever.
    pub fn next_batch(&mut self) -> Result<Batch, DataError> {
        let start = self.pointer;
        let end = start.saturating_add(self.batch_size);
        self.pointer = end;
        self.build(start, end)
    }

    /// Rows from the pointer to the end. Does not move the pointer.
    pub fn get_residual(&mut self) -> Result<Batch, DataError> {
        self.build(self.pointer, self.num_examples())
    }

    /// Rewind to the first row for a new epoch; order is kept.
    pub fn reset_pointer(&mut self) {
        self.pointer = 0;
    }

    fn build(&mut self, start: usize, end: usize) -> Result<Batch, DataError> {
        let len = self.num_examples();
        let (start, end) = (start.min(len), end.min(len));
        let mut batch = Batch::default();

        for field in Field::INPUTS {
            let rows = &self.dataset.sequences(field).unwrap_or(&[])[start..end];
            let mut padded = Vec::with_capacity(rows.len());

            for (offset, row) in rows.iter().enumerate() {
                if row.len() > self.pad_len {
                    return Err(DataError::PadOverflow {
                        row: start + offset,
                        field,
                        len: row.len(),
                        pad_len: self.pad_len,
                    });
                }
                let mut tokens = if field == Field::Token && self.unk_prob > 0.0 {
                    corrupt_sentence(row, self.unk_prob, &mut self.rng)
                } else {
                    row.clone()
                };
                if field == Field::Token {
                    batch.lengths.push(tokens.len());
                }
                tokens.resize(self.pad_len, PAD_ID);
                padded.push(tokens);
            }

            if let Some(slot) = batch.field_mut(field) {
                *slot = padded;
            }
        }

        batch.labels = self.dataset.labels()[start..end].to_vec();
        Ok(batch)
    }

    /// Write the label of every row covered by full batches (or every row
    /// with `include_residual`) to `path`, one per line.
    pub fn write_keys(
        &self,
        path: &Path,
        id_to_label: Option<&HashMap<u32, String>>,
        include_residual: bool,
    ) -> Result<()> {
        let end = if include_residual {
            self.num_examples()
        } else {
            self.num_batches() * self.batch_size
        };

        let mut keys = Vec::with_capacity(end);
        for &id in &self.dataset.labels()[..end] {
            let key = match id_to_label {
                Some(names) => names.get(&id).cloned().ok_or(DataError::UnknownLabelId(id))?,
                None => id.to_string(),
            };
            keys.push(key);
        }

        let file = File::create(path)
            .with_context(|| format!("Cannot create key file '{}'", path.display()))?;
        let mut out = BufWriter::new(file);
        for key in &keys {
            writeln!(out, "{key}")?;
        }
        out.flush()
            .with_context(|| format!("Cannot write key file '{}'", path.display()))?;

        tracing::debug!("Wrote {} keys to '{}'", keys.len(), path.display());
        Ok(())
    }
}

/// Replace each non-UNK id with UNK with probability `unk_prob`.
pub fn corrupt_sentence<R: Rng + ?Sized>(tokens: &[u32], unk_prob: f64, rng: &mut R) -> Vec<u32> {
    tokens
        .iter()
        .map(|&t| {
            if t != UNK_ID && rng.gen::<f64>() < unk_prob {
                UNK_ID
            } else {
                t
            }
        })
        .collect()
}

/// Yields the remaining full batches; use `get_residual` for the rest.
impl Iterator for BatchIterator {
    type Item = Result<Batch, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pointer.saturating_add(self.batch_size) > self.num_examples() {
            return None;
        }
        Some(self.next_batch())
    }
}
