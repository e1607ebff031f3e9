// ============================================================
// Layer 2 — KeysUseCase
// ============================================================
// Writes the gold label of every example an evaluation run will
// see, in batch order, one per line. Scorers compare predictions
// against this file.
//
//   Step 1: Load the encoded dump     (Layer 6 - infra)
//   Step 2: Build an ordered iterator (Layer 4 - data)
//   Step 3: Write the keys            (Layer 4 - data)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    batcher::{BatchIterator, BatchOptions},
    dataset::EncodedDataset,
    loader::MAX_SEQ_LEN,
};
use crate::domain::corpus::{CorpusKind, CorpusTables};
use crate::domain::traits::Persistable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Encoded dataset to read.
    pub dump:             PathBuf,
    /// Key file to write.
    pub output:           PathBuf,
    /// Must match the evaluation batch size, since only full
    /// batches are covered unless `include_residual` is set.
    pub batch_size:       usize,
    pub include_residual: bool,
    /// Write label names of this corpus instead of raw ids.
    pub corpus:           Option<CorpusKind>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            dump:             PathBuf::from("data/TACRED/dependency/test.id"),
            output:           PathBuf::from("keys.txt"),
            batch_size:       50,
            include_residual: false,
            corpus:           None,
        }
    }
}

pub struct KeysUseCase {
    config: KeysConfig,
}

impl KeysUseCase {
    pub fn new(config: KeysConfig) -> Self {
        Self { config }
    }

    /// Returns the number of keys written.
    pub fn execute(&self) -> Result<usize> {
        let cfg = &self.config;

        let dataset = EncodedDataset::load(&cfg.dump)?;
        let options = BatchOptions { shuffle: false, ..BatchOptions::default() };
        // keys never pad, so any pad length will do
        let iterator = BatchIterator::new(dataset, cfg.batch_size, MAX_SEQ_LEN, options)
            .with_context(|| format!("Cannot batch '{}'", cfg.dump.display()))?;

        let names = cfg
            .corpus
            .map(|kind| CorpusTables::for_corpus(kind).label.id_to_symbol());
        iterator.write_keys(&cfg.output, names.as_ref(), cfg.include_residual)?;

        let written = if cfg.include_residual {
            iterator.num_examples()
        } else {
            iterator.num_batches() * iterator.batch_size()
        };
        tracing::info!("Wrote {} keys to '{}'", written, cfg.output.display());
        Ok(written)
    }
}
