// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Walks an encoded dump exactly as a training loop would (all
// full batches, then the residual) and summarises what it saw.
// Useful for checking a pad length or unk probability before
// a long run.

use anyhow::{bail, Context, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

use crate::data::{
    batcher::{Batch, BatchIterator, BatchOptions},
    dataset::EncodedDataset,
    loader::MAX_SEQ_LEN,
};
use crate::domain::corpus::{CorpusKind, CorpusTables};
use crate::domain::instance::Field;
use crate::domain::symbols::UNK_ID;
use crate::domain::traits::Persistable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectConfig {
    /// Encoded dataset to batch.
    pub dump:       PathBuf,
    pub batch_size: usize,
    /// Rows longer than this make the inspection fail up front.
    pub pad_len:    usize,
    /// Word dropout probability, as a trainer would use it.
    pub unk_prob:   f64,
    pub shuffle:    bool,
    pub seed:       u64,
    /// Report label names of this corpus instead of ids.
    pub corpus:     Option<CorpusKind>,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            dump:       PathBuf::from("data/TACRED/dependency/train.id"),
            batch_size: 50,
            pad_len:    MAX_SEQ_LEN,
            unk_prob:   0.0,
            shuffle:    true,
            seed:       1234,
            corpus:     None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InspectReport {
    pub examples:      usize,
    pub full_batches:  usize,
    /// Rows after the last full batch.
    pub residual:      usize,
    /// Longest unpadded row.
    pub longest:       usize,
    /// Pad length every batch was built with.
    pub pad_len:       usize,
    /// Real (unpadded) token positions seen.
    pub tokens:        usize,
    /// Of those, positions that came out as UNK.
    pub unk_tokens:    usize,
    /// Label (name when a corpus is given, else id) → count.
    pub labels:        BTreeMap<String, usize>,
}

pub struct InspectUseCase {
    config: InspectConfig,
}

impl InspectUseCase {
    pub fn new(config: InspectConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<InspectReport> {
        let cfg = &self.config;
        let dataset = EncodedDataset::load(&cfg.dump)?;

        let longest = dataset.iter().map(|row| row.len()).max().unwrap_or(0);
        let too_long = dataset.iter().filter(|row| row.len() > cfg.pad_len).count();
        if too_long > 0 {
            bail!(
                "{} of {} rows in '{}' are longer than pad length {} (longest is {})",
                too_long,
                Dataset::len(&dataset),
                cfg.dump.display(),
                cfg.pad_len,
                longest
            );
        }

        let options = BatchOptions {
            shuffle:   cfg.shuffle,
            subsample: 1.0,
            unk_prob:  cfg.unk_prob,
            seed:      cfg.seed,
        };
        let mut iterator = BatchIterator::new(dataset, cfg.batch_size, cfg.pad_len, options)
            .with_context(|| format!("Cannot batch '{}'", cfg.dump.display()))?;

        let names = cfg
            .corpus
            .map(|kind| CorpusTables::for_corpus(kind).label.id_to_symbol());
        let mut report = InspectReport {
            examples: iterator.num_examples(),
            full_batches: iterator.num_batches(),
            residual: iterator.num_residual(),
            longest,
            pad_len: iterator.pad_len(),
            ..InspectReport::default()
        };

        let mut tally = |batch: &Batch| {
            let tokens = batch.field(Field::Token).unwrap_or(&[]);
            for (row, &len) in tokens.iter().zip(&batch.lengths) {
                report.tokens += len;
                report.unk_tokens += row[..len].iter().filter(|&&t| t == UNK_ID).count();
            }
            for &label in &batch.labels {
                let key = names
                    .as_ref()
                    .and_then(|n| n.get(&label).cloned())
                    .unwrap_or_else(|| label.to_string());
                *report.labels.entry(key).or_default() += 1;
            }
        };

        for batch in iterator.by_ref() {
            tally(&batch?);
        }
        tally(&iterator.get_residual()?);

        tracing::debug!("Inspected {} examples from '{}'", report.examples, cfg.dump.display());
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::EncodedInstance;

    fn dump(dir: &std::path::Path, lens: &[usize]) -> PathBuf {
        let d = EncodedDataset::from_instances(lens.iter().map(|&n| EncodedInstance {
            tokens: vec![5; n],
            pos:    vec![2; n],
            deprel: vec![2; n],
            root:   vec![2; n],
            label:  (n % 2) as u32,
        }));
        let path = dir.join("train.id");
        d.save(&path).unwrap();
        path
    }

    #[test]
    fn test_counts_every_row_once() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = InspectConfig {
            dump: dump(dir.path(), &[1, 2, 3, 4, 5]),
            batch_size: 2,
            pad_len: 5,
            corpus: Some(CorpusKind::Tacred),
            ..InspectConfig::default()
        };
        let report = InspectUseCase::new(cfg).execute().unwrap();
        assert_eq!(report.examples, 5);
        assert_eq!(report.full_batches, 2);
        assert_eq!(report.residual, 1);
        assert_eq!(report.longest, 5);
        assert_eq!(report.pad_len, 5);
        assert_eq!(report.tokens, 15);
        assert_eq!(report.unk_tokens, 0);
        assert_eq!(report.labels.values().sum::<usize>(), 5);
        assert_eq!(report.labels.get("no_relation"), Some(&2));
    }

    #[test]
    fn test_full_dropout_counts_unk() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = InspectConfig {
            dump: dump(dir.path(), &[3, 3]),
            batch_size: 1,
            pad_len: 3,
            unk_prob: 1.0,
            ..InspectConfig::default()
        };
        let report = InspectUseCase::new(cfg).execute().unwrap();
        assert_eq!(report.unk_tokens, 6);
        assert_eq!(report.labels.get("1"), Some(&2));
    }

    #[test]
    fn test_pad_len_too_short() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = InspectConfig {
            dump: dump(dir.path(), &[4]),
            batch_size: 1,
            pad_len: 3,
            ..InspectConfig::default()
        };
        assert!(InspectUseCase::new(cfg).execute().is_err());
    }
}
