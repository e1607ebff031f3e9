// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Reads the two JSON files that describe one split:
//
//   train.json        [[tokens, pos, deprel, directions], ...]
//   train_label.json  ["per:title", "no_relation", ...]
//
// and produces a field-major RelationDataset.
//
// Instances whose token sequence is as long as or longer than the
// configured maximum are dropped; the rest keep their input order.
// Direction codes may appear as JSON strings or integers.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::data::dataset::RelationDataset;
use crate::data::preprocessor::Preprocessor;
use crate::domain::error::DataError;
use crate::domain::instance::RawInstance;
use crate::domain::traits::InstanceSource;

/// Number of parallel sequences every instance tuple must carry.
pub const SEQUENCES_PER_INSTANCE: usize = 4;

/// Default upper bound (exclusive) on path length.
pub const MAX_SEQ_LEN: usize = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawSymbol {
    Text(String),
    Int(i64),
}

impl From<RawSymbol> for String {
    fn from(s: RawSymbol) -> Self {
        match s {
            RawSymbol::Text(t) => t,
            RawSymbol::Int(i) => i.to_string(),
        }
    }
}

fn into_strings(seq: Vec<RawSymbol>) -> Vec<String> {
    seq.into_iter().map(String::from).collect()
}

/// Loads one split from an instance file and a parallel label file.
pub struct JsonPathLoader {
    instances: PathBuf,
    labels:    PathBuf,
}

impl JsonPathLoader {
    pub fn new(instances: impl Into<PathBuf>, labels: impl Into<PathBuf>) -> Self {
        Self { instances: instances.into(), labels: labels.into() }
    }
}

impl InstanceSource for JsonPathLoader {
    fn describe(&self) -> String {
        self.instances.display().to_string()
    }

    fn load_raw(&self) -> Result<Vec<RawInstance>> {
        let text = fs::read_to_string(&self.instances)
            .with_context(|| format!("Cannot read instances '{}'", self.instances.display()))?;
        let tuples: Vec<Vec<Vec<RawSymbol>>> = serde_json::from_str(&text)
            .with_context(|| format!("Malformed instance JSON in '{}'", self.instances.display()))?;

        let text = fs::read_to_string(&self.labels)
            .with_context(|| format!("Cannot read labels '{}'", self.labels.display()))?;
        let labels: Vec<String> = serde_json::from_str(&text)
            .with_context(|| format!("Malformed label JSON in '{}'", self.labels.display()))?;

        if tuples.len() != labels.len() {
            return Err(DataError::CountMismatch {
                instances: tuples.len(),
                labels:    labels.len(),
            }
            .into());
        }

        let mut raw = Vec::with_capacity(tuples.len());
        for (index, (tuple, label)) in tuples.into_iter().zip(labels).enumerate() {
            if tuple.len() < SEQUENCES_PER_INSTANCE {
                return Err(DataError::MissingSequences {
                    index,
                    found: tuple.len(),
                    expected: SEQUENCES_PER_INSTANCE,
                }
                .into());
            }
            let mut seqs = tuple.into_iter();
            // Length was checked above; extra sequences are ignored.
            let mut next = || seqs.next().map(into_strings).unwrap_or_default();
            raw.push(RawInstance {
                tokens:     next(),
                pos:        next(),
                deprel:     next(),
                directions: next(),
                label,
            });
        }
        Ok(raw)
    }
}

/// Load, filter by length, and prepare every instance of `source`.
pub fn load_dataset(source: &impl InstanceSource, max_len: usize) -> Result<RelationDataset> {
    let raw = source.load_raw()?;
    let total = raw.len();
    tracing::info!("Filtering sequences of length >= {} in {}", max_len, source.describe());

    let preprocessor = Preprocessor::new();
    let mut dataset = RelationDataset::default();
    let mut fallbacks = 0usize;
    let mut rootless = 0usize;

    for (index, instance) in raw.into_iter().enumerate() {
        if instance.tokens.len() >= max_len {
            continue;
        }
        let (prepared, fallback) = preprocessor.prepare(index, instance)?;
        if fallback {
            fallbacks += 1;
        }
        if prepared.root_position().is_none() {
            rootless += 1;
        }
        dataset.push(prepared)?;
    }

    if fallbacks > 0 {
        tracing::warn!(
            "{} instances in {} had no non-sentinel direction; root marked at position 0",
            fallbacks,
            source.describe()
        );
    }
    if rootless > 0 {
        tracing::debug!("{} empty paths in {} carry no root marker", rootless, source.describe());
    }
    tracing::info!(
        "{} examples in {} ({} filtered)",
        dataset.len(),
        source.describe(),
        total - dataset.len()
    );
    Ok(dataset)
}
