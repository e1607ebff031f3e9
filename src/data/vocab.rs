// ============================================================
// Layer 4 — Vocabulary Builder
// ============================================================
// Counts token frequencies over one or more symbolic datasets
// and turns them into a SymbolTable:
//
//   MinCount(n)  keep every token seen at least n times,
//                ids from 2 in first-occurrence order
//   TopK(size)   keep the size - 2 most frequent tokens,
//                ids from 2 in descending count order
//
// Both modes add <PAD> = 0 and <UNK> = 1. Only the training split
// is ever passed in, so dev/test tokens never leak into the ids.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::dataset::{Column, RelationDataset};
use crate::domain::error::DataError;
use crate::domain::instance::Field;
use crate::domain::symbols::{SymbolTable, FIRST_FREE_ID, PAD_TOKEN, UNK_TOKEN};

/// Default minimum token count.
pub const MIN_WORD_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum VocabMode {
    MinCount(usize),
    TopK(usize),
}

impl Default for VocabMode {
    fn default() -> Self {
        VocabMode::MinCount(MIN_WORD_COUNT)
    }
}

/// Frequency counter that remembers first-occurrence order.
#[derive(Debug, Default)]
struct Counter {
    counts: HashMap<String, usize>,
    order:  Vec<String>,
}

impl Counter {
    fn add(&mut self, symbol: &str) {
        match self.counts.get_mut(symbol) {
            Some(c) => *c += 1,
            None => {
                self.counts.insert(symbol.to_string(), 1);
                self.order.push(symbol.to_string());
            }
        }
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    /// Symbols by descending count, ties broken by first occurrence.
    fn most_common(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> =
            self.order.iter().map(|s| (s.as_str(), self.counts[s])).collect();
        // sort_by is stable, so equal counts keep insertion order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    fn at_least(&self, min: usize) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().filter(move |s| self.counts[*s] >= min).map(String::as_str)
    }
}

fn count_field(datasets: &[&RelationDataset], field: Field) -> Result<Counter, DataError> {
    let mut counter = Counter::default();
    for d in datasets {
        match d.column(field) {
            Column::Symbols(rows) => rows.iter().flatten().for_each(|s| counter.add(s)),
            Column::ScalarSymbols(rows) => rows.iter().for_each(|s| counter.add(s)),
            _ => return Err(DataError::AlreadyEncoded { field }),
        }
    }
    Ok(counter)
}

/// Build the word vocabulary from the token column of `datasets`.
pub fn build_vocab(datasets: &[&RelationDataset], mode: VocabMode) -> Result<SymbolTable, DataError> {
    let counter = count_field(datasets, Field::Token)?;
    tracing::info!("{} distinct tokens found in dataset", counter.len());

    let vocab = match mode {
        VocabMode::MinCount(min) => {
            tracing::info!("Using minimum word count {} to build vocab", min);
            SymbolTable::with_reserved(counter.at_least(min))
        }
        VocabMode::TopK(size) => {
            if size < FIRST_FREE_ID as usize {
                return Err(DataError::InvalidParameter {
                    name:   "vocab size",
                    reason: format!("{size} leaves no room beside <PAD> and <UNK>"),
                });
            }
            tracing::info!("Using fixed vocab size {}", size);
            let keep = size - FIRST_FREE_ID as usize;
            // reserved strings in the corpus must not take a slot
            SymbolTable::with_reserved(
                counter
                    .most_common()
                    .into_iter()
                    .map(|(s, _)| s)
                    .filter(|s| *s != PAD_TOKEN && *s != UNK_TOKEN)
                    .take(keep),
            )
        }
    };
    Ok(vocab)
}

/// Build a table for any symbolic field from observed frequencies.
/// Labels get dense ids from 0, other fields reserved ids then 2...
pub fn build_field_table(datasets: &[&RelationDataset], field: Field) -> Result<SymbolTable, DataError> {
    let counter = count_field(datasets, field)?;
    let ranked = counter.most_common().into_iter().map(|(s, _)| s);
    let table = if field.is_scalar() {
        SymbolTable::dense(ranked)
    } else {
        SymbolTable::with_reserved(ranked)
    };
    tracing::debug!("{} unique {} symbols found", table.len(), field);
    Ok(table)
}

/// Observed symbols of `field` that `reference` does not contain.
pub fn uncovered_symbols(
    datasets: &[&RelationDataset],
    field: Field,
    reference: &SymbolTable,
) -> Result<Vec<String>, DataError> {
    let observed = build_field_table(datasets, field)?;
    let mut missing: Vec<String> = observed
        .iter()
        .filter(|(s, _)| !reference.contains(s))
        .map(|(s, _)| s.to_string())
        .collect();
    missing.sort();
    Ok(missing)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instance::Instance;
    use crate::domain::symbols::{PAD_ID, UNK_ID};
    use std::collections::HashSet;

    fn dataset(sentences: &[&[&str]]) -> RelationDataset {
        RelationDataset::from_instances(sentences.iter().map(|words| Instance {
            tokens: words.iter().map(|w| w.to_string()).collect(),
            pos:    vec!["NN".into(); words.len()],
            deprel: vec!["dep".into(); words.len()],
            root:   vec!["_".into(); words.len()],
            label:  "no_relation".into(),
        }))
        .unwrap()
    }

    #[test]
    fn test_min_count_keeps_frequent_tokens() {
        let d = dataset(&[&["the", "cat", "sat"], &["the", "dog", "sat"], &["a", "cat"]]);
        let v = build_vocab(&[&d], VocabMode::MinCount(2)).unwrap();

        for w in ["the", "cat", "sat"] {
            assert!(v.get(w).unwrap() >= 2, "{w} should have a free id");
        }
        assert!(!v.contains("dog"));
        assert!(!v.contains("a"));
        assert_eq!(v.get(PAD_TOKEN), Some(PAD_ID));
        assert_eq!(v.get(UNK_TOKEN), Some(UNK_ID));
        assert_eq!(v.len(), 5);
    }

    #[test]
    fn test_ids_are_unique_and_dense() {
        let d = dataset(&[&["x", "y", "z", "x", "y", "z", "w"]]);
        let v = build_vocab(&[&d], VocabMode::MinCount(2)).unwrap();
        let ids: HashSet<u32> = v.iter().map(|(_, id)| id).collect();
        assert_eq!(ids.len(), v.len());
        assert_eq!(ids, (0..v.len() as u32).collect::<HashSet<u32>>());
    }

    #[test]
    fn test_first_occurrence_order() {
        let d = dataset(&[&["b", "a", "b", "a", "c", "c"]]);
        let v = build_vocab(&[&d], VocabMode::MinCount(2)).unwrap();
        assert_eq!(v.get("b"), Some(2));
        assert_eq!(v.get("a"), Some(3));
        assert_eq!(v.get("c"), Some(4));
    }

    #[test]
    fn test_reserved_ids_on_empty_corpus() {
        let v = build_vocab(&[&RelationDataset::default()], VocabMode::MinCount(2)).unwrap();
        assert_eq!(v.len(), 2);
        assert!(v.has_reserved());
    }

    #[test]
    fn test_counts_across_datasets() {
        let a = dataset(&[&["rare"]]);
        let b = dataset(&[&["rare"]]);
        let v = build_vocab(&[&a, &b], VocabMode::MinCount(2)).unwrap();
        assert!(v.contains("rare"));
    }

    #[test]
    fn test_top_k() {
        let d = dataset(&[&["a", "b", "b", "c", "c", "c"]]);
        let v = build_vocab(&[&d], VocabMode::TopK(4)).unwrap();
        assert_eq!(v.len(), 4);
        assert_eq!(v.get("c"), Some(2));
        assert_eq!(v.get("b"), Some(3));
        assert!(!v.contains("a"));

        assert!(build_vocab(&[&d], VocabMode::TopK(1)).is_err());
    }

    #[test]
    fn test_reserved_literals_in_corpus() {
        let d = dataset(&[&["<PAD>", "<PAD>", "<UNK>", "<UNK>", "a", "a", "b"]]);

        let v = build_vocab(&[&d], VocabMode::MinCount(2)).unwrap();
        assert_eq!(v.get(PAD_TOKEN), Some(PAD_ID));
        assert_eq!(v.get(UNK_TOKEN), Some(UNK_ID));
        assert_eq!(v.get("a"), Some(2));
        assert_eq!(v.len(), 3);

        let v = build_vocab(&[&d], VocabMode::TopK(4)).unwrap();
        assert_eq!(v.get(PAD_TOKEN), Some(PAD_ID));
        assert_eq!(v.get(UNK_TOKEN), Some(UNK_ID));
        assert_eq!(v.get("a"), Some(2));
        assert_eq!(v.get("b"), Some(3));
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn test_field_tables() {
        let d = dataset(&[&["a", "b"]]);
        let labels = build_field_table(&[&d], Field::Label).unwrap();
        assert_eq!(labels.get("no_relation"), Some(0));

        let pos = build_field_table(&[&d], Field::Pos).unwrap();
        assert_eq!(pos.get("NN"), Some(2));
        assert!(pos.has_reserved());
    }

    #[test]
    fn test_uncovered_symbols() {
        let d = dataset(&[&["a"]]);
        let reference = SymbolTable::with_reserved(["NN"]);
        assert!(uncovered_symbols(&[&d], Field::Pos, &reference).unwrap().is_empty());
        let missing = uncovered_symbols(&[&d], Field::Deprel, &reference).unwrap();
        assert_eq!(missing, vec!["dep".to_string()]);
    }
}
