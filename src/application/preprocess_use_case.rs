// ============================================================
// Layer 2 — PreprocessUseCase
// ============================================================
// Turns one corpus into an encoded dump, in order:
//
//   Step 1: Load train and test                 (Layer 4 - data)
//   Step 2: Build the vocabulary from train     (Layer 4 - data)
//   Step 3: Report fixed-table coverage         (Layer 4 - data)
//   Step 4: Encode words, tags, markers, labels (Layer 4 - data)
//   Step 5: Save vocab and encoded splits       (Layer 6 - infra)
//   Step 6: Measure the longest sequence
//   Step 7: Write the dev/test CV folds         (Layer 4 + 6)
//   Step 8: Save the config next to the dump    (Layer 6 - infra)

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::EncodedDataset,
    encoder::{encode_fields, encode_words, ScalarPolicy},
    loader::{load_dataset, JsonPathLoader, MAX_SEQ_LEN},
    splitter::{cv_splits, CV_FOLDS, DEV_FRACTION},
    vocab::{build_vocab, uncovered_symbols, VocabMode},
};
use crate::domain::corpus::{CorpusConfig, CorpusKind, NO_RELATION};
use crate::domain::instance::Field;
use crate::domain::traits::Persistable;
use crate::infra::store::DumpStore;

/// What happens to a label missing from the corpus label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownLabel {
    #[default]
    Fail,
    NoRelation,
}

// ─── Preprocessing Configuration ─────────────────────────────────────────────
// Saved as preprocess_config.json next to the dump it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    pub corpus:        CorpusKind,
    /// Overrides `data/<CORPUS>`.
    pub data_root:     Option<PathBuf>,
    pub max_seq_len:   usize,
    pub vocab:         VocabMode,
    pub folds:         usize,
    pub dev_fraction:  f64,
    pub seed:          u64,
    pub unknown_label: UnknownLabel,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            corpus:        CorpusKind::Tacred,
            data_root:     None,
            max_seq_len:   MAX_SEQ_LEN,
            vocab:         VocabMode::default(),
            folds:         CV_FOLDS,
            dev_fraction:  DEV_FRACTION,
            seed:          1234,
            unknown_label: UnknownLabel::default(),
        }
    }
}

/// Summary handed back to the CLI for printing.
#[derive(Debug, Clone)]
pub struct PreprocessReport {
    pub output_dir:     PathBuf,
    pub train_examples: usize,
    pub test_examples:  usize,
    pub vocab_size:     usize,
    pub max_seq_len:    usize,
    pub folds:          usize,
}

// ─── PreprocessUseCase ───────────────────────────────────────────────────────
pub struct PreprocessUseCase {
    config: PreprocessConfig,
}

impl PreprocessUseCase {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    fn label_policy(&self, corpus: &CorpusConfig) -> Result<ScalarPolicy> {
        Ok(match self.config.unknown_label {
            UnknownLabel::Fail => ScalarPolicy::Reject,
            UnknownLabel::NoRelation => match corpus.no_relation_id() {
                Some(id) => ScalarPolicy::MapTo(id),
                None => bail!("Corpus '{}' has no '{}' label", corpus.kind, NO_RELATION),
            },
        })
    }

    pub fn execute(&self) -> Result<PreprocessReport> {
        let cfg = &self.config;
        let corpus = CorpusConfig::new(cfg.corpus, cfg.data_root.clone());
        let tables = &corpus.tables;

        // ── Step 1: Load both splits ──────────────────────────────────────────
        tracing::info!("Preprocessing {} from '{}'", corpus.kind, corpus.root.display());
        let train = load_dataset(
            &JsonPathLoader::new(corpus.train_instances(), corpus.train_labels()),
            cfg.max_seq_len,
        )
        .context("Failed to load the training split")?;
        let test = load_dataset(
            &JsonPathLoader::new(corpus.test_instances(), corpus.test_labels()),
            cfg.max_seq_len,
        )
        .context("Failed to load the test split")?;

        // ── Step 2: Vocabulary, train only ────────────────────────────────────
        let vocab = build_vocab(&[&train], cfg.vocab)?;
        tracing::info!("Vocabulary has {} entries", vocab.len());

        // ── Step 3: Coverage of the fixed tables ──────────────────────────────
        // Informational only; unknown tags still encode to <UNK>.
        for (field, table) in [
            (Field::Pos, &tables.pos),
            (Field::Deprel, &tables.deprel),
            (Field::Label, &tables.label),
        ] {
            let missing = uncovered_symbols(&[&train, &test], field, table)?;
            if !missing.is_empty() {
                tracing::warn!("{} {} symbols not in the {} table: {:?}", missing.len(), field, corpus.kind, missing);
            }
        }

        // ── Step 4: Encode ────────────────────────────────────────────────────
        let datasets = encode_words(vec![train, test], &vocab)?;
        let datasets = encode_fields(
            datasets,
            &[
                (Field::Pos, &tables.pos),
                (Field::Deprel, &tables.deprel),
                (Field::Root, &tables.root),
                (Field::Label, &tables.label),
            ],
            self.label_policy(&corpus)?,
        )?;
        let mut encoded = datasets
            .into_iter()
            .map(EncodedDataset::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let (Some(mut test), Some(train)) = (encoded.pop(), encoded.pop()) else {
            bail!("Encoding did not return both splits");
        };

        // ── Step 5: Save ──────────────────────────────────────────────────────
        let store = DumpStore::create(corpus.output_dir())?;
        vocab.save(&store.vocab_path())?;
        train.save(&store.train_path())?;
        test.save(&store.test_path())?;
        tracing::info!("Saved vocab, train and test to '{}'", store.dir().display());

        // ── Step 6: Longest encoded sequence ──────────────────────────────────
        let max_seq_len = train.max_seq_len().max(test.max_seq_len());

        // ── Step 7: CV folds of the test set ──────────────────────────────────
        // One RNG for every fold; the test set is reshuffled each time.
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let folds = cv_splits(&mut test, cfg.folds, cfg.dev_fraction, &mut rng, |split| {
            split.dev.save(&store.cv_dev_path(split.index))?;
            split.test.save(&store.cv_test_path(split.index))
        })?;
        tracing::info!("Wrote {} CV folds", folds);

        // ── Step 8: Config ────────────────────────────────────────────────────
        store.save_config(cfg)?;

        Ok(PreprocessReport {
            output_dir: store.dir().to_path_buf(),
            train_examples: train.len(),
            test_examples: test.len(),
            vocab_size: vocab.len(),
            max_seq_len,
            folds,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::symbols::{SymbolTable, UNK_ID};
    use serde_json::json;
    use std::{fs, path::Path};

    fn sentence(words: &[&str], dirs: &[&str]) -> serde_json::Value {
        let n = words.len();
        json!([words, vec!["nn"; n], vec!["nsubj"; n], dirs])
    }

    fn write_split(root: &Path, name: &str, instances: Vec<serde_json::Value>, labels: &[&str]) {
        fs::write(root.join(format!("{name}.json")), serde_json::to_string(&instances).unwrap()).unwrap();
        fs::write(root.join(format!("{name}_label.json")), serde_json::to_string(labels).unwrap()).unwrap();
    }

    fn corpus(root: &Path, test_label: &str) {
        write_split(
            root,
            "train",
            vec![
                sentence(&["he", "founded", "it"], &["0", "1", "2"]),
                sentence(&["he", "joined", "it"], &["2", "2", "2"]),
                sentence(&["it", "grew"], &["1", "2"]),
            ],
            &["org:founded_by", "no_relation", "no_relation"],
        );
        let test: Vec<_> = (0..10).map(|_| sentence(&["he", "left", "it"], &["0", "2", "2"])).collect();
        let labels = vec![test_label; 10];
        write_split(root, "test", test, &labels);
    }

    fn config(root: &Path) -> PreprocessConfig {
        PreprocessConfig {
            data_root: Some(root.to_path_buf()),
            folds: 3,
            ..PreprocessConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_dump() {
        let dir = tempfile::tempdir().unwrap();
        corpus(dir.path(), "no_relation");

        let report = PreprocessUseCase::new(config(dir.path())).execute().unwrap();
        assert_eq!(report.train_examples, 3);
        assert_eq!(report.test_examples, 10);
        assert_eq!(report.max_seq_len, 3);
        assert_eq!(report.folds, 3);

        let store = DumpStore::open(dir.path().join("dependency"));
        let vocab = SymbolTable::load(&store.vocab_path()).unwrap();
        // he and it appear at least twice in train, founded does not
        assert!(vocab.contains("he"));
        assert!(vocab.contains("it"));
        assert!(!vocab.contains("founded"));
        assert_eq!(vocab.len(), 4);

        let train = EncodedDataset::load(&store.train_path()).unwrap();
        assert_eq!(train.token[0][1], UNK_ID);
        // POS was upper-cased before lookup: NN is id 3
        assert_eq!(train.pos[0][0], 3);
        // last non-"2" direction is ROOT (3), the rest "_" (2)
        assert_eq!(train.root[0], vec![2, 3, 2]);
        assert_eq!(train.root[1], vec![3, 2, 2]);

        for i in 0..3 {
            assert_eq!(EncodedDataset::load(&store.cv_dev_path(i)).unwrap().len(), 1);
            assert_eq!(EncodedDataset::load(&store.cv_test_path(i)).unwrap().len(), 9);
        }
        let saved: PreprocessConfig = store.load_config().unwrap();
        assert_eq!(saved.folds, 3);
    }

    #[test]
    fn test_unknown_label_policy() {
        let dir = tempfile::tempdir().unwrap();
        corpus(dir.path(), "per:made_up");
        assert!(PreprocessUseCase::new(config(dir.path())).execute().is_err());

        let cfg = PreprocessConfig {
            unknown_label: UnknownLabel::NoRelation,
            ..config(dir.path())
        };
        PreprocessUseCase::new(cfg).execute().unwrap();
        let test = EncodedDataset::load(&dir.path().join("dependency").join("test.id")).unwrap();
        assert!(test.label.iter().all(|&l| l == 0));
    }
}
