// ============================================================
// Layer 6 — Dump Store
// ============================================================
// Reads and writes every preprocessing artifact as JSON.
//
// File layout under the output directory:
//   dependency/
//     vocab                   ← {symbol: id} word table
//     train.id                ← encoded training set
//     test.id                 ← encoded test set
//     cv/
//       dev.id.0  test.id.0   ← one pair per fold
//       dev.id.1  test.id.1
//       ...
//     preprocess_config.json  ← settings the dump was made with
//
// Encoded datasets are stored field-major:
//   {"token": [[..]], "pos": [[..]], "deprel": [[..]],
//    "root": [[..]], "label": [..]}

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::dataset::EncodedDataset;
use crate::domain::symbols::SymbolTable;
use crate::domain::traits::Persistable;

pub const VOCAB_FILE: &str = "vocab";
pub const TRAIN_FILE: &str = "train.id";
pub const TEST_FILE: &str = "test.id";
pub const CV_DIR: &str = "cv";
pub const CONFIG_FILE: &str = "preprocess_config.json";

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }
    let json = serde_json::to_string(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::debug!("Wrote '{}'", path.display());
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).with_context(|| {
        format!(
            "Cannot read '{}'. Have you run 'preprocess' first?",
            path.display()
        )
    })?;
    serde_json::from_str(&json).with_context(|| format!("Malformed JSON in '{}'", path.display()))
}

impl Persistable for SymbolTable {
    fn save(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }

    fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

impl Persistable for EncodedDataset {
    fn save(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }

    /// Loading also checks that the columns line up.
    fn load(path: &Path) -> Result<Self> {
        let dataset: EncodedDataset = read_json(path)?;
        dataset
            .validate()
            .with_context(|| format!("Inconsistent dataset in '{}'", path.display()))?;
        Ok(dataset)
    }
}

/// Knows where each artifact of one dump lives.
pub struct DumpStore {
    dir: PathBuf,
}

impl DumpStore {
    /// Creates the directory (and its cv/ subdirectory) if missing.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let cv = dir.join(CV_DIR);
        fs::create_dir_all(&cv)
            .with_context(|| format!("Cannot create output directory '{}'", cv.display()))?;
        Ok(Self { dir })
    }

    /// Opens an existing dump without touching the file system.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn vocab_path(&self) -> PathBuf {
        self.dir.join(VOCAB_FILE)
    }

    pub fn train_path(&self) -> PathBuf {
        self.dir.join(TRAIN_FILE)
    }

    pub fn test_path(&self) -> PathBuf {
        self.dir.join(TEST_FILE)
    }

    pub fn cv_dev_path(&self, fold: usize) -> PathBuf {
        self.dir.join(CV_DIR).join(format!("dev.id.{fold}"))
    }

    pub fn cv_test_path(&self, fold: usize) -> PathBuf {
        self.dir.join(CV_DIR).join(format!("test.id.{fold}"))
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Pretty-printed, since it is read by people.
    pub fn save_config<C: Serialize>(&self, config: &C) -> Result<()> {
        let path = self.config_path();
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved preprocessing config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config<C: DeserializeOwned>(&self) -> Result<C> {
        read_json(&self.config_path())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::EncodedInstance;
    use std::collections::HashMap;

    #[test]
    fn test_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = DumpStore::create(dir.path().join("dependency")).unwrap();
        assert!(store.dir().join("cv").is_dir());
        assert!(store.cv_dev_path(7).ends_with("cv/dev.id.7"));
        assert!(store.cv_test_path(0).ends_with("cv/test.id.0"));
        assert!(store.vocab_path().ends_with("dependency/vocab"));
    }

    #[test]
    fn test_vocab_is_plain_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = DumpStore::create(dir.path()).unwrap();
        let vocab = SymbolTable::with_reserved(["cat"]);
        vocab.save(&store.vocab_path()).unwrap();

        let raw: HashMap<String, u32> =
            serde_json::from_str(&fs::read_to_string(store.vocab_path()).unwrap()).unwrap();
        assert_eq!(raw.get("cat"), Some(&2));
        assert_eq!(SymbolTable::load(&store.vocab_path()).unwrap(), vocab);
    }

    #[test]
    fn test_dataset_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = DumpStore::create(dir.path()).unwrap();
        let d = EncodedDataset::from_instances([EncodedInstance {
            tokens: vec![5, 6],
            pos:    vec![2, 3],
            deprel: vec![4, 4],
            root:   vec![2, 3],
            label:  1,
        }]);
        d.save(&store.train_path()).unwrap();
        assert_eq!(EncodedDataset::load(&store.train_path()).unwrap(), d);
    }

    #[test]
    fn test_ragged_dump_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.id");
        fs::write(&path, r#"{"token":[[1]],"pos":[],"deprel":[[1]],"root":[[1]],"label":[0]}"#).unwrap();
        assert!(EncodedDataset::load(&path).is_err());
    }

    #[test]
    fn test_missing_file_has_context() {
        let store = DumpStore::open("/nonexistent/dump");
        let err = SymbolTable::load(&store.vocab_path()).unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }
}
