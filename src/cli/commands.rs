// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `preprocess`, `keys` and
// `inspect`, and converts their flags into the application
// layer's config structs.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::{
    inspect_use_case::InspectConfig,
    keys_use_case::KeysConfig,
    preprocess_use_case::{PreprocessConfig, UnknownLabel},
};
use crate::data::{
    loader::MAX_SEQ_LEN,
    splitter::{CV_FOLDS, DEV_FRACTION},
    vocab::{VocabMode, MIN_WORD_COUNT},
};
use crate::domain::corpus::CorpusKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a corpus and write the vocabulary, splits and CV folds
    Preprocess(PreprocessArgs),

    /// Write the gold label keys of an encoded dump
    Keys(KeysArgs),

    /// Batch an encoded dump and report what the batches contain
    Inspect(InspectArgs),
}

/// Handling of labels missing from the corpus label table.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum UnknownLabelArg {
    /// Abort preprocessing
    Fail,
    /// Treat the example as no_relation
    NoRelation,
}

impl From<UnknownLabelArg> for UnknownLabel {
    fn from(a: UnknownLabelArg) -> Self {
        match a {
            UnknownLabelArg::Fail => UnknownLabel::Fail,
            UnknownLabelArg::NoRelation => UnknownLabel::NoRelation,
        }
    }
}

#[derive(Args, Debug)]
pub struct PreprocessArgs {
    /// Corpus to preprocess: tacred, kbp or nyt
    #[arg(long)]
    pub corpus: CorpusKind,

    /// Directory holding train.json, test.json and their label files
    /// (defaults to data/<CORPUS>)
    #[arg(long)]
    pub data_root: Option<PathBuf>,

    /// Instances with this many tokens or more are dropped
    #[arg(long, default_value_t = MAX_SEQ_LEN)]
    pub max_seq_len: usize,

    /// Keep words seen at least this many times in train
    #[arg(long, default_value_t = MIN_WORD_COUNT, conflicts_with = "vocab_size")]
    pub min_count: usize,

    /// Keep the most frequent words up to this total vocab size
    #[arg(long)]
    pub vocab_size: Option<usize>,

    /// Number of dev/test folds drawn from the test set
    #[arg(long, default_value_t = CV_FOLDS)]
    pub folds: usize,

    /// Share of the test set used as dev in each fold
    #[arg(long, default_value_t = DEV_FRACTION)]
    pub dev_fraction: f64,

    #[arg(long, default_value_t = 1234)]
    pub seed: u64,

    #[arg(long, value_enum, default_value_t = UnknownLabelArg::Fail)]
    pub unknown_label: UnknownLabelArg,
}

impl From<PreprocessArgs> for PreprocessConfig {
    fn from(a: PreprocessArgs) -> Self {
        PreprocessConfig {
            corpus:        a.corpus,
            data_root:     a.data_root,
            max_seq_len:   a.max_seq_len,
            vocab:         match a.vocab_size {
                Some(size) => VocabMode::TopK(size),
                None => VocabMode::MinCount(a.min_count),
            },
            folds:         a.folds,
            dev_fraction:  a.dev_fraction,
            seed:          a.seed,
            unknown_label: a.unknown_label.into(),
        }
    }
}

#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Encoded dataset, e.g. data/TACRED/dependency/test.id
    #[arg(long)]
    pub dump: PathBuf,

    /// Key file to write
    #[arg(long)]
    pub output: PathBuf,

    /// Evaluation batch size; only full batches are covered by default
    #[arg(long, default_value_t = 50)]
    pub batch_size: usize,

    /// Also write keys for the rows after the last full batch
    #[arg(long)]
    pub include_residual: bool,

    /// Write label names of this corpus instead of ids
    #[arg(long)]
    pub corpus: Option<CorpusKind>,
}

impl From<KeysArgs> for KeysConfig {
    fn from(a: KeysArgs) -> Self {
        KeysConfig {
            dump:             a.dump,
            output:           a.output,
            batch_size:       a.batch_size,
            include_residual: a.include_residual,
            corpus:           a.corpus,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Encoded dataset to batch
    #[arg(long)]
    pub dump: PathBuf,

    #[arg(long, default_value_t = 50)]
    pub batch_size: usize,

    #[arg(long, default_value_t = MAX_SEQ_LEN)]
    pub pad_len: usize,

    /// Word dropout probability applied to tokens
    #[arg(long, default_value_t = 0.0)]
    pub unk_prob: f64,

    /// Keep the stored row order
    #[arg(long)]
    pub no_shuffle: bool,

    #[arg(long, default_value_t = 1234)]
    pub seed: u64,

    /// Show label names of this corpus
    #[arg(long)]
    pub corpus: Option<CorpusKind>,
}

impl From<InspectArgs> for InspectConfig {
    fn from(a: InspectArgs) -> Self {
        InspectConfig {
            dump:       a.dump,
            batch_size: a.batch_size,
            pad_len:    a.pad_len,
            unk_prob:   a.unk_prob,
            shuffle:    !a.no_shuffle,
            seed:       a.seed,
            corpus:     a.corpus,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use crate::cli::Cli;
    use super::*;
    use clap::Parser;

    #[test]
    fn test_preprocess_defaults() {
        let cli = Cli::try_parse_from(["sdp-prep", "preprocess", "--corpus", "TACRED"]).unwrap();
        let Commands::Preprocess(args) = cli.command else { panic!("wrong subcommand") };
        let cfg = PreprocessConfig::from(args);
        assert_eq!(cfg.corpus, CorpusKind::Tacred);
        assert_eq!(cfg.vocab, VocabMode::MinCount(2));
        assert_eq!(cfg.folds, 100);
        assert_eq!(cfg.seed, 1234);
        assert_eq!(cfg.unknown_label, UnknownLabel::Fail);
    }

    #[test]
    fn test_vocab_size_switches_mode() {
        let cli = Cli::try_parse_from([
            "sdp-prep", "preprocess", "--corpus", "nyt", "--vocab-size", "5000",
            "--unknown-label", "no-relation",
        ])
        .unwrap();
        let Commands::Preprocess(args) = cli.command else { panic!("wrong subcommand") };
        let cfg = PreprocessConfig::from(args);
        assert_eq!(cfg.vocab, VocabMode::TopK(5000));
        assert_eq!(cfg.unknown_label, UnknownLabel::NoRelation);

        assert!(Cli::try_parse_from([
            "sdp-prep", "preprocess", "--corpus", "nyt", "--vocab-size", "10", "--min-count", "3",
        ])
        .is_err());
    }

    #[test]
    fn test_keys_defaults_match_config() {
        let cli = Cli::try_parse_from(["sdp-prep", "keys", "--dump", "test.id", "--output", "keys.txt"]).unwrap();
        let Commands::Keys(args) = cli.command else { panic!("wrong subcommand") };
        let cfg = KeysConfig::from(args);
        let defaults = KeysConfig::default();
        assert_eq!(cfg.include_residual, defaults.include_residual);
        assert_eq!(cfg.batch_size, defaults.batch_size);

        assert!(Cli::try_parse_from([
            "sdp-prep", "keys", "--dump", "test.id", "--output", "keys.txt", "--pad-len", "10",
        ])
        .is_err());
    }

    #[test]
    fn test_unknown_corpus_rejected() {
        assert!(Cli::try_parse_from(["sdp-prep", "preprocess", "--corpus", "semeval"]).is_err());
    }
}
