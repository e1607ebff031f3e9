//! Data preparation for shortest-dependency-path relation extraction.
//!
//! Loads parsed corpora, builds vocabularies, encodes every field to ids,
//! writes cross-validation folds, and serves padded batches to a trainer.

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
