//! Error types for model building, querying, and the loaders around them.

use crate::core::types::ItemId;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while building a model snapshot.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no transactions supplied: cannot build a model from an empty dataset")]
    EmptyDataset,

    #[error("{name} is out of range: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Failures of a single recommendation query. All of them come from caller input.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("select at least one item")]
    InvalidSelection,

    #[error("unknown item: {item}")]
    InvalidItem { item: String },

    #[error("top_n must be at least 1")]
    InvalidTopN,
}

/// Violated rule invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("antecedent and consequent must both be non-empty")]
    EmptyPart,

    #[error("item {item} appears on both sides of the rule")]
    Overlap { item: ItemId },

    #[error("itemset of {len} items is too large to partition")]
    TooLarge { len: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset contains no transactions")]
    Empty,
}
