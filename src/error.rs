//! Error types for the library modules. The CLI wraps these in `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while rolling entities up into a region.
#[derive(Debug, Error, PartialEq)]
pub enum RegionError {
    /// Members do not share one timestamp axis.
    #[error("region '{region}': series of '{member}' is not aligned with '{reference}' at index {index}")]
    Misaligned {
        region: String,
        member: String,
        reference: String,
        index: usize,
    },
}

/// Errors from a [`crate::cache::Cache`] implementation.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("invalid cache key '{key}'")]
    InvalidKey { key: String },

    #[error("failed to open cache directory {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read cache key '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write cache key '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors while loading a population table.
#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("failed to read population table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid population table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("country '{name}' is listed more than once")]
    Duplicate { name: String },

    #[error("alias '{alias}' points to unknown country '{target}'")]
    DanglingAlias { alias: String, target: String },
}

/// Errors in a requested entity selection.
#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("empty country list")]
    Empty,

    #[error("unknown country or region '{name}'")]
    Unknown { name: String },
}

/// Errors in the layout of a source file.
#[derive(Debug, Error, PartialEq)]
pub enum SourceError {
    #[error("no '{marker}' header row in the {dataset} file")]
    MissingHeader {
        dataset: &'static str,
        marker: &'static str,
    },
}
