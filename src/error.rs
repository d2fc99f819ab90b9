//! Error types for loading and binning.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading a record set from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{column}' is missing from the header")]
    MissingColumn { column: &'static str },

    #[error("line {line}: {message}")]
    Parse { line: u64, message: String },
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// An invalid bin edge set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BinningError {
    #[error("at least one bin is required")]
    Empty,

    #[error("{edges} lower edges but {labels} labels")]
    LabelCountMismatch { edges: usize, labels: usize },

    #[error("edge {index} is not finite")]
    NonFiniteEdge { index: usize },

    #[error("edges must be strictly increasing (edge {index})")]
    NotIncreasing { index: usize },
}
