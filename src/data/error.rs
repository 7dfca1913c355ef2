//! Error types for loading and filtering the dataset.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),
    #[error("Column '{0}' appears more than once (headers are case-insensitive)")]
    DuplicateColumn(String),
    #[error("Unparseable date '{value}' on data row {row}")]
    UnparseableDate { row: usize, value: String },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Coarse classification surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    Io,
    MalformedInput,
}

impl DataError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataError::FileNotFound(_) => ErrorKind::FileNotFound,
            DataError::Io { .. } => ErrorKind::Io,
            DataError::MissingColumn(_)
            | DataError::DuplicateColumn(_)
            | DataError::UnparseableDate { .. }
            | DataError::Polars(_) => ErrorKind::MalformedInput,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
