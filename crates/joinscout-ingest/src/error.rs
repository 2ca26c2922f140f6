//! Error types for table ingestion.

use std::path::PathBuf;

use joinscout_model::ModelError;
use thiserror::Error;

/// Errors raised while locating or reading tables.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A catalog has no table with this name.
    #[error("table not found: {name}")]
    TableNotFound { name: String },

    /// Polars failed to read or parse a CSV file.
    #[error("failed to read CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// The parsed data does not form a valid table.
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
