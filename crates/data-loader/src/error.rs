//! Error types for the data-loader crate.
//!
//! Loading is strict about structure (files must exist, headers must parse,
//! identity keys must be unique) and lenient about individual field values,
//! which degrade to `None` instead of failing the load.

use thiserror::Error;

/// Errors that can occur while loading the source tables
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A CSV record couldn't be decoded into its row type
    ///
    /// `record` is the 1-based data record number (header excluded) when known.
    #[error("CSV error in {file} at record {record:?}: {source}")]
    CsvError {
        file: String,
        record: Option<u64>,
        #[source]
        source: csv::Error,
    },

    /// Two rows of the same table share an identity key
    #[error("Duplicate key in {table}: ({ceremony_year}, {title:?})")]
    DuplicateKey {
        table: String,
        ceremony_year: i32,
        title: String,
    },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
