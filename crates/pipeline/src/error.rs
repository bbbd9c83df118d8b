//! Error types for the merge pipeline.
//!
//! Only structural problems surface here. Per-row anomalies (an award year
//! with no nominees, a film below the match threshold, a malformed feature
//! input) are absorbed where they happen and show up in the run's report.

use data_loader::{CeremonyYear, DataLoadError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// An input table violated a structural invariant (duplicate key, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DataLoadError),

    /// The award pivot produced more than one row for a (year, film)
    #[error("Award pivot has more than one row for ({ceremony_year}, {film:?})")]
    JoinCardinality {
        ceremony_year: CeremonyYear,
        film: String,
    },

    /// The join chain produced a different number of rows than it was given
    #[error("Row count drift: expected {expected} master rows, got {actual}")]
    RowCountDrift { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
