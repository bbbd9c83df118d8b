//! # Data Loader Crate
//!
//! Loads the three source tables the master-dataset pipeline merges.
//!
//! ## Main Components
//!
//! - **types**: Domain records (NomineeRecord, ReviewRecord, AwardMention, SourceTables)
//! - **parser**: CSV parsing with lenient per-field coercion
//! - **index**: Parallel loading, key validation, per-year title lookup
//! - **ground_truth**: The versioned list of historical Best Picture nominees
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::SourceTables;
//! use std::path::Path;
//!
//! let tables = SourceTables::load_from_dir(Path::new("data"))?;
//! let (nominees, reviews, mentions) = tables.counts();
//! println!("{} nominees, {} reviews, {} award mentions", nominees, reviews, mentions);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod ground_truth;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{check_unique, MENTIONS_FILE, NOMINEES_FILE, REVIEWS_FILE};
pub use types::{
    // Type aliases
    CeremonyYear,
    FilmKey,
    // Records
    NomineeRecord,
    ReviewRecord,
    AwardMention,
    SourceTables,
};
