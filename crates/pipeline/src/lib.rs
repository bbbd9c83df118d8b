//! Merge pipeline that turns the three source tables into the master dataset.
//!
//! This crate provides:
//! - Normalizer for scraped award-table film names
//! - AwardPivotEngine to reshape long award mentions into a wide table
//! - FuzzyTitleMatcher (and SimilarityScorer implementations) to resolve
//!   scraped names to canonical nominee titles
//! - MasterBuilder to run the joins and enforce one row per nominee
//! - FeatureEngineer for derived model inputs
//! - CSV export of the finished table
//!
//! ## Architecture
//! The pipeline processes a batch in stages:
//! 1. Nominees are left-joined with reviews on (ceremony_year, title)
//! 2. Award mentions are normalized and pivoted wide
//! 3. Pivot rows are fuzzy-matched to nominees of the same ceremony
//! 4. Matched award rows are left-joined onto nominees, absences filled with 0
//! 5. FeatureEngineer computes derived columns
//!
//! ## Example Usage
//! ```ignore
//! use data_loader::SourceTables;
//! use pipeline::{MasterBuilder, MatchConfig, TieBreak};
//!
//! let tables = SourceTables::load_from_dir(Path::new("data"))?;
//!
//! let builder = MasterBuilder::new().with_match_config(
//!     MatchConfig::default()
//!         .with_threshold(82.0)
//!         .with_tie_break(TieBreak::Lexicographic),
//! );
//! let table = builder.build(&tables.nominees, &tables.reviews, &tables.mentions)?;
//!
//! pipeline::export::write_master_csv(&table, Path::new("master_dataset.csv"))?;
//! ```

pub mod error;
pub mod traits;
pub mod normalizer;
pub mod similarity;
pub mod pivot;
pub mod matcher;
pub mod master;
pub mod features;
pub mod orchestrator;
pub mod export;

// Re-export main types
pub use error::{PipelineError, Result};
pub use traits::SimilarityScorer;
pub use normalizer::{normalize, Normalizer};
pub use similarity::{ScorerKind, TokenSortJaroWinkler, TokenSortLevenshtein, TokenSortRatio};
pub use pivot::{AwardPivot, AwardPivotEngine, AwardPivotRow, PivotPolicy};
pub use matcher::{
    FuzzyTitleMatcher, MatchConfig, MatchOutcome, MatchStats, TieBreak, DEFAULT_THRESHOLD,
};
pub use master::{AwardFlags, MasterRow, MasterTable, MergeReport};
pub use features::{EngineeredFeatures, FeatureEngineer};
pub use orchestrator::{build_master, MasterBuilder};
