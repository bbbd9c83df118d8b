//! Loading and validating the source tables of one run.
//!
//! - Parse the three CSV files in parallel
//! - Check identity keys are unique in the nominee and review tables
//! - Build the per-year canonical title lookup the matcher works from

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::info;

/// Default file names inside a data directory
pub const NOMINEES_FILE: &str = "01_tmdb.csv";
pub const REVIEWS_FILE: &str = "02_omdb.csv";
pub const MENTIONS_FILE: &str = "03_award_mentions.csv";

impl SourceTables {
    pub fn new(
        nominees: Vec<NomineeRecord>,
        reviews: Vec<ReviewRecord>,
        mentions: Vec<AwardMention>,
    ) -> Self {
        Self {
            nominees,
            reviews,
            mentions,
        }
    }

    /// Load the three tables from their default names inside `data_dir`.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        Self::load_from_files(
            &data_dir.join(NOMINEES_FILE),
            &data_dir.join(REVIEWS_FILE),
            &data_dir.join(MENTIONS_FILE),
        )
    }

    /// Load the three tables from explicit paths and validate them.
    pub fn load_from_files(
        nominees_path: &Path,
        reviews_path: &Path,
        mentions_path: &Path,
    ) -> Result<Self> {
        // Three independent files, so parse them concurrently
        let ((nominees, reviews), mentions) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_nominees(nominees_path),
                    || parser::parse_reviews(reviews_path),
                )
            },
            || parser::parse_mentions(mentions_path),
        );

        let tables = Self::new(nominees?, reviews?, mentions?);
        let (n, r, m) = tables.counts();
        info!(nominees = n, reviews = r, mentions = m, "Loaded source tables");

        tables.validate()?;
        Ok(tables)
    }

    /// Validate structural invariants.
    ///
    /// Nominee and review keys must be unique and titles non-empty. Award
    /// mentions are not checked here: repeats and odd spellings are normal.
    pub fn validate(&self) -> Result<()> {
        check_unique(
            "nominees",
            self.nominees.iter().map(|n| (n.ceremony_year, n.nominated_title.as_str())),
        )?;
        check_unique(
            "reviews",
            self.reviews.iter().map(|r| (r.ceremony_year, r.nominated_title.as_str())),
        )?;

        if let Some(bad) = self.nominees.iter().find(|n| n.nominated_title.trim().is_empty()) {
            return Err(DataLoadError::ValidationError(format!(
                "nominee for ceremony {} has an empty title",
                bad.ceremony_year
            )));
        }
        Ok(())
    }

    /// Canonical nominee titles grouped by ceremony year, in table order.
    pub fn titles_by_year(&self) -> BTreeMap<CeremonyYear, Vec<String>> {
        let mut by_year: BTreeMap<CeremonyYear, Vec<String>> = BTreeMap::new();
        for nominee in &self.nominees {
            by_year
                .entry(nominee.ceremony_year)
                .or_default()
                .push(nominee.nominated_title.clone());
        }
        by_year
    }

    /// (nominees, reviews, mentions)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.nominees.len(), self.reviews.len(), self.mentions.len())
    }
}

/// Fail on the first repeated `(year, title)` key.
pub fn check_unique<'a>(
    table: &str,
    keys: impl IntoIterator<Item = (CeremonyYear, &'a str)>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for (year, title) in keys {
        if !seen.insert((year, title)) {
            return Err(DataLoadError::DuplicateKey {
                table: table.to_string(),
                ceremony_year: year,
                title: title.to_string(),
            });
        }
    }
    Ok(())
}
