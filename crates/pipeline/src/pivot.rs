//! Long-to-wide reshaping of precursor-award mentions.
//!
//! Input is one row per (ceremony, film, award) mention; output is one row
//! per (ceremony, film) with a won/nominated pair for every award observed
//! anywhere in the input.
//!
//! ## Null policy
//! Rows keep "not in this race" distinct from "nominated and lost": a film
//! absent from an award's mentions has no entry for it, which reads back as
//! `None` for both `_won` and `_nominated`. The merge stage collapses that to
//! 0 only when building the final dense table. `PivotPolicy::FillZero` gives
//! the collapsed view directly for callers that want it.

use crate::normalizer::Normalizer;
use data_loader::{AwardMention, CeremonyYear};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// One film in the wide award table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardPivotRow {
    pub ceremony_year: CeremonyYear,
    /// Film name as scraped (normalized), not the canonical title
    pub film: String,
    /// Award id -> won. An award missing here was not contested by this film.
    pub results: BTreeMap<String, bool>,
}

/// How absence from an award is read back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotPolicy {
    /// Absent -> unknown (`None`)
    #[default]
    NullPreserving,
    /// Absent -> not nominated, not won (`Some(0)`)
    FillZero,
}

/// The won/nominated pair for one award on one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwardCell {
    pub won: Option<u8>,
    pub nominated: Option<u8>,
}

impl AwardPivotRow {
    pub fn new(ceremony_year: CeremonyYear, film: impl Into<String>) -> Self {
        Self {
            ceremony_year,
            film: film.into(),
            results: BTreeMap::new(),
        }
    }

    /// Record a mention, OR-ing with any earlier one for the same award.
    pub fn record(&mut self, award: &str, won: bool) {
        let entry = self.results.entry(award.to_string()).or_insert(false);
        *entry |= won;
    }

    /// Merge another row's results into this one (OR per award).
    pub fn absorb(&mut self, other: &AwardPivotRow) {
        for (award, &won) in &other.results {
            self.record(award, won);
        }
    }

    pub fn cell(&self, award: &str, policy: PivotPolicy) -> AwardCell {
        match (self.results.get(award), policy) {
            (Some(&won), _) => AwardCell {
                won: Some(won as u8),
                nominated: Some(1),
            },
            (None, PivotPolicy::NullPreserving) => AwardCell {
                won: None,
                nominated: None,
            },
            (None, PivotPolicy::FillZero) => AwardCell {
                won: Some(0),
                nominated: Some(0),
            },
        }
    }

    pub fn wins(&self) -> usize {
        self.results.values().filter(|&&won| won).count()
    }

    pub fn nominations(&self) -> usize {
        self.results.len()
    }
}

/// Result of pivoting one batch of mentions.
#[derive(Debug, Clone, Default)]
pub struct AwardPivot {
    /// Every award id observed, sorted; defines column order
    pub awards: Vec<String>,
    /// One row per (ceremony_year, film), sorted by that key
    pub rows: Vec<AwardPivotRow>,
    pub mentions_in: usize,
    /// Mentions dropped because the film or award normalized to nothing
    pub mentions_discarded: usize,
}

impl AwardPivot {
    /// Column names in output order: `<award>_won`, `<award>_nominated`, ...
    pub fn column_names(&self) -> Vec<String> {
        award_column_names(&self.awards)
    }
}

pub fn won_column(award: &str) -> String {
    format!("{}_won", award)
}

pub fn nominated_column(award: &str) -> String {
    format!("{}_nominated", award)
}

pub fn award_column_names(awards: &[String]) -> Vec<String> {
    awards
        .iter()
        .flat_map(|a| [won_column(a), nominated_column(a)])
        .collect()
}

/// Groups mentions by (year, film, award) and reshapes them wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwardPivotEngine {
    normalizer: Normalizer,
}

impl AwardPivotEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Pivot a stream of mentions.
    ///
    /// ## Algorithm
    /// 1. Normalize film name and award id; drop the mention if either is empty
    /// 2. Group by (year, film, award), OR-ing `won` (tied winners, repeats)
    /// 3. Emit one row per (year, film) seen in at least one mention
    ///
    /// Mentions from several sources can be chained into one iterator; the
    /// result does not depend on how they were split.
    #[instrument(skip_all)]
    pub fn pivot<'a>(&self, mentions: impl IntoIterator<Item = &'a AwardMention>) -> AwardPivot {
        let mut grouped: BTreeMap<(CeremonyYear, String), AwardPivotRow> = BTreeMap::new();
        let mut awards = BTreeSet::new();
        let mut mentions_in = 0;
        let mut mentions_discarded = 0;

        for mention in mentions {
            mentions_in += 1;
            let film = self.normalizer.normalize(&mention.film);
            let award = self.normalizer.normalize(&mention.award);
            if film.is_empty() || award.is_empty() {
                mentions_discarded += 1;
                continue;
            }

            grouped
                .entry((mention.ceremony_year, film.clone()))
                .or_insert_with(|| AwardPivotRow::new(mention.ceremony_year, film))
                .record(&award, mention.won);
            awards.insert(award);
        }

        let pivot = AwardPivot {
            awards: awards.into_iter().collect(),
            rows: grouped.into_values().collect(),
            mentions_in,
            mentions_discarded,
        };
        debug!(
            "Pivoted {} mentions into {} rows over {} awards ({} discarded)",
            pivot.mentions_in,
            pivot.rows.len(),
            pivot.awards.len(),
            pivot.mentions_discarded
        );
        pivot
    }
}
