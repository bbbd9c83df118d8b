//! Core domain types for the three source tables.
//!
//! Every table is keyed by `(ceremony_year, title)`. Nominee and review rows
//! carry the canonical nominee title; award mentions carry whatever spelling
//! the scraped page used and are reconciled later by the fuzzy matcher.
//!
//! Metadata fields are `Option` throughout: external lookups fail, fields come
//! back as `"N/A"`, and none of that should abort a run.

use crate::parser::{lenient_f64, lenient_flag, lenient_i64, lenient_string};
use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Calendar year in which the ceremony was held (films come from the year before)
pub type CeremonyYear = i32;

/// Identity key shared by the nominee and review tables
pub type FilmKey = (CeremonyYear, String);

// =============================================================================
// Nominee table (ground truth + movie metadata)
// =============================================================================

/// One Best Picture nominee enriched with movie-catalog metadata.
///
/// `ceremony_year` and `nominated_title` are the identity key and are never
/// rewritten; everything else may be missing if the catalog lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NomineeRecord {
    pub ceremony_year: CeremonyYear,
    pub nominated_title: String,
    #[serde(deserialize_with = "lenient_flag")]
    pub won_best_picture: bool,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub tmdb_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tmdb_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub synopsis: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tagline: Option<String>,
    /// Production budget in USD; the catalog reports unknown budgets as 0
    #[serde(default, deserialize_with = "lenient_f64")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub revenue: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub runtime_min: Option<i64>,
    /// Raw release date text, usually `YYYY-MM-DD`
    #[serde(default, deserialize_with = "lenient_string")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub original_language: Option<String>,
    /// Raw JSON array of genre names, e.g. `["Drama", "War"]`
    #[serde(default, deserialize_with = "lenient_string")]
    pub genres: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tmdb_popularity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tmdb_vote_avg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub tmdb_vote_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub director: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cast_top5: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub production_companies: Option<String>,
}

impl NomineeRecord {
    /// A nominee with no metadata attached.
    pub fn bare(ceremony_year: CeremonyYear, title: impl Into<String>, won: bool) -> Self {
        Self {
            ceremony_year,
            nominated_title: title.into(),
            won_best_picture: won,
            ..Default::default()
        }
    }

    pub fn key(&self) -> FilmKey {
        (self.ceremony_year, self.nominated_title.clone())
    }
}

// =============================================================================
// Review table
// =============================================================================

/// Review-aggregator data for one nominee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub ceremony_year: CeremonyYear,
    pub nominated_title: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub imdb_id: Option<String>,
    /// IMDb user rating on a 0-10 scale
    #[serde(default, deserialize_with = "lenient_f64")]
    pub imdb_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub imdb_votes: Option<i64>,
    /// Metascore, 0-100
    #[serde(default, deserialize_with = "lenient_i64")]
    pub metacritic: Option<i64>,
    /// Rotten Tomatoes critics score, 0-100
    #[serde(default, deserialize_with = "lenient_i64")]
    pub rt_score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub box_office_usd: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rated: Option<String>,
    /// Free-text awards narration, e.g. "Won 3 Oscars. Another 12 nominations."
    #[serde(default, deserialize_with = "lenient_string")]
    pub omdb_awards: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
}

impl ReviewRecord {
    pub fn new(ceremony_year: CeremonyYear, title: impl Into<String>) -> Self {
        Self {
            ceremony_year,
            nominated_title: title.into(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> FilmKey {
        (self.ceremony_year, self.nominated_title.clone())
    }
}

// =============================================================================
// Award mentions
// =============================================================================

/// A single precursor-award nomination as scraped, in long format.
///
/// `film` is the page's spelling, not the canonical title. `award` is a
/// stable identifier such as `"BAFTA_best_film"` or `"PGA_best_picture"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardMention {
    pub ceremony_year: CeremonyYear,
    pub film: String,
    pub award: String,
    #[serde(deserialize_with = "lenient_flag")]
    pub won: bool,
}

impl AwardMention {
    pub fn new(
        ceremony_year: CeremonyYear,
        film: impl Into<String>,
        award: impl Into<String>,
        won: bool,
    ) -> Self {
        Self {
            ceremony_year,
            film: film.into(),
            award: award.into(),
            won,
        }
    }
}

// =============================================================================
// SourceTables - the three inputs of one run
// =============================================================================

/// The three source tables loaded for a single pipeline run.
///
/// Nominee and review keys are validated unique on load; mentions are kept
/// in file order since repeats there are expected (ties, re-listings).
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub nominees: Vec<NomineeRecord>,
    pub reviews: Vec<ReviewRecord>,
    pub mentions: Vec<AwardMention>,
}
