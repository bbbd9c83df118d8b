//! Feature engineering over merged master rows.
//!
//! Every derivation is a total function: malformed or missing inputs degrade
//! to `None` or 0 as documented on each helper, never to an error. The
//! helpers are public so each rule can be checked on its own.

use crate::master::MasterRow;
use chrono::{DateTime, Datelike, NaiveDate};
use rayon::prelude::*;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Genres that get a 0/1 flag column, in column order
pub const TRACKED_GENRES: [&str; 7] = [
    "Drama",
    "Comedy",
    "Biography",
    "History",
    "Romance",
    "Thriller",
    "War",
];

static OSCAR_WINS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Won (\d+) Oscar").expect("oscar pattern is valid"));

/// Derived columns for one master row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineeredFeatures {
    // Money, in millions of USD
    pub budget_m: Option<f64>,
    pub revenue_m: Option<f64>,
    pub log_budget: Option<f64>,
    pub log_revenue: Option<f64>,
    pub roi: Option<f64>,

    pub log_imdb_votes: Option<f64>,

    // Release timing
    pub release_month: Option<u32>,
    pub is_q4_release: u8,

    pub is_english: u8,

    // Awards season
    pub total_precursor_wins: u32,
    pub total_precursor_noms: u32,
    pub omdb_oscar_wins: u32,

    /// Aligned with `TRACKED_GENRES`
    pub genre_flags: [u8; TRACKED_GENRES.len()],

    /// Mean of the critic scores present, on a 0-100 scale
    pub critic_composite: Option<f64>,
}

impl EngineeredFeatures {
    /// Flag for a tracked genre (case-insensitive); 0 for untracked names
    pub fn genre(&self, name: &str) -> u8 {
        TRACKED_GENRES
            .iter()
            .position(|g| g.eq_ignore_ascii_case(name))
            .map(|idx| self.genre_flags[idx])
            .unwrap_or(0)
    }
}

/// Computes `EngineeredFeatures` for master rows in parallel.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEngineer;

impl FeatureEngineer {
    pub fn new() -> Self {
        Self
    }

    /// Attach features to every row. Order and row count are preserved.
    pub fn engineer(&self, rows: Vec<MasterRow>) -> Vec<MasterRow> {
        rows.into_par_iter()
            .map(|mut row| {
                row.features = self.compute(&row);
                row
            })
            .collect()
    }

    /// Compute features for a single row.
    pub fn compute(&self, row: &MasterRow) -> EngineeredFeatures {
        let nominee = &row.nominee;
        let review = row.review.as_ref();

        let budget_m = millions(nominee.budget);
        let revenue_m = millions(nominee.revenue);
        let release_month = release_month(nominee.release_date.as_deref());

        let imdb_rating = review.and_then(|r| r.imdb_rating);
        let rt_score = review.and_then(|r| r.rt_score).map(|v| v as f64);
        let metacritic = review.and_then(|r| r.metacritic).map(|v| v as f64);

        EngineeredFeatures {
            budget_m,
            revenue_m,
            log_budget: log1p(budget_m),
            log_revenue: log1p(revenue_m),
            roi: ratio(revenue_m, budget_m),
            log_imdb_votes: log1p(review.and_then(|r| r.imdb_votes).map(|v| v as f64)),
            release_month,
            is_q4_release: is_q4(release_month),
            is_english: (nominee.original_language.as_deref() == Some("en")) as u8,
            total_precursor_wins: row.awards.values().map(|f| f.won as u32).sum(),
            total_precursor_noms: row.awards.values().map(|f| f.nominated as u32).sum(),
            omdb_oscar_wins: oscar_wins(review.and_then(|r| r.omdb_awards.as_deref())),
            genre_flags: genre_flags(nominee.genres.as_deref()),
            critic_composite: critic_composite(rt_score, imdb_rating, metacritic),
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Dollars to millions. Zero means "unknown" in the catalog, so it maps to
/// `None` rather than to a $0 film.
pub fn millions(amount: Option<f64>) -> Option<f64> {
    amount.filter(|&v| v != 0.0).and_then(|v| finite(v / 1e6))
}

/// `ln(1 + x)`; `None` in, or a non-finite result, gives `None`.
pub fn log1p(value: Option<f64>) -> Option<f64> {
    value.and_then(|v| finite(v.ln_1p()))
}

/// `numerator / denominator`, `None` if either side is missing or zero-divided.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => finite(n / d),
        _ => None,
    }
}

/// Month of a release date given as `YYYY-MM-DD`, RFC 3339, or `YYYY-MM`.
pub fn release_month(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.month());
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.month());
    }
    NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
        .ok()
        .map(|date| date.month())
}

/// 1 for October through December releases.
pub fn is_q4(month: Option<u32>) -> u8 {
    matches!(month, Some(10..=12)) as u8
}

/// Oscar count from awards narration ("Won 3 Oscars. Another 12 ...").
pub fn oscar_wins(text: Option<&str>) -> u32 {
    text.and_then(|t| OSCAR_WINS.captures(t))
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// 0/1 per tracked genre from a JSON array of names.
///
/// Non-string entries are skipped; input that is not a JSON array is all 0.
pub fn genre_flags(genres_json: Option<&str>) -> [u8; TRACKED_GENRES.len()] {
    let mut flags = [0u8; TRACKED_GENRES.len()];
    let Some(genres) = genres_json.and_then(|raw| serde_json::from_str::<Vec<Value>>(raw).ok())
    else {
        return flags;
    };

    for (flag, tracked) in flags.iter_mut().zip(TRACKED_GENRES) {
        *flag = genres.iter().any(|g| g.as_str() == Some(tracked)) as u8;
    }
    flags
}

/// Mean of Rotten Tomatoes, IMDb rating x10 and Metascore over those present.
pub fn critic_composite(
    rt_score: Option<f64>,
    imdb_rating: Option<f64>,
    metacritic: Option<f64>,
) -> Option<f64> {
    let present: Vec<f64> = [rt_score, imdb_rating.map(|r| r * 10.0), metacritic]
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();

    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::master::AwardFlags;
    use data_loader::{NomineeRecord, ReviewRecord};

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_zero_budget_is_missing() {
        assert_eq!(millions(Some(0.0)), None);
        assert_eq!(log1p(millions(Some(0.0))), None);
        assert_eq!(millions(None), None);
    }

    #[test]
    fn test_monetary_features() {
        let mut nominee = NomineeRecord::bare(2021, "Nomadland", true);
        nominee.budget = Some(20_000_000.0);
        nominee.revenue = Some(60_000_000.0);

        let features = FeatureEngineer::new().compute(&MasterRow::new(nominee, None));

        assert_eq!(features.budget_m, Some(20.0));
        assert_eq!(features.revenue_m, Some(60.0));
        assert!(approx(features.roi, 3.0));
        assert!(approx(features.log_budget, 21f64.ln()));
        assert!((features.log_budget.unwrap() - 3.044).abs() < 1e-3);
        assert!(approx(features.log_revenue, 61f64.ln()));
    }

    #[test]
    fn test_roi_needs_both_sides() {
        assert_eq!(ratio(Some(60.0), None), None);
        assert_eq!(ratio(None, Some(20.0)), None);
        assert_eq!(ratio(Some(60.0), Some(0.0)), None);
    }

    #[test]
    fn test_negative_amounts_do_not_produce_nan() {
        assert_eq!(log1p(Some(-5.0)), None);
    }

    #[test]
    fn test_release_month() {
        assert_eq!(release_month(Some("2020-12-04")), Some(12));
        assert_eq!(release_month(Some("2019-05-30T00:00:00Z")), Some(5));
        assert_eq!(release_month(Some("2019-11")), Some(11));
        assert_eq!(release_month(Some("sometime")), None);
        assert_eq!(release_month(None), None);

        assert_eq!(is_q4(Some(10)), 1);
        assert_eq!(is_q4(Some(12)), 1);
        assert_eq!(is_q4(Some(9)), 0);
        assert_eq!(is_q4(None), 0);
    }

    #[test]
    fn test_oscar_wins() {
        assert_eq!(oscar_wins(Some("Won 3 Oscars. Another 12 nominations.")), 3);
        assert_eq!(oscar_wins(Some("Won 1 Oscar. 50 wins total")), 1);
        assert_eq!(oscar_wins(Some("Nominated for 1 Oscar.")), 0);
        assert_eq!(oscar_wins(Some("Won 99999999999999999999 Oscars")), 0);
        assert_eq!(oscar_wins(None), 0);
    }

    #[test]
    fn test_genre_flags() {
        let mut nominee = NomineeRecord::bare(2018, "Dunkirk", false);
        nominee.genres = Some(r#"["Drama","War"]"#.to_string());
        let features = FeatureEngineer::new().compute(&MasterRow::new(nominee, None));

        assert_eq!(features.genre("drama"), 1);
        assert_eq!(features.genre("war"), 1);
        assert_eq!(features.genre("comedy"), 0);
        assert_eq!(features.genre("western"), 0);
    }

    #[test]
    fn test_malformed_genres_are_all_zero() {
        assert_eq!(genre_flags(Some("Drama, War")), [0; 7]);
        assert_eq!(genre_flags(Some("[1, 2]")), [0; 7]);
        assert_eq!(genre_flags(Some(r#"{"Drama": 1}"#)), [0; 7]);
        assert_eq!(genre_flags(None), [0; 7]);
    }

    #[test]
    fn test_mixed_genre_list_keeps_string_entries() {
        let flags = genre_flags(Some(r#"["Drama", null, 3, {"name": "War"}, "Romance"]"#));
        assert_eq!(flags, [1, 0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_critic_composite_ignores_missing() {
        assert!(approx(
            critic_composite(Some(94.0), Some(7.3), Some(89.0)),
            (94.0 + 73.0 + 89.0) / 3.0
        ));
        assert!(approx(critic_composite(Some(90.0), None, Some(80.0)), 85.0));
        assert!(approx(critic_composite(None, Some(8.0), None), 80.0));
        assert_eq!(critic_composite(None, None, None), None);
    }

    #[test]
    fn test_language_and_award_totals() {
        let mut nominee = NomineeRecord::bare(2020, "Parasite", true);
        nominee.original_language = Some("ko".to_string());
        let mut row = MasterRow::new(nominee, Some(ReviewRecord::new(2020, "Parasite")));
        row.awards.insert("SAG".to_string(), AwardFlags { won: 1, nominated: 1 });
        row.awards.insert("PGA".to_string(), AwardFlags { won: 0, nominated: 1 });
        row.awards.insert("GG_drama".to_string(), AwardFlags { won: 0, nominated: 0 });

        let features = FeatureEngineer::new().compute(&row);
        assert_eq!(features.is_english, 0);
        assert_eq!(features.total_precursor_wins, 1);
        assert_eq!(features.total_precursor_noms, 2);
        assert_eq!(features.log_imdb_votes, None);
        assert_eq!(features.critic_composite, None);
    }

    #[test]
    fn test_no_award_columns_gives_zero_totals() {
        let row = MasterRow::new(NomineeRecord::bare(2005, "Ray", false), None);
        let features = FeatureEngineer::new().compute(&row);
        assert_eq!(features.total_precursor_wins, 0);
        assert_eq!(features.total_precursor_noms, 0);
    }

    #[test]
    fn test_engineer_preserves_order() {
        let rows: Vec<MasterRow> = ["A", "B", "C", "D"]
            .iter()
            .map(|t| MasterRow::new(NomineeRecord::bare(2020, *t, false), None))
            .collect();

        let out = FeatureEngineer::new().engineer(rows);
        let titles: Vec<_> = out.iter().map(|r| r.nominee.nominated_title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);
    }
}
