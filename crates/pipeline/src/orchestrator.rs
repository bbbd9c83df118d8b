//! # Master Dataset Orchestrator
//!
//! Coordinates the whole merge:
//! 1. Left join nominees with reviews on (ceremony_year, title)
//! 2. Pivot award mentions wide and fuzzy-match them to that year's nominees
//! 3. Drop award rows that did not resolve to a nominee
//! 4. Left join the matched award rows onto the nominees
//! 5. Fill missing award cells with 0
//! 6. Compute features
//!
//! Every join is a left join keyed on a unique key, so the output has exactly
//! one row per nominee in nominee order. That count is checked before the
//! table is returned; drift or a duplicate key aborts the build.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use data_loader::{check_unique, AwardMention, CeremonyYear, NomineeRecord, ReviewRecord};
use tracing::{debug, info, instrument, warn};

use crate::error::{PipelineError, Result};
use crate::features::FeatureEngineer;
use crate::master::{AwardFlags, MasterRow, MasterTable, MergeReport};
use crate::matcher::{FuzzyTitleMatcher, MatchConfig, MatchedPivotRow};
use crate::pivot::{AwardPivotEngine, AwardPivotRow};

/// Builds the master table from the three source tables.
///
/// ## Usage
/// ```ignore
/// let builder = MasterBuilder::new()
///     .with_match_config(MatchConfig::default().with_threshold(85.0));
///
/// let table = builder.build(&nominees, &reviews, &mentions)?;
/// ```
#[derive(Default)]
pub struct MasterBuilder {
    pivot_engine: AwardPivotEngine,
    matcher: FuzzyTitleMatcher,
    feature_engineer: FeatureEngineer,
}

impl MasterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pivot_engine(mut self, pivot_engine: AwardPivotEngine) -> Self {
        self.pivot_engine = pivot_engine;
        self
    }

    pub fn with_match_config(mut self, config: MatchConfig) -> Self {
        self.matcher = FuzzyTitleMatcher::new(config);
        self
    }

    pub fn with_matcher(mut self, matcher: FuzzyTitleMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn matcher(&self) -> &FuzzyTitleMatcher {
        &self.matcher
    }

    /// Build from mentions supplied as several independent sources.
    ///
    /// Sources are concatenated in the order given.
    pub fn build_from_sources(
        &self,
        nominees: &[NomineeRecord],
        reviews: &[ReviewRecord],
        sources: &[&[AwardMention]],
    ) -> Result<MasterTable> {
        self.build_with(nominees, reviews, sources.iter().copied().flatten())
    }

    /// Main entry point: merge the three tables into the master table.
    pub fn build(
        &self,
        nominees: &[NomineeRecord],
        reviews: &[ReviewRecord],
        mentions: &[AwardMention],
    ) -> Result<MasterTable> {
        self.build_with(nominees, reviews, mentions)
    }

    #[instrument(skip_all, fields(nominees = nominees.len(), reviews = reviews.len()))]
    fn build_with<'a>(
        &self,
        nominees: &[NomineeRecord],
        reviews: &[ReviewRecord],
        mentions: impl IntoIterator<Item = &'a AwardMention>,
    ) -> Result<MasterTable> {
        let start_time = Instant::now();
        let mut report = MergeReport {
            nominees: nominees.len(),
            ..Default::default()
        };

        // Step 1: nominees + reviews
        let rows = join_reviews(nominees, reviews, &mut report)?;
        info!(
            "Joined reviews: {} of {} nominees have one ({} review rows dropped)",
            report.reviews_joined, report.nominees, report.reviews_dropped
        );

        // Step 2: pivot and match against the joined slate
        let pivot = self.pivot_engine.pivot(mentions);
        report.mentions_in = pivot.mentions_in;
        report.mentions_discarded = pivot.mentions_discarded;
        report.pivot_rows = pivot.rows.len();
        ensure_unique_pivot(&pivot.rows)?;
        info!(
            "Pivoted {} mentions into {} film rows over {} awards",
            pivot.mentions_in,
            pivot.rows.len(),
            pivot.awards.len()
        );

        let titles_by_year = titles_by_year(&rows);
        let outcome = self.matcher.match_rows(pivot.rows, &titles_by_year);
        report.matching = outcome.stats;

        // Steps 3 and 4: keep resolved rows, one per nominee
        let matched = coalesce_matches(outcome.rows, &mut report);
        let rows = attach_awards(rows, &matched, &pivot.awards, &mut report);

        // Step 6
        let rows = self.feature_engineer.engineer(rows);

        if rows.len() != nominees.len() {
            return Err(PipelineError::RowCountDrift {
                expected: nominees.len(),
                actual: rows.len(),
            });
        }

        info!(
            "Built master table: {} rows, {} award columns in {:.2?}",
            rows.len(),
            pivot.awards.len() * 2,
            start_time.elapsed()
        );
        Ok(MasterTable {
            award_columns: pivot.awards,
            rows,
            report,
        })
    }
}

/// Merge with default settings.
pub fn build_master(
    nominees: &[NomineeRecord],
    reviews: &[ReviewRecord],
    mentions: &[AwardMention],
) -> Result<MasterTable> {
    MasterBuilder::new().build(nominees, reviews, mentions)
}

/// Left join: every nominee kept, reviews attached by exact key.
fn join_reviews(
    nominees: &[NomineeRecord],
    reviews: &[ReviewRecord],
    report: &mut MergeReport,
) -> Result<Vec<MasterRow>> {
    check_unique(
        "nominees",
        nominees.iter().map(|n| (n.ceremony_year, n.nominated_title.as_str())),
    )?;
    check_unique(
        "reviews",
        reviews.iter().map(|r| (r.ceremony_year, r.nominated_title.as_str())),
    )?;

    let mut by_key: HashMap<(CeremonyYear, &str), &ReviewRecord> = reviews
        .iter()
        .map(|r| ((r.ceremony_year, r.nominated_title.as_str()), r))
        .collect();

    let rows: Vec<MasterRow> = nominees
        .iter()
        .map(|nominee| {
            let review = by_key
                .remove(&(nominee.ceremony_year, nominee.nominated_title.as_str()))
                .cloned();
            MasterRow::new(nominee.clone(), review)
        })
        .collect();

    report.reviews_joined = rows.iter().filter(|r| r.review.is_some()).count();
    report.reviews_dropped = by_key.len();
    for (year, title) in by_key.keys() {
        debug!("Review row ({}, {:?}) has no nominee", year, title);
    }
    Ok(rows)
}

/// Candidate titles per year, taken from the joined rows in nominee order.
fn titles_by_year(rows: &[MasterRow]) -> BTreeMap<CeremonyYear, Vec<String>> {
    let mut by_year: BTreeMap<CeremonyYear, Vec<String>> = BTreeMap::new();
    for row in rows {
        by_year
            .entry(row.nominee.ceremony_year)
            .or_default()
            .push(row.nominee.nominated_title.clone());
    }
    by_year
}

/// The pivot must hold at most one row per (year, film).
fn ensure_unique_pivot(rows: &[AwardPivotRow]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for row in rows {
        if !seen.insert((row.ceremony_year, row.film.as_str())) {
            return Err(PipelineError::JoinCardinality {
                ceremony_year: row.ceremony_year,
                film: row.film.clone(),
            });
        }
    }
    Ok(())
}

/// Award results collected for one nominee, with the match score behind each.
struct CoalescedRow {
    row: AwardPivotRow,
    scores: BTreeMap<String, f64>,
}

impl CoalescedRow {
    fn new(row: AwardPivotRow, score: f64) -> Self {
        let scores = row.results.keys().map(|award| (award.clone(), score)).collect();
        Self { row, scores }
    }

    /// Per award the closer spelling decides; equal scores OR their results.
    fn merge(&mut self, other: &AwardPivotRow, score: f64) {
        for (award, &won) in &other.results {
            match self.scores.get(award).copied() {
                Some(kept) if kept > score => {}
                Some(kept) if kept == score => self.row.record(award, won),
                _ => {
                    self.row.results.insert(award.clone(), won);
                    self.scores.insert(award.clone(), score);
                }
            }
        }
    }
}

/// Drop unresolved rows and fold spellings that resolved to the same nominee.
///
/// Two scraped names can land on one canonical title ("Mad Max: Fury Road"
/// and "Mad Max Fury Road" from different award pages). Awards only one of
/// them carries are unioned. When both carry the same award, the result from
/// the spelling closer to the canonical title is kept, so a near-miss film
/// cannot hand its win to the nominee.
fn coalesce_matches(
    rows: Vec<MatchedPivotRow>,
    report: &mut MergeReport,
) -> HashMap<(CeremonyYear, String), AwardPivotRow> {
    let mut matched: HashMap<(CeremonyYear, String), CoalescedRow> = HashMap::new();

    for MatchedPivotRow {
        row,
        nominated_title,
        best_score,
    } in rows
    {
        let Some(title) = nominated_title else {
            continue;
        };
        let score = best_score.unwrap_or(0.0);
        match matched.get_mut(&(row.ceremony_year, title.clone())) {
            Some(existing) => {
                warn!(
                    "[{}] {:?} and {:?} both resolve to {:?}; merging their award results",
                    row.ceremony_year, existing.row.film, row.film, title
                );
                existing.merge(&row, score);
                report.spellings_coalesced += 1;
            }
            None => {
                matched.insert((row.ceremony_year, title), CoalescedRow::new(row, score));
            }
        }
    }

    matched
        .into_iter()
        .map(|(key, coalesced)| (key, coalesced.row))
        .collect()
}

/// Left join matched award rows onto nominees and fill absence with 0.
fn attach_awards(
    rows: Vec<MasterRow>,
    matched: &HashMap<(CeremonyYear, String), AwardPivotRow>,
    awards: &[String],
    report: &mut MergeReport,
) -> Vec<MasterRow> {
    rows.into_iter()
        .map(|mut row| {
            let key = (row.nominee.ceremony_year, row.nominee.nominated_title.clone());
            let pivot_row = matched.get(&key);
            if pivot_row.is_some() {
                report.nominees_with_awards += 1;
            }

            row.awards = awards
                .iter()
                .map(|award| {
                    let won = pivot_row.and_then(|p| p.results.get(award)).copied();
                    let flags = AwardFlags {
                        won: won.unwrap_or(false) as u8,
                        nominated: won.is_some() as u8,
                    };
                    (award.clone(), flags)
                })
                .collect();
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::Normalizer;
    use crate::traits::SimilarityScorer;
    use data_loader::DataLoadError;

    fn nominee(year: CeremonyYear, title: &str, won: bool) -> NomineeRecord {
        NomineeRecord::bare(year, title, won)
    }

    fn mention(year: CeremonyYear, film: &str, award: &str, won: bool) -> AwardMention {
        AwardMention::new(year, film, award, won)
    }

    #[test]
    fn test_nomadland_scenario() {
        let nominees = vec![nominee(2021, "Nomadland", true)];
        let mut review = ReviewRecord::new(2021, "Nomadland");
        review.rt_score = Some(94);
        let mentions = vec![
            mention(2021, "Nomadland", "PGA", true),
            mention(2021, "Nomadland", "BAFTA", false),
        ];

        let table = build_master(&nominees, &[review], &mentions).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.award_columns, vec!["BAFTA", "PGA"]);
        let row = &table.rows[0];
        assert_eq!(row.award("PGA"), AwardFlags { won: 1, nominated: 1 });
        assert_eq!(row.award("BAFTA"), AwardFlags { won: 0, nominated: 1 });
        assert_eq!(row.features.total_precursor_wins, 1);
        assert_eq!(row.features.total_precursor_noms, 2);
        assert_eq!(row.review.as_ref().unwrap().rt_score, Some(94));
    }

    #[test]
    fn test_nominee_without_award_rows_gets_zeros() {
        let nominees = vec![nominee(2021, "Nomadland", true), nominee(2021, "Mank", false)];
        let mentions = vec![mention(2021, "Nomadland", "PGA", true)];

        let table = build_master(&nominees, &[], &mentions).unwrap();
        let mank = &table.rows[1];

        assert_eq!(mank.nominee.nominated_title, "Mank");
        assert_eq!(mank.award("PGA"), AwardFlags { won: 0, nominated: 0 });
        assert_eq!(mank.awards.len(), 1);
        assert!(mank.review.is_none());
        assert_eq!(table.report.nominees_with_awards, 1);
    }

    #[test]
    fn test_reviews_never_add_rows() {
        let nominees = vec![nominee(2021, "Nomadland", true)];
        let reviews = vec![ReviewRecord::new(2021, "Nomadland"), ReviewRecord::new(2021, "Tenet")];

        let table = build_master(&nominees, &reviews, &[]).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.report.reviews_joined, 1);
        assert_eq!(table.report.reviews_dropped, 1);
        assert!(table.award_columns.is_empty());
    }

    #[test]
    fn test_unmatched_mentions_do_not_attach() {
        let nominees = vec![nominee(2021, "Nomadland", true)];
        let mentions = vec![
            mention(2021, "Borat Subsequent Moviefilm", "GG_comedy", true),
            mention(2020, "Nomadland", "PGA", true),
        ];

        let table = build_master(&nominees, &[], &mentions).unwrap();
        let row = &table.rows[0];

        assert_eq!(row.award("GG_comedy"), AwardFlags::default());
        assert_eq!(row.award("PGA"), AwardFlags::default());
        assert_eq!(table.report.matching.below_threshold, 1);
        assert_eq!(table.report.matching.missing_candidate_rows, 1);
    }

    #[test]
    fn test_spellings_of_one_nominee_are_coalesced() {
        let nominees = vec![nominee(2016, "Mad Max: Fury Road", false)];
        let mentions = vec![
            mention(2016, "Mad Max: Fury Road", "BAFTA", false),
            mention(2016, "Mad Max Fury Road", "CCA", true),
        ];

        let table = build_master(&nominees, &[], &mentions).unwrap();
        let row = &table.rows[0];

        assert_eq!(table.len(), 1);
        assert_eq!(row.award("BAFTA"), AwardFlags { won: 0, nominated: 1 });
        assert_eq!(row.award("CCA"), AwardFlags { won: 1, nominated: 1 });
        assert_eq!(table.report.spellings_coalesced, 1);
    }

    #[test]
    fn test_closer_spelling_decides_a_shared_award() {
        let nominees = vec![nominee(2016, "Mad Max: Fury Road", false)];
        let mentions = vec![
            mention(2016, "Mad Max: Fury Road", "BAFTA", false),
            mention(2016, "Mad Max Fury Roads", "BAFTA", true),
            mention(2016, "Mad Max Fury Roads", "CCA", true),
        ];

        let table = build_master(&nominees, &[], &mentions).unwrap();
        let row = &table.rows[0];

        assert_eq!(row.award("BAFTA"), AwardFlags { won: 0, nominated: 1 });
        assert_eq!(row.award("CCA"), AwardFlags { won: 1, nominated: 1 });
        assert_eq!(table.report.spellings_coalesced, 1);
    }

    #[test]
    fn test_custom_pivot_engine_is_used() {
        let nominees = vec![nominee(2006, "Crash", true)];
        let mentions = vec![mention(2006, "...", "PGA", false)];
        let strict = AwardPivotEngine::new()
            .with_normalizer(Normalizer::new().with_strip_trailing_period(true));

        let lenient = build_master(&nominees, &[], &mentions).unwrap();
        let table = MasterBuilder::new()
            .with_pivot_engine(strict)
            .build(&nominees, &[], &mentions)
            .unwrap();

        assert_eq!(lenient.report.mentions_discarded, 0);
        assert_eq!(table.report.mentions_discarded, 1);
        assert!(table.award_columns.is_empty());
    }

    struct AlwaysSame;

    impl SimilarityScorer for AlwaysSame {
        fn name(&self) -> &str {
            "always_same"
        }

        fn score(&self, _scraped: &str, _canonical: &str) -> f64 {
            100.0
        }
    }

    #[test]
    fn test_custom_matcher_is_used() {
        let nominees = vec![nominee(2021, "Nomadland", true)];
        let mentions = vec![mention(2021, "Borat Subsequent Moviefilm", "GG_comedy", true)];
        let builder =
            MasterBuilder::new().with_matcher(FuzzyTitleMatcher::default().with_scorer(AlwaysSame));

        let table = builder.build(&nominees, &[], &mentions).unwrap();

        assert_eq!(builder.matcher().scorer_name(), "always_same");
        assert_eq!(table.rows[0].award("GG_comedy"), AwardFlags { won: 1, nominated: 1 });
    }

    #[test]
    fn test_duplicate_nominee_is_fatal() {
        let nominees = vec![nominee(2021, "Nomadland", true), nominee(2021, "Nomadland", true)];
        let err = build_master(&nominees, &[], &[]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidInput(DataLoadError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_duplicate_review_is_fatal() {
        let nominees = vec![nominee(2021, "Nomadland", true)];
        let reviews = vec![
            ReviewRecord::new(2021, "Nomadland"),
            ReviewRecord::new(2021, "Nomadland"),
        ];
        assert!(build_master(&nominees, &reviews, &[]).is_err());
    }

    #[test]
    fn test_ensure_unique_pivot() {
        let rows = vec![
            AwardPivotRow::new(2021, "Nomadland"),
            AwardPivotRow::new(2021, "Nomadland"),
        ];
        assert!(matches!(
            ensure_unique_pivot(&rows),
            Err(PipelineError::JoinCardinality { ceremony_year: 2021, .. })
        ));
        assert!(ensure_unique_pivot(&rows[..1]).is_ok());
    }

    #[test]
    fn test_sources_are_concatenated() {
        let nominees = vec![nominee(2021, "Nomadland", true)];
        let bafta = vec![mention(2021, "Nomadland", "BAFTA", true)];
        let sag = vec![mention(2021, "Nomadland", "SAG", false)];

        let table = MasterBuilder::new()
            .build_from_sources(&nominees, &[], &[&bafta, &sag])
            .unwrap();

        assert_eq!(table.award_columns, vec!["BAFTA", "SAG"]);
        assert_eq!(table.rows[0].features.total_precursor_noms, 2);
        assert_eq!(table.report.mentions_in, 2);
    }

    #[test]
    fn test_output_follows_nominee_order() {
        let nominees = vec![
            nominee(2021, "The Father", false),
            nominee(2020, "Parasite", true),
            nominee(2021, "Minari", false),
        ];
        let table = build_master(&nominees, &[], &[]).unwrap();
        let titles: Vec<_> = table
            .rows
            .iter()
            .map(|r| r.nominee.nominated_title.as_str())
            .collect();
        assert_eq!(titles, vec!["The Father", "Parasite", "Minari"]);
    }
}
