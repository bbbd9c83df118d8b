//! Fuzzy resolution of scraped film names to canonical nominee titles.
//!
//! Award tables spell films their own way ("Birdman or (The Unexpected
//! Virtue of Ignorance)", "Mad Max: Fury Road", "Tar"). Each pivot row is
//! compared only against the nominees of its own ceremony: titles repeat
//! across decades ("Little Women" 1995 / 2020) and a cross-year match would
//! silently credit the wrong film.
//!
//! ## Algorithm
//! 1. Partition pivot rows by ceremony year
//! 2. For a year with no nominees, leave every row unmatched (no scoring)
//! 3. Otherwise score each row against that year's titles, keep the best
//! 4. Attach it when `score >= threshold`, else leave the row unmatched
//!
//! Years are independent, so step 3 runs on the rayon pool; results are
//! reassembled in year order, input order within a year.

use crate::pivot::AwardPivotRow;
use crate::similarity::ScorerKind;
use crate::traits::SimilarityScorer;
use data_loader::CeremonyYear;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Default minimum similarity for a match
pub const DEFAULT_THRESHOLD: f64 = 82.0;

/// How to choose between candidates with the same best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Lexicographically smallest title wins; independent of input order
    #[default]
    Lexicographic,
    /// First title in candidate order wins
    FirstInList,
}

/// Matcher settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    pub threshold: f64,
    pub tie_break: TieBreak,
    pub scorer: ScorerKind,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            tie_break: TieBreak::default(),
            scorer: ScorerKind::default(),
        }
    }
}

impl MatchConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_scorer(mut self, scorer: ScorerKind) -> Self {
        self.scorer = scorer;
        self
    }
}

/// Best candidate for one scraped name
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub title: &'a str,
    pub score: f64,
}

/// A pivot row after matching
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPivotRow {
    pub row: AwardPivotRow,
    /// Canonical title, `None` when unresolved
    pub nominated_title: Option<String>,
    /// Best score seen, `None` when the year had no candidates
    pub best_score: Option<f64>,
}

impl MatchedPivotRow {
    pub fn is_matched(&self) -> bool {
        self.nominated_title.is_some()
    }
}

/// Counters for what happened to each row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub matched: usize,
    pub below_threshold: usize,
    /// Years present in the pivot with no nominee titles
    pub missing_candidate_years: usize,
    /// Rows belonging to those years
    pub missing_candidate_rows: usize,
}

impl MatchStats {
    pub fn unmatched(&self) -> usize {
        self.below_threshold + self.missing_candidate_rows
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub rows: Vec<MatchedPivotRow>,
    pub stats: MatchStats,
}

/// Resolves scraped names against per-year canonical titles.
pub struct FuzzyTitleMatcher {
    config: MatchConfig,
    scorer: Box<dyn SimilarityScorer>,
}

impl FuzzyTitleMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            scorer: config.scorer.build(),
        }
    }

    /// Replace the scoring function, keeping threshold and tie-break
    pub fn with_scorer(mut self, scorer: impl SimilarityScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Highest-scoring candidate regardless of threshold.
    pub fn best_candidate<'a>(
        &self,
        film: &str,
        candidates: &'a [String],
    ) -> Option<ScoredCandidate<'a>> {
        let mut best: Option<ScoredCandidate<'a>> = None;

        for title in candidates {
            let score = self.scorer.score(film, title);
            let better = match &best {
                None => true,
                Some(current) if score > current.score => true,
                Some(current) if score == current.score => match self.config.tie_break {
                    TieBreak::Lexicographic => title.as_str() < current.title,
                    TieBreak::FirstInList => false,
                },
                Some(_) => false,
            };
            if better {
                best = Some(ScoredCandidate { title: title.as_str(), score });
            }
        }
        best
    }

    /// Best candidate if it clears the threshold.
    pub fn resolve<'a>(&self, film: &str, candidates: &'a [String]) -> Option<ScoredCandidate<'a>> {
        self.best_candidate(film, candidates)
            .filter(|c| c.score >= self.config.threshold)
    }

    /// Attach canonical titles to pivot rows, one ceremony year at a time.
    #[instrument(skip_all, fields(rows = rows.len(), scorer = self.scorer.name()))]
    pub fn match_rows(
        &self,
        rows: Vec<AwardPivotRow>,
        titles_by_year: &BTreeMap<CeremonyYear, Vec<String>>,
    ) -> MatchOutcome {
        let mut by_year: BTreeMap<CeremonyYear, Vec<AwardPivotRow>> = BTreeMap::new();
        for row in rows {
            by_year.entry(row.ceremony_year).or_default().push(row);
        }

        let per_year: Vec<(Vec<MatchedPivotRow>, MatchStats)> = by_year
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(year, rows)| self.match_year(year, rows, titles_by_year.get(&year)))
            .collect();

        let mut outcome = MatchOutcome::default();
        for (rows, stats) in per_year {
            outcome.rows.extend(rows);
            outcome.stats.matched += stats.matched;
            outcome.stats.below_threshold += stats.below_threshold;
            outcome.stats.missing_candidate_years += stats.missing_candidate_years;
            outcome.stats.missing_candidate_rows += stats.missing_candidate_rows;
        }

        info!(
            matched = outcome.stats.matched,
            below_threshold = outcome.stats.below_threshold,
            missing_candidate_rows = outcome.stats.missing_candidate_rows,
            "Fuzzy matching complete"
        );
        outcome
    }

    fn match_year(
        &self,
        year: CeremonyYear,
        rows: Vec<AwardPivotRow>,
        candidates: Option<&Vec<String>>,
    ) -> (Vec<MatchedPivotRow>, MatchStats) {
        let mut stats = MatchStats::default();

        let candidates = match candidates {
            Some(c) if !c.is_empty() => c,
            _ => {
                warn!(
                    "No nominees for ceremony {}; skipping {} award rows",
                    year,
                    rows.len()
                );
                stats.missing_candidate_years = 1;
                stats.missing_candidate_rows = rows.len();
                let unmatched = rows
                    .into_iter()
                    .map(|row| MatchedPivotRow {
                        row,
                        nominated_title: None,
                        best_score: None,
                    })
                    .collect();
                return (unmatched, stats);
            }
        };

        let matched = rows
            .into_iter()
            .map(|row| {
                let best = self.best_candidate(&row.film, candidates);
                let best_score = best.as_ref().map(|c| c.score);
                let nominated_title = best
                    .filter(|c| c.score >= self.config.threshold)
                    .map(|c| c.title.to_string());

                match &nominated_title {
                    Some(title) => {
                        stats.matched += 1;
                        debug!(
                            "[{}] {:?} -> {:?} ({:.1})",
                            year,
                            row.film,
                            title,
                            best_score.unwrap_or(0.0)
                        );
                    }
                    None => {
                        stats.below_threshold += 1;
                        debug!(
                            "[{}] {:?} unmatched (best {:.1} < {})",
                            year,
                            row.film,
                            best_score.unwrap_or(0.0),
                            self.config.threshold
                        );
                    }
                }

                MatchedPivotRow {
                    row,
                    nominated_title,
                    best_score,
                }
            })
            .collect();

        (matched, stats)
    }
}

impl Default for FuzzyTitleMatcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
