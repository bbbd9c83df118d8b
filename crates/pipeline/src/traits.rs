//! Core traits for the matching stage.
//!
//! The fuzzy matcher is written against `SimilarityScorer` so the scoring
//! function can be swapped without touching year partitioning, thresholds
//! or tie-breaking.

/// Approximate string similarity on a 0-100 scale.
///
/// ## Design Note
/// - `Send + Sync` because years are matched in parallel against one scorer
/// - Implementations must be symmetric in what they consider "the same film";
///   the matcher only ever compares `score(scraped, canonical)`
pub trait SimilarityScorer: Send + Sync {
    /// Returns the name of this scorer (for logging/debugging)
    fn name(&self) -> &str;

    /// Similarity of two titles, `0.0` (nothing shared) to `100.0` (identical)
    fn score(&self, scraped: &str, canonical: &str) -> f64;
}
