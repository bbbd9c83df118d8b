//! Token-order-insensitive title similarity.
//!
//! Every scorer here first brings both titles to a sorted-token form, so
//! "Birdman or (The Unexpected Virtue of Ignorance)" and "Birdman" are
//! compared on words rather than on where a subtitle was placed:
//!
//! 1. lowercase
//! 2. every non-alphanumeric character becomes a space
//! 3. split on whitespace, sort tokens, rejoin with single spaces
//!
//! The default scorer then applies a normalized InDel ratio
//! (`2 * LCS / (len_a + len_b)`), the metric the 82-point threshold was
//! tuned against.

use crate::traits::SimilarityScorer;

/// Which scoring function a matcher uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScorerKind {
    #[default]
    TokenSort,
    JaroWinkler,
    Levenshtein,
}

impl ScorerKind {
    pub fn build(self) -> Box<dyn SimilarityScorer> {
        match self {
            ScorerKind::TokenSort => Box::new(TokenSortRatio),
            ScorerKind::JaroWinkler => Box::new(TokenSortJaroWinkler),
            ScorerKind::Levenshtein => Box::new(TokenSortLevenshtein),
        }
    }
}

/// Lowercase, strip punctuation, sort tokens.
pub fn token_sort_key(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Normalized InDel similarity of two strings, 0-100.
///
/// InDel distance is `len_a + len_b - 2 * LCS`, so the ratio reduces to
/// `200 * LCS / (len_a + len_b)`. Computed in that form so integral scores
/// come out exact. Two empty strings are identical.
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    (200 * lcs_len(&a, &b)) as f64 / total as f64
}

/// Longest common subsequence length, single-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut row = vec![0usize; short.len() + 1];

    for &lc in long {
        let mut diag = 0;
        for (j, &sc) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if lc == sc {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }
    row[short.len()]
}

/// Sorted tokens + InDel ratio. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl SimilarityScorer for TokenSortRatio {
    fn name(&self) -> &str {
        "token_sort_ratio"
    }

    fn score(&self, scraped: &str, canonical: &str) -> f64 {
        indel_ratio(&token_sort_key(scraped), &token_sort_key(canonical))
    }
}

/// Sorted tokens + Jaro-Winkler, scaled to 0-100.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortJaroWinkler;

impl SimilarityScorer for TokenSortJaroWinkler {
    fn name(&self) -> &str {
        "token_sort_jaro_winkler"
    }

    fn score(&self, scraped: &str, canonical: &str) -> f64 {
        strsim::jaro_winkler(&token_sort_key(scraped), &token_sort_key(canonical)) * 100.0
    }
}

/// Sorted tokens + normalized Levenshtein, scaled to 0-100.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortLevenshtein;

impl SimilarityScorer for TokenSortLevenshtein {
    fn name(&self) -> &str {
        "token_sort_levenshtein"
    }

    fn score(&self, scraped: &str, canonical: &str) -> f64 {
        strsim::normalized_levenshtein(&token_sort_key(scraped), &token_sort_key(canonical)) * 100.0
    }
}
