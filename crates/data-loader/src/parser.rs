//! Parser for the source CSV tables.
//!
//! - 01_tmdb.csv: one row per nominee with catalog metadata
//! - 02_omdb.csv: one row per nominee with review-aggregator fields
//! - 03_award_mentions.csv: ceremony_year,film,award,won in long format
//!
//! Headers are matched by name and unknown columns are ignored, so tables
//! written by older fetcher versions still load. Individual values go through
//! the `lenient_*` helpers: a bad number becomes `None`, never an error.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Tokens the upstream fetchers use for "no value"
const NULL_TOKENS: [&str; 5] = ["n/a", "nan", "none", "null", "<na>"];

fn is_null_token(s: &str) -> bool {
    s.is_empty() || NULL_TOKENS.iter().any(|t| s.eq_ignore_ascii_case(t))
}

/// Deserialize every row of a CSV table from any reader.
///
/// `label` is only used for error messages.
pub fn read_table<T, R>(reader: R, label: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize().enumerate() {
        let row: T = result.map_err(|source| DataLoadError::CsvError {
            file: label.to_string(),
            record: Some(idx as u64 + 1),
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the nominee + metadata table
pub fn parse_nominees(path: &Path) -> Result<Vec<NomineeRecord>> {
    read_table(open(path)?, &file_label(path))
}

/// Parse the review table
pub fn parse_reviews(path: &Path) -> Result<Vec<ReviewRecord>> {
    read_table(open(path)?, &file_label(path))
}

/// Parse the long-format award mention table
pub fn parse_mentions(path: &Path) -> Result<Vec<AwardMention>> {
    read_table(open(path)?, &file_label(path))
}

// =============================================================================
// Lenient field deserializers
// =============================================================================

/// Trimmed text, with null tokens mapped to `None`.
pub(crate) fn lenient_string<'de, D>(d: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.and_then(|s| {
        let t = s.trim();
        if is_null_token(t) { None } else { Some(t.to_string()) }
    }))
}

pub(crate) fn lenient_f64<'de, D>(d: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(d)?.and_then(|s| parse_f64(&s)))
}

pub(crate) fn lenient_i64<'de, D>(d: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(d)?.and_then(|s| parse_i64(&s)))
}

/// 0/1, true/false, yes/no in any case; anything else reads as `false`.
pub(crate) fn lenient_flag<'de, D>(d: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(d)?.is_some_and(|s| parse_flag(&s)))
}

fn parse_f64(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integer the way the review source formats them.
///
/// Accepts plain integers, integral floats (`"94.0"`, what a table with
/// missing values round-trips to), and grouped or decorated amounts such as
/// `"$1,234,567"`, `"1,234"` or `"94%"`.
fn parse_i64(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    if let Ok(v) = s.parse::<f64>() {
        return (v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .then_some(v as i64);
    }
    let decorated = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ',' | '$' | '%' | ' '));
    if !decorated {
        return None;
    }
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn parse_flag(s: &str) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "t" | "yes" | "y" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_i64_variants() {
        assert_eq!(parse_i64("42"), Some(42));
        assert_eq!(parse_i64("94.0"), Some(94));
        assert_eq!(parse_i64("$1,234,567"), Some(1_234_567));
        assert_eq!(parse_i64("1,234"), Some(1_234));
        assert_eq!(parse_i64("94%"), Some(94));
        assert_eq!(parse_i64("12.5"), None);
        assert_eq!(parse_i64("unknown"), None);
        assert_eq!(parse_i64("$"), None);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("True"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("False"));
        assert!(!parse_flag("maybe"));
    }

    #[test]
    fn test_read_nominees_with_nulls() {
        let data = "\
ceremony_year,nominated_title,won_best_picture,budget,revenue,genres,release_date,extra
2021,Nomadland,1,5000000.0,,\"[\"\"Drama\"\"]\",2020-12-04,ignored
2021,The Father,0,N/A,garbage,,,
";
        let rows: Vec<NomineeRecord> = read_table(data.as_bytes(), "01_tmdb.csv").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].nominated_title, "Nomadland");
        assert!(rows[0].won_best_picture);
        assert_eq!(rows[0].budget, Some(5_000_000.0));
        assert_eq!(rows[0].revenue, None);
        assert_eq!(rows[0].genres.as_deref(), Some("[\"Drama\"]"));
        assert_eq!(rows[0].tmdb_id, None);

        assert!(!rows[1].won_best_picture);
        assert_eq!(rows[1].budget, None);
        assert_eq!(rows[1].revenue, None);
        assert_eq!(rows[1].genres, None);
    }

    #[test]
    fn test_read_reviews() {
        let data = "\
ceremony_year,nominated_title,imdb_rating,imdb_votes,rt_score,metacritic,omdb_awards
2021,Nomadland,7.3,\"180,123\",93,89,Won 3 Oscars. 243 wins & 375 nominations total
";
        let rows: Vec<ReviewRecord> = read_table(data.as_bytes(), "02_omdb.csv").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].imdb_rating, Some(7.3));
        assert_eq!(rows[0].imdb_votes, Some(180_123));
        assert_eq!(rows[0].rt_score, Some(93));
        assert_eq!(rows[0].metacritic, Some(89));
        assert!(rows[0].omdb_awards.as_deref().unwrap().starts_with("Won 3"));
    }

    #[test]
    fn test_read_mentions() {
        let data = "\
ceremony_year,film,award,won
2021,Nomadland,PGA_best_picture,1
2021,Minari,PGA_best_picture,0
";
        let rows: Vec<AwardMention> = read_table(data.as_bytes(), "03_award_mentions.csv").unwrap();
        assert_eq!(rows, vec![
            AwardMention::new(2021, "Nomadland", "PGA_best_picture", true),
            AwardMention::new(2021, "Minari", "PGA_best_picture", false),
        ]);
    }

    #[test]
    fn test_bad_year_is_an_error() {
        let data = "ceremony_year,film,award,won\nlast year,Nomadland,PGA,1\n";
        let err = read_table::<AwardMention, _>(data.as_bytes(), "mentions.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::CsvError { record: Some(1), .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_nominees(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
