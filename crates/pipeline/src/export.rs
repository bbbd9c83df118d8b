//! Flat CSV output of the master table.
//!
//! Column order: nominee columns, review columns (without the join key),
//! `<award>_won, <award>_nominated` per award, then feature columns.
//! Missing values are written as empty fields.

use std::fmt::Display;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::{info, instrument};

use crate::error::Result;
use crate::features::TRACKED_GENRES;
use crate::master::{MasterRow, MasterTable};
use crate::pivot::award_column_names;

/// Default output file name
pub const MASTER_FILE: &str = "master_dataset.csv";

pub const NOMINEE_COLUMNS: [&str; 19] = [
    "ceremony_year",
    "nominated_title",
    "won_best_picture",
    "tmdb_id",
    "tmdb_title",
    "synopsis",
    "tagline",
    "budget",
    "revenue",
    "runtime_min",
    "release_date",
    "original_language",
    "genres",
    "tmdb_popularity",
    "tmdb_vote_avg",
    "tmdb_vote_count",
    "director",
    "cast_top5",
    "production_companies",
];

pub const REVIEW_COLUMNS: [&str; 10] = [
    "imdb_id",
    "imdb_rating",
    "imdb_votes",
    "metacritic",
    "rt_score",
    "box_office_usd",
    "rated",
    "omdb_awards",
    "country",
    "language",
];

const FEATURE_COLUMNS_HEAD: [&str; 12] = [
    "budget_m",
    "revenue_m",
    "log_budget",
    "log_revenue",
    "roi",
    "log_imdb_votes",
    "release_month",
    "is_q4_release",
    "is_english",
    "total_precursor_wins",
    "total_precursor_noms",
    "omdb_oscar_wins",
];

/// Feature column names, genre flags expanded in tracked order.
pub fn feature_columns() -> Vec<String> {
    FEATURE_COLUMNS_HEAD
        .iter()
        .map(|c| c.to_string())
        .chain(TRACKED_GENRES.iter().map(|g| format!("genre_{}", g.to_lowercase())))
        .chain(std::iter::once("critic_composite".to_string()))
        .collect()
}

/// Full header for a table with the given award columns.
pub fn header(awards: &[String]) -> Vec<String> {
    NOMINEE_COLUMNS
        .iter()
        .chain(REVIEW_COLUMNS.iter())
        .map(|c| c.to_string())
        .chain(award_column_names(awards))
        .chain(feature_columns())
        .collect()
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: bool) -> String {
    (value as u8).to_string()
}

fn record(row: &MasterRow, awards: &[String]) -> Vec<String> {
    let n = &row.nominee;
    let mut fields = vec![
        n.ceremony_year.to_string(),
        n.nominated_title.clone(),
        flag(n.won_best_picture),
        opt(n.tmdb_id),
        opt(n.tmdb_title.as_deref()),
        opt(n.synopsis.as_deref()),
        opt(n.tagline.as_deref()),
        opt(n.budget),
        opt(n.revenue),
        opt(n.runtime_min),
        opt(n.release_date.as_deref()),
        opt(n.original_language.as_deref()),
        opt(n.genres.as_deref()),
        opt(n.tmdb_popularity),
        opt(n.tmdb_vote_avg),
        opt(n.tmdb_vote_count),
        opt(n.director.as_deref()),
        opt(n.cast_top5.as_deref()),
        opt(n.production_companies.as_deref()),
    ];

    match &row.review {
        Some(r) => fields.extend([
            opt(r.imdb_id.as_deref()),
            opt(r.imdb_rating),
            opt(r.imdb_votes),
            opt(r.metacritic),
            opt(r.rt_score),
            opt(r.box_office_usd),
            opt(r.rated.as_deref()),
            opt(r.omdb_awards.as_deref()),
            opt(r.country.as_deref()),
            opt(r.language.as_deref()),
        ]),
        None => fields.extend(std::iter::repeat_n(String::new(), REVIEW_COLUMNS.len())),
    }

    for award in awards {
        let flags = row.award(award);
        fields.push(flags.won.to_string());
        fields.push(flags.nominated.to_string());
    }

    let f = &row.features;
    fields.extend([
        opt(f.budget_m),
        opt(f.revenue_m),
        opt(f.log_budget),
        opt(f.log_revenue),
        opt(f.roi),
        opt(f.log_imdb_votes),
        opt(f.release_month),
        f.is_q4_release.to_string(),
        f.is_english.to_string(),
        f.total_precursor_wins.to_string(),
        f.total_precursor_noms.to_string(),
        f.omdb_oscar_wins.to_string(),
    ]);
    fields.extend(f.genre_flags.iter().map(|g| g.to_string()));
    fields.push(opt(f.critic_composite));
    fields
}

/// Write the table as CSV to any writer.
pub fn write_master<W: Write>(table: &MasterTable, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(header(&table.award_columns))?;
    for row in &table.rows {
        out.write_record(record(row, &table.award_columns))?;
    }
    out.flush()?;
    Ok(())
}

/// Write the table to `path`, replacing any existing file.
#[instrument(skip(table), fields(rows = table.len()))]
pub fn write_master_csv(table: &MasterTable, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_master(table, file)?;
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}
