use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::parser::{parse_mentions, parse_reviews};
use data_loader::{ground_truth, CeremonyYear, SourceTables, MENTIONS_FILE, REVIEWS_FILE};
use pipeline::export::{write_master_csv, MASTER_FILE};
use pipeline::pivot::AwardCell;
use pipeline::{
    AwardPivot, AwardPivotEngine, FuzzyTitleMatcher, MasterBuilder, MasterTable, MatchConfig,
    Normalizer, PivotPolicy, ScorerKind, TieBreak, DEFAULT_THRESHOLD,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// OscarMaster - Best Picture master dataset builder
#[derive(Parser)]
#[command(name = "oscar-master")]
#[command(about = "Merge Best Picture nominees, reviews and precursor awards into one table")]
#[command(long_about = None)]
struct Cli {
    /// Directory holding 01_tmdb.csv, 02_omdb.csv and 03_award_mentions.csv
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full merge and write the master CSV
    Build {
        /// Output path (defaults to <data-dir>/master_dataset.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        matching: MatchArgs,

        /// Use the bundled nominee list instead of 01_tmdb.csv
        #[arg(long)]
        bare_nominees: bool,

        /// Also strip trailing periods from scraped film names
        #[arg(long)]
        strip_trailing_period: bool,
    },

    /// Show how each scraped award film resolved to a nominee
    Matches {
        /// Only show one ceremony
        #[arg(long)]
        year: Option<CeremonyYear>,

        #[command(flatten)]
        matching: MatchArgs,

        /// Use the bundled nominee list instead of 01_tmdb.csv
        #[arg(long)]
        bare_nominees: bool,
    },

    /// Print the wide award pivot before matching
    Pivot {
        /// Only show one ceremony
        #[arg(long)]
        year: Option<CeremonyYear>,
    },
}

#[derive(Args)]
struct MatchArgs {
    /// Minimum similarity (0-100) for a scraped film to match a nominee
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// How to pick between equally scored nominees
    #[arg(long, value_enum, default_value_t = TieBreakArg::Lexicographic)]
    tie_break: TieBreakArg,

    /// Similarity function
    #[arg(long, value_enum, default_value_t = ScorerArg::TokenSort)]
    scorer: ScorerArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum TieBreakArg {
    Lexicographic,
    First,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScorerArg {
    TokenSort,
    JaroWinkler,
    Levenshtein,
}

impl MatchArgs {
    fn config(&self) -> MatchConfig {
        let tie_break = match self.tie_break {
            TieBreakArg::Lexicographic => TieBreak::Lexicographic,
            TieBreakArg::First => TieBreak::FirstInList,
        };
        let scorer = match self.scorer {
            ScorerArg::TokenSort => ScorerKind::TokenSort,
            ScorerArg::JaroWinkler => ScorerKind::JaroWinkler,
            ScorerArg::Levenshtein => ScorerKind::Levenshtein,
        };
        MatchConfig::default()
            .with_threshold(self.threshold)
            .with_tie_break(tie_break)
            .with_scorer(scorer)
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            output,
            matching,
            bare_nominees,
            strip_trailing_period,
        } => {
            let output = output.unwrap_or_else(|| cli.data_dir.join(MASTER_FILE));
            let normalizer = Normalizer::new().with_strip_trailing_period(strip_trailing_period);
            let builder = MasterBuilder::new()
                .with_pivot_engine(AwardPivotEngine::new().with_normalizer(normalizer))
                .with_match_config(matching.config());
            handle_build(&cli.data_dir, &output, &builder, bare_nominees)?
        }
        Commands::Matches {
            year,
            matching,
            bare_nominees,
        } => handle_matches(&cli.data_dir, year, &matching, bare_nominees)?,
        Commands::Pivot { year } => handle_pivot(&cli.data_dir, year)?,
    }

    Ok(())
}

/// Load the source tables, optionally seeding nominees from the bundled list
fn load_tables(data_dir: &Path, bare_nominees: bool) -> Result<SourceTables> {
    println!("Loading source tables from {}...", data_dir.display());
    let start = Instant::now();

    let tables = if bare_nominees {
        let reviews_path = data_dir.join(REVIEWS_FILE);
        let reviews = if reviews_path.exists() {
            parse_reviews(&reviews_path).context("Failed to load reviews")?
        } else {
            Vec::new()
        };
        let mentions = parse_mentions(&data_dir.join(MENTIONS_FILE))
            .context("Failed to load award mentions")?;
        println!(
            "Seeding nominees from the bundled list (version {})",
            ground_truth::GROUND_TRUTH_VERSION
        );
        let tables = SourceTables::new(ground_truth::bare_nominees(), reviews, mentions);
        tables.validate().context("Source tables failed validation")?;
        tables
    } else {
        SourceTables::load_from_dir(data_dir).context("Failed to load source tables")?
    };

    let (nominees, reviews, mentions) = tables.counts();
    println!(
        "{} Loaded {} nominees, {} reviews, {} award mentions in {:?}",
        "✓".green(),
        nominees,
        reviews,
        mentions,
        start.elapsed()
    );
    Ok(tables)
}

/// Handle the 'build' command
fn handle_build(
    data_dir: &Path,
    output: &Path,
    builder: &MasterBuilder,
    bare_nominees: bool,
) -> Result<()> {
    let tables = load_tables(data_dir, bare_nominees)?;

    let table = builder
        .build(&tables.nominees, &tables.reviews, &tables.mentions)
        .context("Failed to build master table")?;

    write_master_csv(&table, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_summary(&table, builder.matcher(), output);
    Ok(())
}

/// Handle the 'matches' command
fn handle_matches(
    data_dir: &Path,
    year: Option<CeremonyYear>,
    matching: &MatchArgs,
    bare_nominees: bool,
) -> Result<()> {
    let tables = load_tables(data_dir, bare_nominees)?;

    let mut titles_by_year = tables.titles_by_year();
    let mut rows = AwardPivotEngine::new().pivot(&tables.mentions).rows;
    if let Some(year) = year {
        titles_by_year.retain(|y, _| *y == year);
        rows.retain(|r| r.ceremony_year == year);
    }

    let matcher = FuzzyTitleMatcher::new(matching.config());
    let outcome = matcher.match_rows(rows, &titles_by_year);

    println!(
        "{}",
        format!("Fuzzy matches ({}, threshold {}):", matcher.scorer_name(), matching.threshold)
            .bold()
            .blue()
    );
    let mut current_year = None;
    for matched in &outcome.rows {
        if current_year != Some(matched.row.ceremony_year) {
            current_year = Some(matched.row.ceremony_year);
            println!("\n{}", matched.row.ceremony_year.to_string().bold());
        }
        let score = matched
            .best_score
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| "-".to_string());
        match &matched.nominated_title {
            Some(title) => {
                println!("  {} {} -> {} ({})", "✓".green(), matched.row.film, title, score)
            }
            None => println!("  {} {} ({})", "✗".red(), matched.row.film, score.yellow()),
        }
    }

    let stats = outcome.stats;
    println!(
        "\n{} matched, {} below threshold, {} in years without nominees",
        stats.matched.to_string().green(),
        stats.below_threshold.to_string().yellow(),
        stats.missing_candidate_rows.to_string().red()
    );
    Ok(())
}

/// Handle the 'pivot' command
fn handle_pivot(data_dir: &Path, year: Option<CeremonyYear>) -> Result<()> {
    let mentions = parse_mentions(&data_dir.join(MENTIONS_FILE))
        .context("Failed to load award mentions")?;
    let selected = mentions
        .iter()
        .filter(|m| year.is_none_or(|y| m.ceremony_year == y));
    let pivot = AwardPivotEngine::new().pivot(selected);

    print_pivot(&pivot);
    Ok(())
}

/// Print the wide table, one line per film; `-` marks an award the film was not in
fn print_pivot(pivot: &AwardPivot) {
    println!(
        "{}",
        format!(
            "Award pivot: {} films x {} awards ({} of {} mentions discarded)",
            pivot.rows.len(),
            pivot.awards.len(),
            pivot.mentions_discarded,
            pivot.mentions_in
        )
        .bold()
        .blue()
    );
    println!("{:<6} {:<45} {}", "year", "film", pivot.awards.join(" "));

    for row in &pivot.rows {
        let cells = pivot
            .awards
            .iter()
            .map(|award| pivot_cell(row.cell(award, PivotPolicy::NullPreserving), award.len()))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{:<6} {:<45} {}", row.ceremony_year, row.film, cells);
    }
}

/// One pivot cell padded to `width` visible characters
fn pivot_cell(cell: AwardCell, width: usize) -> String {
    // Pad before colouring; escape codes would count toward the width
    let padded = |mark: &str| format!("{:width$}", mark, width = width);
    match cell.won {
        Some(1) => padded("W").green().to_string(),
        Some(_) => padded("N"),
        None => padded("-").dimmed().to_string(),
    }
}

/// Helper function to print the run summary after a build
fn print_summary(table: &MasterTable, matcher: &FuzzyTitleMatcher, output: &Path) {
    let report = &table.report;
    print!("{}", "Master dataset built:\n".bold().blue());
    println!("{}Rows: {}", "• ".green(), table.len());
    println!("{}Award columns: {}", "• ".green(), table.award_columns.len() * 2);
    println!(
        "{}Reviews joined: {} ({} without a nominee)",
        "• ".green(),
        report.reviews_joined,
        report.reviews_dropped
    );
    println!(
        "{}Award rows matched: {} of {} ({}, threshold {})",
        "• ".cyan(),
        report.matching.matched,
        report.pivot_rows,
        matcher.scorer_name(),
        matcher.config().threshold
    );
    println!(
        "{}Unmatched: {} below threshold, {} in years without nominees",
        "• ".cyan(),
        report.matching.below_threshold,
        report.matching.missing_candidate_rows
    );
    if report.spellings_coalesced > 0 {
        println!(
            "{}Alternate spellings merged: {}",
            "• ".yellow(),
            report.spellings_coalesced
        );
    }
    println!(
        "{}Nominees with award data: {} of {}",
        "• ".cyan(),
        report.nominees_with_awards,
        report.nominees
    );
    println!("{} Wrote {}", "✓".green(), output.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pivot_cell_padding_ignores_colour() {
        colored::control::set_override(true);
        let won = pivot_cell(AwardCell { won: Some(1), nominated: Some(1) }, 5);
        let absent = pivot_cell(AwardCell { won: None, nominated: None }, 5);
        colored::control::unset_override();

        assert!(won.contains("W    "));
        assert!(won.starts_with('\u{1b}'));
        assert!(absent.contains("-    "));
        assert_eq!(pivot_cell(AwardCell { won: Some(0), nominated: Some(1) }, 5), "N    ");
    }
}
