//! Benchmarks for fuzzy title matching
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses the bundled Best Picture slates as canonical titles and a scraped
//! copy of them with footnote markers and a few award bodies per film.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{ground_truth, AwardMention, NomineeRecord};
use pipeline::{build_master, AwardPivotEngine, FuzzyTitleMatcher, MatchConfig, ScorerKind};

const AWARDS: [&str; 4] = ["BAFTA", "CCA", "PGA", "SAG"];

fn scraped_mentions(nominees: &[NomineeRecord]) -> Vec<AwardMention> {
    nominees
        .iter()
        .enumerate()
        .flat_map(|(i, n)| {
            AWARDS.iter().map(move |award| {
                AwardMention::new(
                    n.ceremony_year,
                    format!("{}[{}]", n.nominated_title, i % 7),
                    *award,
                    n.won_best_picture,
                )
            })
        })
        .collect()
}

fn bench_match_rows(c: &mut Criterion) {
    let nominees = ground_truth::bare_nominees();
    let mentions = scraped_mentions(&nominees);
    let pivot = AwardPivotEngine::new().pivot(&mentions);

    let mut titles_by_year = std::collections::BTreeMap::new();
    for n in &nominees {
        titles_by_year
            .entry(n.ceremony_year)
            .or_insert_with(Vec::new)
            .push(n.nominated_title.clone());
    }

    for scorer in [ScorerKind::TokenSort, ScorerKind::JaroWinkler, ScorerKind::Levenshtein] {
        let matcher = FuzzyTitleMatcher::new(MatchConfig::default().with_scorer(scorer));
        c.bench_function(&format!("match_rows_{}", matcher.scorer_name()), |b| {
            b.iter(|| {
                let outcome =
                    matcher.match_rows(black_box(pivot.rows.clone()), black_box(&titles_by_year));
                black_box(outcome)
            })
        });
    }
}

fn bench_build_master(c: &mut Criterion) {
    let nominees = ground_truth::bare_nominees();
    let mentions = scraped_mentions(&nominees);

    c.bench_function("build_master_ground_truth", |b| {
        b.iter(|| {
            let table = build_master(black_box(&nominees), &[], black_box(&mentions))
                .expect("Failed to build master table");
            black_box(table)
        })
    });
}

criterion_group!(benches, bench_match_rows, bench_build_master);
criterion_main!(benches);
