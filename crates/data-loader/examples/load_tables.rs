use data_loader::SourceTables;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data");

    println!("Loading source tables from {}...\n", data_dir.display());

    let start = Instant::now();
    let tables = SourceTables::load_from_dir(data_dir)
        .expect("Failed to load source tables");
    let elapsed = start.elapsed();

    let (nominees, reviews, mentions) = tables.counts();
    let years = tables.titles_by_year();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Nominees: {}", nominees);
    println!("Reviews: {}", reviews);
    println!("Award mentions: {}", mentions);
    println!("Ceremonies: {}", years.len());
    if let (Some(first), Some(last)) = (years.keys().next(), years.keys().last()) {
        println!("Range: {} - {}", first, last);
    }
}
