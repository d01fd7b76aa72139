use clap::Parser;
use imdb_catalog::constants::DEFAULT_PAGE_ITEM_LIMIT;
use imdb_catalog::parser::extract_page;
use std::path::PathBuf;

/// Run the record extractor over a saved listing page and print the result as JSON
#[derive(Parser)]
#[command(name = "inspect-page")]
struct Args {
    /// Saved HTML of one listing page
    file: PathBuf,
    /// Zero-based page index, used for fallback ranks
    #[arg(long, default_value_t = 0)]
    page: usize,
    #[arg(long, default_value_t = DEFAULT_PAGE_ITEM_LIMIT)]
    limit: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let html = std::fs::read_to_string(&args.file)?;

    let offset = (args.page * args.limit) as u32;
    let extraction = extract_page(&html, offset, args.limit);

    println!("{}", serde_json::to_string_pretty(&extraction.records)?);
    eprintln!(
        "🔢 {} entries detected, {} extracted, {} dropped without title",
        extraction.nodes_seen,
        extraction.records.len(),
        extraction.dropped
    );
    Ok(())
}
