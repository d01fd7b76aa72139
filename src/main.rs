use anyhow::Result;
use clap::{Parser, Subcommand};
use imdb_catalog::browser::HttpPageSource;
use imdb_catalog::config::AppConfig;
use imdb_catalog::confirm::{AssumeYes, Confirmation, TerminalPrompt};
use imdb_catalog::constants::DEFAULT_AUDIT_TOP;
use imdb_catalog::logging;
use imdb_catalog::pipeline::{
    audit, run_reconciliation, run_scrape, GroupOutcome, ReconcileRun, ScrapeOptions, ScrapeSummary,
    WriteOutcome,
};
use imdb_catalog::storage::{InMemoryStore, MongoStore, MovieStore};
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "imdb_catalog")]
#[command(about = "Ranked movie catalog scraper with duplicate reconciliation")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the rolling JSON log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the listing pages and insert movies not yet stored
    Scrape {
        /// Listing page URL (repeatable); defaults to the configured pages
        #[arg(long = "url")]
        urls: Vec<String>,
        /// Maximum number of unique movies kept from the session
        #[arg(long)]
        max: Option<usize>,
        /// Also write the deduplicated batch as JSON into this directory
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
        /// Write into an in-memory store instead of MongoDB
        #[arg(long)]
        dry_run: bool,
    },
    /// Print duplicate statistics for the collection
    Audit {
        /// How many duplicate groups to list
        #[arg(long, default_value_t = DEFAULT_AUDIT_TOP)]
        top: usize,
    },
    /// Delete all but the oldest copy of every duplicated movie
    Reconcile {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
        /// How many duplicate groups to list
        #[arg(long, default_value_t = DEFAULT_AUDIT_TOP)]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = logging::init_logging(&cli.log_dir);
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scrape {
            urls,
            max,
            snapshot_dir,
            dry_run,
        } => {
            let mut options = ScrapeOptions::from_config(&config.scrape);
            if !urls.is_empty() {
                options.urls = urls;
            }
            if let Some(max) = max {
                options.max_catalog_size = max;
            }
            options.snapshot_dir = snapshot_dir;

            let source = HttpPageSource::new(&config.scrape)?;
            println!("🔍 Scraping {} listing page(s)...", options.urls.len());

            if dry_run {
                info!("Dry run: writing to an in-memory store");
                let store = InMemoryStore::new();
                let summary = run_scrape(&source, &store, &options).await?;
                print_scrape_summary(&summary);
            } else {
                let store = MongoStore::connect(&config.mongo).await?;
                let result = run_scrape(&source, &store, &options).await;
                store.shutdown().await;
                print_scrape_summary(&result?);
            }
        }
        Commands::Audit { top } => {
            let store = MongoStore::connect(&config.mongo).await?;
            let result = audit(&store).await;
            store.shutdown().await;
            println!("{}", result?.render(top));
        }
        Commands::Reconcile { yes, top } => {
            let store = MongoStore::connect(&config.mongo).await?;
            let gate: Box<dyn Confirmation> = if yes {
                Box::new(AssumeYes)
            } else {
                Box::new(TerminalPrompt)
            };
            let result = reconcile_command(&store, gate.as_ref(), top).await;
            store.shutdown().await;
            result?;
        }
    }
    Ok(())
}

fn print_scrape_summary<Id: Display>(summary: &ScrapeSummary<Id>) {
    println!("\n📊 Session {}:", summary.run_id);
    println!("   Pages: {}", summary.pages);
    println!("   Entries detected: {}", summary.nodes_seen);
    println!("   Extracted: {} ({} dropped without title)", summary.extracted, summary.dropped_unusable);
    println!("   Unique prepared: {}", summary.unique);
    println!("   Inserted: {}", summary.writes.inserted());
    println!("   Skipped (already stored): {}", summary.writes.skipped());
    println!("   Errors: {}", summary.writes.failed());
    if let Some(path) = &summary.snapshot {
        println!("   Snapshot: {}", path.display());
    }

    let failures: Vec<_> = summary
        .writes
        .outcomes
        .iter()
        .filter_map(|o| match o {
            WriteOutcome::Failed { key, reason } => Some((key, reason)),
            _ => None,
        })
        .collect();
    if !failures.is_empty() {
        println!("\n⚠️  Errors encountered:");
        for (key, reason) in failures {
            println!("   - {}: {}", key, reason);
        }
    }
    println!("\n🎉 Done! Total in store: {}", summary.final_count);
}

async fn reconcile_command<S>(store: &S, gate: &dyn Confirmation, top: usize) -> Result<()>
where
    S: MovieStore + ?Sized,
{
    let before = audit(store).await?;
    println!("{}", before.render(top));

    match run_reconciliation(store, &before, gate).await? {
        ReconcileRun::NothingToDo => println!("🎉 Nothing to reconcile."),
        ReconcileRun::Declined => println!("❌ Operation cancelled. No documents were deleted."),
        ReconcileRun::Applied(report) => {
            for group in &report.groups {
                match &group.outcome {
                    GroupOutcome::Deleted { deleted } => println!(
                        "  • {}: kept {}, deleted {}",
                        group.key,
                        group.canonical_id.as_ref().map_or_else(|| "?".to_string(), |id| id.to_string()),
                        deleted
                    ),
                    GroupOutcome::SkippedIncompleteKey => {
                        println!("  ⚠️  {}: skipped, null title or year", group.key)
                    }
                    GroupOutcome::AlreadyUnique => println!("  • {}: already unique", group.key),
                    GroupOutcome::Failed { reason } => println!("  ❌ {}: {}", group.key, reason),
                }
            }
            println!("\n✅ Deleted {} documents.\n", report.total_deleted);
            println!("{}", report.post_audit.render(top));
            if !report.converged() {
                error!("Duplicates remain after reconciliation; another writer may be active");
                println!("⚠️  Duplicates remain; another writer may be active. Re-run to converge.");
            }
        }
    }
    Ok(())
}
