use clap::Parser;
use imdb_catalog::config::AppConfig;
use imdb_catalog::confirm::{AssumeYes, Confirmation, TerminalPrompt};
use imdb_catalog::pipeline::{wipe_collection, WipeOutcome};
use imdb_catalog::storage::MongoStore;
use std::path::PathBuf;

/// Delete every document in the configured movie collection
#[derive(Parser)]
#[command(name = "clear-collection")]
struct Args {
    /// Path to the TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;

    let target = format!("{}.{}", config.mongo.database, config.mongo.collection);
    println!("⚠️  WARNING: This will delete ALL documents from '{}'!", target);

    let gate: Box<dyn Confirmation> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompt)
    };

    let store = MongoStore::connect(&config.mongo).await?;
    let result = wipe_collection(&store, &target, gate.as_ref()).await;
    store.shutdown().await;

    match result? {
        WipeOutcome::Deleted(count) => println!("✅ Deleted {} documents.", count),
        WipeOutcome::Cancelled => println!("❌ Operation cancelled."),
    }
    Ok(())
}
