use super::dedupe::dedupe_session;
use super::snapshot::persist_to_json;
use super::writer::{write_batch, WriteReport};
use crate::browser::PageSource;
use crate::config::ScrapeConfig;
use crate::constants::ITEM_SELECTOR;
use crate::error::Result;
use crate::parser::extract_page;
use crate::storage::MovieStore;
use chrono::{DateTime, Utc};
use metrics::histogram;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Inputs of one scrape-and-load session.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub urls: Vec<String>,
    pub max_catalog_size: usize,
    pub page_item_limit: usize,
    pub ready_timeout: Duration,
    pub snapshot_dir: Option<PathBuf>,
}

impl ScrapeOptions {
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self {
            urls: config.list_urls.clone(),
            max_catalog_size: config.max_catalog_size,
            page_item_limit: config.page_item_limit,
            ready_timeout: config.ready_timeout(),
            snapshot_dir: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScrapeSummary<Id> {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub pages: usize,
    pub nodes_seen: usize,
    pub extracted: usize,
    pub dropped_unusable: usize,
    pub unique: usize,
    pub snapshot: Option<PathBuf>,
    pub writes: WriteReport<Id>,
    /// Documents in the collection after the session.
    pub final_count: u64,
}

/// Loads every listing page, extracts and dedupes the entries, writes the
/// new ones and reports the collection size afterwards.
///
/// A page that cannot be loaded or a store that cannot be reached ends the
/// session with an error; unusable entries and rejected inserts do not.
pub async fn run_scrape<P, S>(source: &P, store: &S, options: &ScrapeOptions) -> Result<ScrapeSummary<S::Id>>
where
    P: PageSource + ?Sized,
    S: MovieStore + ?Sized,
{
    let run_id = Uuid::new_v4();
    scrape_session(run_id, source, store, options)
        .instrument(info_span!("scrape", %run_id))
        .await
}

async fn scrape_session<P, S>(
    run_id: Uuid,
    source: &P,
    store: &S,
    options: &ScrapeOptions,
) -> Result<ScrapeSummary<S::Id>>
where
    P: PageSource + ?Sized,
    S: MovieStore + ?Sized,
{
    let started_at = Utc::now();
    let t_session = Instant::now();

    let mut batch = Vec::new();
    let mut nodes_seen = 0;
    let mut dropped_unusable = 0;

    for (page_idx, url) in options.urls.iter().enumerate() {
        info!("Page {}: {}", page_idx + 1, url);
        let html = source.load(url, ITEM_SELECTOR, options.ready_timeout).await?;

        let offset = rank_offset(page_idx, options.page_item_limit);
        let page = extract_page(&html, offset, options.page_item_limit);
        info!(
            "Page {}: {} entries detected, {} usable, {} dropped",
            page_idx + 1,
            page.nodes_seen,
            page.records.len(),
            page.dropped
        );

        nodes_seen += page.nodes_seen;
        dropped_unusable += page.dropped;
        batch.extend(page.records);
    }

    let extracted = batch.len();
    let unique = dedupe_session(batch, options.max_catalog_size);
    info!("Prepared {} unique records from {} extracted", unique.len(), extracted);

    let snapshot = match &options.snapshot_dir {
        Some(dir) => {
            let path = persist_to_json(&unique, dir)?;
            info!("Saved session snapshot to {}", path.display());
            Some(path)
        }
        None => None,
    };

    let writes = write_batch(store, &unique).await?;
    let final_count = store.count_documents().await?;

    histogram!("catalog_scrape_duration_seconds").record(t_session.elapsed().as_secs_f64());
    info!(
        "Session complete: {} inserted, {} skipped, {} failed; {} documents in store",
        writes.inserted(),
        writes.skipped(),
        writes.failed(),
        final_count
    );

    Ok(ScrapeSummary {
        run_id,
        started_at,
        finished_at: Utc::now(),
        pages: options.urls.len(),
        nodes_seen,
        extracted,
        dropped_unusable,
        unique: unique.len(),
        snapshot,
        writes,
        final_count,
    })
}

/// Entries on pages before `page_idx`, saturating at `u32::MAX`.
fn rank_offset(page_idx: usize, page_item_limit: usize) -> u32 {
    u32::try_from(page_idx.saturating_mul(page_item_limit)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_offset_counts_earlier_pages() {
        assert_eq!(rank_offset(0, 250), 0);
        assert_eq!(rank_offset(2, 250), 500);
    }

    #[test]
    fn rank_offset_saturates_instead_of_truncating() {
        assert_eq!(rank_offset(2, usize::MAX), u32::MAX);
        assert_eq!(rank_offset(3, usize::MAX / 2), u32::MAX);
    }
}
