use super::node::{parse_selector, ITEM};
use super::record::extract_record;
use crate::error::Result;
use crate::types::MovieRecord;
use scraper::Html;
use tracing::{debug, warn};

/// Usable records pulled from one listing page.
#[derive(Debug, Default)]
pub struct PageExtraction {
    pub records: Vec<MovieRecord>,
    /// Entry nodes present on the page, before the per-page limit.
    pub nodes_seen: usize,
    /// Entries dropped because no title could be recovered.
    pub dropped: usize,
}

/// Extracts up to `item_limit` entries from a listing page.
///
/// `rank_offset` is the number of entries on earlier pages; the fallback rank
/// of the i-th entry (1-based) is `rank_offset + i`.
pub fn extract_page(html: &str, rank_offset: u32, item_limit: usize) -> PageExtraction {
    let document = Html::parse_document(html);
    let items: Vec<_> = document.select(&ITEM.selector).collect();
    let mut extraction = PageExtraction {
        nodes_seen: items.len(),
        ..Default::default()
    };

    for (idx, item) in items.iter().take(item_limit).enumerate() {
        let position = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        let ordinal = rank_offset.saturating_add(position);
        let record = extract_record(item, ordinal);
        if record.is_usable() {
            extraction.records.push(record);
        } else {
            warn!(ordinal, "Dropping catalog entry: no title recoverable");
            extraction.dropped += 1;
        }
    }

    debug!(
        "Extracted {} records from {} nodes ({} dropped)",
        extraction.records.len(),
        extraction.nodes_seen,
        extraction.dropped
    );
    extraction
}

/// Number of elements in `html` matching `css`.
pub fn count_matches(html: &str, css: &str) -> Result<usize> {
    let selector = parse_selector(css)?;
    let document = Html::parse_document(html);
    let count = document.select(&selector).count();
    Ok(count)
}
