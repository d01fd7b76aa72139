use crate::types::{IdentityKey, MovieRecord};
use std::collections::HashSet;
use tracing::debug;

/// Collapses a session's records to one per identity key, keeping the first
/// occurrence in input order, then caps the result at `max_catalog_size`.
pub fn dedupe_session(records: Vec<MovieRecord>, max_catalog_size: usize) -> Vec<MovieRecord> {
    let input_len = records.len();
    let mut seen: HashSet<IdentityKey> = HashSet::with_capacity(input_len);
    let mut unique: Vec<MovieRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.identity_key()))
        .collect();

    let duplicates = input_len - unique.len();
    unique.truncate(max_catalog_size);
    debug!(
        "Session dedupe: {} in, {} repeated, {} kept (cap {})",
        input_len,
        duplicates,
        unique.len(),
        max_catalog_size
    );
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, year: i32, rank: u32) -> MovieRecord {
        MovieRecord::new(title, Some(year)).with_rank(rank)
    }

    #[test]
    fn first_occurrence_wins() {
        let batch = vec![movie("Dune", 2021, 1), movie("Dune", 2021, 2), movie("Arrival", 2016, 3)];
        let out = dedupe_session(batch, 500);
        assert_eq!(out, vec![movie("Dune", 2021, 1), movie("Arrival", 2016, 3)]);
    }

    #[test]
    fn same_title_different_year_are_distinct() {
        let batch = vec![movie("Dune", 2021, 1), movie("Dune", 1984, 2)];
        assert_eq!(dedupe_session(batch, 500).len(), 2);
    }

    #[test]
    fn caps_to_max_catalog_size() {
        let batch: Vec<_> = (1..=10).map(|i| movie(&format!("M{i}"), 2000, i)).collect();
        let out = dedupe_session(batch, 4);
        let ranks: Vec<_> = out.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn idempotent_and_order_preserving() {
        let batch = vec![
            movie("C", 3, 1),
            movie("A", 1, 2),
            movie("C", 3, 3),
            movie("B", 2, 4),
            movie("A", 1, 5),
        ];
        let once = dedupe_session(batch.clone(), 500);
        let twice = dedupe_session(once.clone(), 500);
        assert_eq!(once, twice);
        let titles: Vec<_> = once.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
        assert!(once.len() <= batch.len());
    }
}
