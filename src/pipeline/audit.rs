use crate::error::Result;
use crate::storage::MovieStore;
use crate::types::DuplicateGroup;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{info, instrument};

/// Duplicate statistics for the persisted collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub total_docs: u64,
    pub distinct_keys: u64,
    pub duplicate_groups: u64,
    pub duplicate_docs: u64,
    /// Ordered by descending document count.
    pub groups: Vec<DuplicateGroup>,
}

impl AuditReport {
    /// Derives the statistics from the duplicate groups and a total count.
    ///
    /// Every key not listed in `groups` holds exactly one document, so
    /// `distinct_keys = total_docs - duplicate_docs`.
    pub fn from_groups(total_docs: u64, mut groups: Vec<DuplicateGroup>) -> Self {
        groups.retain(|g| g.count >= 2);
        groups.sort_by(|a, b| b.count.cmp(&a.count));

        let duplicate_docs: u64 = groups.iter().map(DuplicateGroup::extra_count).sum();
        Self {
            total_docs,
            distinct_keys: total_docs.saturating_sub(duplicate_docs),
            duplicate_groups: groups.len() as u64,
            duplicate_docs,
            groups,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups whose key has both a title and a year.
    pub fn reconcilable_groups(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter().filter(|g| g.key.is_complete())
    }

    /// Statistics table followed by up to `top` duplicate groups.
    pub fn render(&self, top: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total documents:        {}", self.total_docs);
        let _ = writeln!(out, "Unique movies:          {}", self.distinct_keys);
        let _ = writeln!(out, "Duplicate groups:       {}", self.duplicate_groups);
        let _ = writeln!(out, "Duplicate documents:    {}", self.duplicate_docs);
        let _ = writeln!(out);

        if self.groups.is_empty() {
            let _ = writeln!(out, "No duplicates found.");
            return out;
        }

        let _ = writeln!(out, "Top duplicate groups (up to {}):", top);
        for group in self.groups.iter().take(top) {
            let _ = writeln!(out, "  • {} → {} copies", group.key, group.count);
        }
        out
    }
}

/// Read-only scan grouping the collection by `(title, year)`.
#[instrument(skip(store))]
pub async fn audit<S>(store: &S) -> Result<AuditReport>
where
    S: MovieStore + ?Sized,
{
    let groups: Vec<DuplicateGroup> = store
        .duplicate_key_counts()
        .await?
        .into_iter()
        .map(|kc| DuplicateGroup {
            key: kc.key,
            count: kc.count,
        })
        .collect();
    let total_docs = store.count_documents().await?;

    let report = AuditReport::from_groups(total_docs, groups);
    info!(
        total_docs = report.total_docs,
        distinct_keys = report.distinct_keys,
        duplicate_groups = report.duplicate_groups,
        duplicate_docs = report.duplicate_docs,
        "Audit complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IdentityKey;

    fn group(title: &str, year: Option<i32>, count: u64) -> DuplicateGroup {
        DuplicateGroup {
            key: IdentityKey::new(title, year),
            count,
        }
    }

    #[test]
    fn statistics_follow_from_groups() {
        let report = AuditReport::from_groups(10, vec![group("Dune", Some(2021), 4)]);
        assert_eq!(report.total_docs, 10);
        assert_eq!(report.duplicate_groups, 1);
        assert_eq!(report.duplicate_docs, 3);
        assert_eq!(report.distinct_keys, 7);
        assert_eq!(report.duplicate_docs, report.total_docs - report.distinct_keys);
    }

    #[test]
    fn groups_sorted_by_descending_count() {
        let report = AuditReport::from_groups(
            20,
            vec![group("A", Some(1), 2), group("B", Some(2), 5), group("C", None, 3)],
        );
        let counts: Vec<_> = report.groups.iter().map(|g| g.count).collect();
        assert_eq!(counts, vec![5, 3, 2]);
        assert_eq!(report.reconcilable_groups().count(), 2);
    }

    #[test]
    fn render_lists_top_groups() {
        let report = AuditReport::from_groups(
            12,
            vec![group("Dune", Some(2021), 4), group("Heat", Some(1995), 2)],
        );
        let table = report.render(1);
        assert!(table.contains("Total documents:        12"));
        assert!(table.contains("Dune (2021) → 4 copies"));
        assert!(!table.contains("Heat"));

        let clean = AuditReport::from_groups(3, Vec::new());
        assert!(clean.is_clean());
        assert!(clean.render(10).contains("No duplicates found."));
    }
}
