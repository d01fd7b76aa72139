//! Reconciler: keeps one canonical document per duplicate group.
//!
//! The canonical copy is the lowest store id of the group; every other
//! document under the key is deleted. Groups with a null title or year are
//! skipped, since a filter on a null component is not a reliable match.

use super::audit::{audit, AuditReport};
use crate::confirm::Confirmation;
use crate::error::Result;
use crate::storage::MovieStore;
use crate::types::{DuplicateGroup, IdentityKey};
use metrics::counter;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupOutcome {
    Deleted { deleted: u64 },
    SkippedIncompleteKey,
    /// Fewer than two documents remained by the time the group was processed.
    AlreadyUnique,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledGroup<Id> {
    pub key: IdentityKey,
    pub count: u64,
    pub canonical_id: Option<Id>,
    pub extra_ids: Vec<Id>,
    pub outcome: GroupOutcome,
}

impl<Id> ReconciledGroup<Id> {
    fn without_ids(group: &DuplicateGroup, outcome: GroupOutcome) -> Self {
        Self {
            key: group.key.clone(),
            count: group.count,
            canonical_id: None,
            extra_ids: Vec::new(),
            outcome,
        }
    }

    pub fn deleted(&self) -> u64 {
        match self.outcome {
            GroupOutcome::Deleted { deleted } => deleted,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport<Id> {
    pub groups: Vec<ReconciledGroup<Id>>,
    pub total_deleted: u64,
    /// Audit taken after all deletions.
    pub post_audit: AuditReport,
}

impl<Id> ReconcileReport<Id> {
    /// No duplicate group with a complete key is left.
    pub fn converged(&self) -> bool {
        self.post_audit.reconcilable_groups().next().is_none()
    }

    pub fn skipped(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| g.outcome == GroupOutcome::SkippedIncompleteKey)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| matches!(g.outcome, GroupOutcome::Failed { .. }))
            .count()
    }
}

/// What a confirmation-gated reconciliation did.
#[derive(Debug, Clone)]
pub enum ReconcileRun<Id> {
    /// The audit found nothing deletable; no prompt was shown.
    NothingToDo,
    /// The operator declined; nothing was deleted.
    Declined,
    Applied(ReconcileReport<Id>),
}

/// Orders ids ascending and splits off the first as canonical.
pub fn split_canonical<Id: Ord>(mut ids: Vec<Id>) -> Option<(Id, Vec<Id>)> {
    ids.sort();
    let mut ids = ids.into_iter();
    let canonical = ids.next()?;
    Some((canonical, ids.collect()))
}

#[instrument(skip(store, groups), fields(group_count = groups.len()))]
pub async fn reconcile<S>(store: &S, groups: &[DuplicateGroup]) -> Result<ReconcileReport<S::Id>>
where
    S: MovieStore + ?Sized,
{
    let mut reconciled = Vec::with_capacity(groups.len());

    for group in groups {
        if !group.key.is_complete() {
            warn!("Skipping {}: identity key has a null component", group.key);
            reconciled.push(ReconciledGroup::without_ids(group, GroupOutcome::SkippedIncompleteKey));
            continue;
        }

        let ids = match store.ids_for_key(&group.key).await {
            Ok(ids) => ids,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!("{}: id lookup failed: {}", group.key, e);
                let outcome = GroupOutcome::Failed { reason: e.to_string() };
                reconciled.push(ReconciledGroup::without_ids(group, outcome));
                continue;
            }
        };
        let Some((canonical, extras)) = split_canonical(ids) else {
            reconciled.push(ReconciledGroup::without_ids(group, GroupOutcome::AlreadyUnique));
            continue;
        };

        let outcome = if extras.is_empty() {
            GroupOutcome::AlreadyUnique
        } else {
            match store.delete_ids(&extras).await {
                Ok(deleted) => {
                    info!("{}: kept {}, deleted {}", group.key, canonical, deleted);
                    GroupOutcome::Deleted { deleted }
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("{}: delete failed: {}", group.key, e);
                    GroupOutcome::Failed { reason: e.to_string() }
                }
            }
        };

        reconciled.push(ReconciledGroup {
            key: group.key.clone(),
            count: group.count,
            canonical_id: Some(canonical),
            extra_ids: extras,
            outcome,
        });
    }

    let total_deleted: u64 = reconciled.iter().map(ReconciledGroup::deleted).sum();
    counter!("catalog_duplicates_deleted_total").increment(total_deleted);

    let post_audit = audit(store).await?;
    let report = ReconcileReport {
        groups: reconciled,
        total_deleted,
        post_audit,
    };

    if report.converged() {
        info!("Reconciliation converged: {} documents deleted", total_deleted);
    } else {
        // Residual duplicates point at a concurrent writer, not at this pass
        warn!(
            "{} duplicate groups remain after reconciliation",
            report.post_audit.reconcilable_groups().count()
        );
    }
    Ok(report)
}

/// Reconciles the groups of `pre_audit` only if `confirm` approves.
pub async fn run_reconciliation<S, C>(
    store: &S,
    pre_audit: &AuditReport,
    confirm: &C,
) -> Result<ReconcileRun<S::Id>>
where
    S: MovieStore + ?Sized,
    C: Confirmation + ?Sized,
{
    let deletable: u64 = pre_audit.reconcilable_groups().map(DuplicateGroup::extra_count).sum();
    if deletable == 0 {
        info!("Nothing to reconcile");
        return Ok(ReconcileRun::NothingToDo);
    }

    let prompt = format!(
        "Delete {} duplicate documents across {} groups?",
        deletable,
        pre_audit.reconcilable_groups().count()
    );
    if !confirm.confirm(&prompt) {
        info!("Reconciliation cancelled; no documents deleted");
        return Ok(ReconcileRun::Declined);
    }

    let report = reconcile(store, &pre_audit.groups).await?;
    Ok(ReconcileRun::Applied(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_id_is_canonical() {
        let (canonical, extras) = split_canonical(vec![5, 2, 9]).unwrap();
        assert_eq!(canonical, 2);
        assert_eq!(extras, vec![5, 9]);
    }

    #[test]
    fn single_and_empty_id_sets() {
        assert_eq!(split_canonical(vec![7]), Some((7, Vec::new())));
        assert_eq!(split_canonical(Vec::<u64>::new()), None);
    }
}
