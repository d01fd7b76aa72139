//! Upsert Writer: insert-if-absent, one record at a time.
//!
//! The existence check and the insert are two separate store calls, so two
//! concurrent writers can both insert the same key. The auditor and
//! reconciler clean that up afterwards.

use crate::error::Result;
use crate::storage::MovieStore;
use crate::types::{IdentityKey, MovieRecord};
use metrics::counter;
use serde::Serialize;
use tracing::{error, info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WriteOutcome<Id> {
    Inserted { key: IdentityKey, id: Id },
    Skipped { key: IdentityKey, existing: Id },
    Failed { key: IdentityKey, reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteReport<Id> {
    pub outcomes: Vec<WriteOutcome<Id>>,
}

impl<Id> WriteReport<Id> {
    pub fn inserted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, WriteOutcome::Inserted { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, WriteOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, WriteOutcome::Failed { .. }))
            .count()
    }
}

/// Writes `records` in order. A rejected insert is recorded and the batch
/// moves on; only fatal (connectivity) errors abort.
#[instrument(skip(store, records), fields(batch = records.len()))]
pub async fn write_batch<S>(store: &S, records: &[MovieRecord]) -> Result<WriteReport<S::Id>>
where
    S: MovieStore + ?Sized,
{
    let total = records.len();
    let mut outcomes = Vec::with_capacity(total);

    for (i, record) in records.iter().enumerate() {
        let position = i + 1;
        let key = record.identity_key();

        match store.find_id_by_key(&key).await {
            Ok(Some(existing)) => {
                info!("{}/{} skipped: exists {} (id {})", position, total, key, existing);
                outcomes.push(WriteOutcome::Skipped { key, existing });
                continue;
            }
            Ok(None) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!("{}/{} error: lookup of {} failed: {}", position, total, key, e);
                outcomes.push(WriteOutcome::Failed {
                    key,
                    reason: e.to_string(),
                });
                continue;
            }
        }

        match store.insert(record).await {
            Ok(id) => {
                info!(
                    "{}/{} inserted: {} rank={} -> id {}",
                    position,
                    total,
                    key,
                    record.rank.map_or_else(|| "?".to_string(), |r| r.to_string()),
                    id
                );
                outcomes.push(WriteOutcome::Inserted { key, id });
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!("{}/{} error: insert of {} failed: {}", position, total, key, e);
                outcomes.push(WriteOutcome::Failed {
                    key,
                    reason: e.to_string(),
                });
            }
        }
    }

    let report = WriteReport { outcomes };
    counter!("catalog_records_inserted_total").increment(report.inserted() as u64);
    counter!("catalog_records_skipped_total").increment(report.skipped() as u64);
    counter!("catalog_records_failed_total").increment(report.failed() as u64);
    Ok(report)
}
