use crate::confirm::Confirmation;
use crate::error::Result;
use crate::storage::MovieStore;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeOutcome {
    Deleted(u64),
    Cancelled,
}

/// Deletes every document in the collection once `confirm` approves.
pub async fn wipe_collection<S, C>(store: &S, collection_name: &str, confirm: &C) -> Result<WipeOutcome>
where
    S: MovieStore + ?Sized,
    C: Confirmation + ?Sized,
{
    let prompt = format!("This will DELETE every document in '{}'. Continue?", collection_name);
    if !confirm.confirm(&prompt) {
        info!("Wipe of '{}' cancelled", collection_name);
        return Ok(WipeOutcome::Cancelled);
    }

    let deleted = store.delete_all().await?;
    warn!("Deleted {} documents from '{}'", deleted, collection_name);
    Ok(WipeOutcome::Deleted(deleted))
}
