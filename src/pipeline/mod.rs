// Ingestion and reconciliation pipeline:
// extract -> session dedupe -> insert-if-absent -> audit -> reconcile

pub mod audit;
pub mod dedupe;
pub mod reconcile;
pub mod session;
pub mod snapshot;
pub mod wipe;
pub mod writer;

pub use audit::{audit, AuditReport};
pub use dedupe::dedupe_session;
pub use reconcile::{reconcile, run_reconciliation, GroupOutcome, ReconcileReport, ReconcileRun, ReconciledGroup};
pub use session::{run_scrape, ScrapeOptions, ScrapeSummary};
pub use snapshot::persist_to_json;
pub use wipe::{wipe_collection, WipeOutcome};
pub use writer::{write_batch, WriteOutcome, WriteReport};
