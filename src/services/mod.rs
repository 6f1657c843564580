//! Service layer for ledgerview
//!
//! Reconciliation between callers and the entry store: input validation,
//! mutations with cache invalidation, and last-request-wins snapshot reads
//! feeding the aggregation engine.

pub mod budget;
pub mod entry;
pub mod ledger;
pub mod snapshot;

pub use budget::BudgetService;
pub use entry::EntryService;
pub use ledger::{LedgerService, DEFAULT_SNAPSHOT_ATTEMPTS};
pub use snapshot::{FetchTicket, SnapshotCache};
