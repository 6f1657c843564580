//! ledgerview - personal income and expense ledger
//!
//! Turns a collection of income and expense entries into consistent,
//! filterable views: totals for a selection, per-category sums, per-month
//! series, savings-rate trend, budget comparison and a canonical CSV export.
//!
//! # Architecture
//!
//! - `models`: entries, budgets, filters and the money/month value types
//! - `reports`: pure filtering and aggregation over entry snapshots
//! - `export`: CSV rendering and parsing
//! - `storage`: the `EntryStore` boundary and its JSON-file implementation
//! - `services`: validation, mutations and last-request-wins snapshot reads
//! - `config`: paths and user settings
//! - `display`, `cli`: terminal front end
//!
//! # Example
//!
//! ```rust,ignore
//! use ledgerview::config::LedgerPaths;
//! use ledgerview::models::{FilterSpec, OwnerId};
//! use ledgerview::services::LedgerService;
//! use ledgerview::storage::JsonStore;
//!
//! let store = JsonStore::open(LedgerPaths::new()?)?;
//! let service = LedgerService::new(store);
//! let summary = service.get_summary(&OwnerId::new("alice"), &FilterSpec::all())?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use error::{LedgerError, LedgerResult};
