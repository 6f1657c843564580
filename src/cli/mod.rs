//! CLI command handlers
//!
//! Bridges clap argument parsing with the ledger service. Handlers print
//! formatted output and return errors for `main` to report.

pub mod budget;
pub mod entry;
pub mod export;
pub mod filter;
pub mod report;

pub use budget::{handle_budget_command, BudgetCommands};
pub use entry::{handle_entry_command, EntryCommands};
pub use export::{handle_export_command, ExportArgs};
pub use filter::FilterArgs;
pub use report::{handle_report_command, ReportCommands};
