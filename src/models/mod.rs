//! Core data models for ledgerview
//!
//! Entries, budgets, filter specifications and the money and month value
//! types they are built from. Validation of untrusted input happens here and
//! nowhere else.

pub mod budget;
pub mod entry;
pub mod filter;
pub mod ids;
pub mod money;
pub mod month;

pub use budget::{Budget, BudgetFilter, BudgetPatch, NewBudget, RawBudget};
pub use entry::{Entry, EntryKind, EntryPatch, NewEntry, RawEntry, DATE_FORMAT};
pub use filter::{DateRange, FilterSpec, KindFilter};
pub use ids::{BudgetId, EntryId, OwnerId};
pub use money::{Money, MoneyParseError};
pub use month::{MonthParseError, YearMonth};
