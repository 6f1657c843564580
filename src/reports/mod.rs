//! Filtering and aggregation engine
//!
//! Pure functions over entry snapshots: narrowing by a filter specification,
//! totals, category breakdown, monthly trend, savings rate and budget
//! comparison. None of them can fail; malformed data is rejected earlier, in
//! the model layer.

pub mod breakdown;
pub mod budget_status;
pub mod filter;
pub mod summary;
pub mod trend;

pub use breakdown::{group_by_category, CategoryTotal};
pub use budget_status::{budget_status_for_month, remaining_against_budget, BudgetStatus};
pub use filter::{categories, filter, sort_entries, SortOrder};
pub use summary::{summarize, total_expense, Summary};
pub use trend::{group_by_month, savings_rate, savings_rate_trend, MonthlyTotals, Percent, SavingsRate};
