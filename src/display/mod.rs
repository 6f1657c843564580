//! Display formatting for terminal output
//!
//! Everything here returns plain strings; the CLI decides where they go.
//! Amounts are printed with the configured currency symbol.

pub mod budget;
pub mod entry;
pub mod report;

pub use budget::{format_budget_details, format_budget_list, format_budget_status};
pub use entry::{format_entry_details, format_entry_register, format_entry_row};
pub use report::{
    format_category_breakdown, format_monthly_trend, format_savings_trend, format_summary,
};

/// Shorten `s` to at most `max_chars` characters, marking the cut with "..."
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 3 {
        return ".".repeat(max_chars);
    }
    let kept: String = s.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}
