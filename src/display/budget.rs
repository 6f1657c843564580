//! Budget display formatting

use super::truncate;
use crate::models::Budget;
use crate::reports::BudgetStatus;

pub fn format_budget_list(budgets: &[Budget], symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:7} {:24} {:>14}  {}\n",
        "Month", "Title", "Amount", "ID"
    ));
    output.push_str(&"-".repeat(50));
    output.push('\n');

    for budget in budgets {
        output.push_str(&format!(
            "{:7} {:24} {:>14}  {}\n",
            budget.period.to_string(),
            truncate(&budget.title, 24),
            budget.amount.format_with_symbol(symbol),
            budget.id
        ));
    }

    output
}

pub fn format_budget_details(budget: &Budget, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget:      {}\n", budget.id));
    output.push_str(&format!("Title:       {}\n", budget.title));
    output.push_str(&format!("Month:       {}\n", budget.period));
    output.push_str(&format!(
        "Amount:      {}\n",
        budget.amount.format_with_symbol(symbol)
    ));
    if let Some(description) = &budget.description {
        output.push_str(&format!("Description: {}\n", description));
    }

    output
}

/// Allocated, spent and remaining for one month
pub fn format_budget_status(status: &BudgetStatus, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget for {}\n", status.month));
    output.push_str(&"=".repeat(30));
    output.push('\n');

    if status.budget_count == 0 {
        output.push_str("No budget set for this month.\n");
    } else if status.budget_count > 1 {
        output.push_str(&format!(
            "{} budgets found for this month; their amounts are added.\n",
            status.budget_count
        ));
    }

    output.push_str(&format!(
        "Allocated: {:>16}\n",
        status.allocated.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Spent:     {:>16}\n",
        status.spent.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Remaining: {:>16}\n",
        status.remaining.format_with_symbol(symbol)
    ));

    if status.is_over_budget() {
        output.push_str("Over budget!\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::budget_status_for_month;
    use crate::test_support::{budget, scenario};

    #[test]
    fn test_list_shows_period_and_amount() {
        let output = format_budget_list(&[budget("2025-01", 500_000)], "₱");
        assert!(output.contains("2025-01"));
        assert!(output.contains("₱5000.00"));
    }

    #[test]
    fn test_status_flags_overspend() {
        let budgets = vec![budget("2025-02", 15_000)];
        let status = budget_status_for_month(&budgets, &scenario(), "2025-02".parse().unwrap());
        let output = format_budget_status(&status, "$");

        assert!(output.contains("-$50.00"));
        assert!(output.contains("Over budget!"));
    }

    #[test]
    fn test_status_without_budget() {
        let status = budget_status_for_month(&[], &[], "2025-03".parse().unwrap());
        let output = format_budget_status(&status, "$");
        assert!(output.contains("No budget set"));
        assert!(!output.contains("Over budget"));
    }
}
