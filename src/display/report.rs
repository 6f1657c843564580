//! Report formatting for terminal output

use super::truncate;
use crate::models::Money;
use crate::reports::{CategoryTotal, MonthlyTotals, Percent, SavingsRate, Summary};

const BAR_WIDTH: usize = 20;

/// Proportional bar; empty when there is nothing to compare against
fn format_bar(value: Money, max_value: Money, width: usize) -> String {
    if !max_value.is_positive() || !value.is_positive() {
        return " ".repeat(width);
    }

    let filled = (i128::from(value.cents()) * width as i128 / i128::from(max_value.cents())) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn separator(width: usize) -> String {
    "─".repeat(width)
}

pub fn format_summary(summary: &Summary, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Income:    {:>16}\n",
        summary.total_income.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Expenses:  {:>16}\n",
        summary.total_expense.format_with_symbol(symbol)
    ));
    output.push_str(&separator(27));
    output.push('\n');
    output.push_str(&format!(
        "Remaining: {:>16}\n",
        summary.remaining.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Entries:   {:>16}\n", summary.entry_count));

    if summary.is_overspent() {
        output.push_str("Spending exceeds income for this selection.\n");
    }

    output
}

/// Expense totals per category with their share of all expenses
pub fn format_category_breakdown(groups: &[CategoryTotal], symbol: &str) -> String {
    if groups.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let overall: Money = groups.iter().map(|g| g.total).sum();
    let largest = groups.iter().map(|g| g.total).max().unwrap_or_default();

    let mut output = String::new();
    output.push_str(&format!(
        "{:20} {:>14} {:>8}  {}\n",
        "Category", "Total", "Share", "Bar"
    ));
    output.push_str(&separator(66));
    output.push('\n');

    for group in groups {
        let share = Percent::from_hundredths(group.share_of(overall));
        output.push_str(&format!(
            "{:20} {:>14} {:>7}%  {}\n",
            truncate(&group.category, 20),
            group.total.format_with_symbol(symbol),
            share.to_string(),
            format_bar(group.total, largest, BAR_WIDTH)
        ));
    }

    output.push_str(&separator(66));
    output.push('\n');
    output.push_str(&format!(
        "{:20} {:>14}\n",
        "Total",
        overall.format_with_symbol(symbol)
    ));

    output
}

pub fn format_monthly_trend(months: &[MonthlyTotals], symbol: &str) -> String {
    if months.is_empty() {
        return "No entries found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:7} {:>14} {:>14} {:>14}\n",
        "Month", "Income", "Expenses", "Net"
    ));
    output.push_str(&separator(52));
    output.push('\n');

    for month in months {
        output.push_str(&format!(
            "{:7} {:>14} {:>14} {:>14}\n",
            month.month.to_string(),
            month.income.format_with_symbol(symbol),
            month.expenses.format_with_symbol(symbol),
            month.net().format_with_symbol(symbol)
        ));
    }

    output
}

pub fn format_savings_trend(rates: &[SavingsRate]) -> String {
    if rates.is_empty() {
        return "No entries found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{:7} {:>10}\n", "Month", "Savings"));
    output.push_str(&separator(18));
    output.push('\n');

    for rate in rates {
        output.push_str(&format!(
            "{:7} {:>9}%\n",
            rate.month.to_string(),
            rate.rate.to_string()
        ));
    }

    output
}
