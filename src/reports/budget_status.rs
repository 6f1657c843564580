//! Budget versus actual spending

use serde::Serialize;

use crate::models::{Budget, Entry, Money, YearMonth};

/// Allocation, spending and what is left for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub month: YearMonth,
    pub allocated: Money,
    pub spent: Money,
    /// Allocated minus spent; negative signals overspending
    pub remaining: Money,
    /// Number of budgets that contributed to `allocated`
    pub budget_count: usize,
}

impl BudgetStatus {
    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_negative()
    }
}

fn spent_in(month: YearMonth, entries: &[Entry]) -> Money {
    entries
        .iter()
        .filter(|e| e.is_expense() && month.contains(e.date))
        .map(|e| e.amount)
        .sum()
}

/// Compare one budget with the expenses recorded in its month
pub fn remaining_against_budget(budget: &Budget, entries: &[Entry]) -> BudgetStatus {
    let spent = spent_in(budget.period, entries);
    BudgetStatus {
        month: budget.period,
        allocated: budget.amount,
        spent,
        remaining: budget.amount - spent,
        budget_count: 1,
    }
}

/// Compare every budget for `month` with that month's expenses
///
/// Duplicate budgets for the same month are summed. A month without any
/// budget reports zero allocated, so all spending shows as overspend.
pub fn budget_status_for_month(
    budgets: &[Budget],
    entries: &[Entry],
    month: YearMonth,
) -> BudgetStatus {
    let matching: Vec<&Budget> = budgets.iter().filter(|b| b.period == month).collect();
    let allocated: Money = matching.iter().map(|b| b.amount).sum();
    let spent = spent_in(month, entries);

    BudgetStatus {
        month,
        allocated,
        spent,
        remaining: allocated - spent,
        budget_count: matching.len(),
    }
}
