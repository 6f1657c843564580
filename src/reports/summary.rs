//! Period totals
//!
//! Totals are accumulated in integer cents, so `remaining` is always exactly
//! `total_income - total_expense` no matter how many entries are summed.

use serde::Serialize;

use crate::models::{Entry, EntryKind, Money};

/// Income, expense and remaining totals for a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_income: Money,
    pub total_expense: Money,
    /// Income minus expense; negative when spending exceeds income
    pub remaining: Money,
    pub entry_count: usize,
}

impl Summary {
    pub fn is_overspent(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// Sum incomes and expenses of `entries`
pub fn summarize(entries: &[Entry]) -> Summary {
    let mut total_income = Money::zero();
    let mut total_expense = Money::zero();

    for entry in entries {
        match entry.kind {
            EntryKind::Income => total_income += entry.amount,
            EntryKind::Expense => total_expense += entry.amount,
        }
    }

    Summary {
        total_income,
        total_expense,
        remaining: total_income - total_expense,
        entry_count: entries.len(),
    }
}

/// Sum of expense amounts only
pub fn total_expense(entries: &[Entry]) -> Money {
    entries
        .iter()
        .filter(|e| e.is_expense())
        .map(|e| e.amount)
        .sum()
}
