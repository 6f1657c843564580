//! Fixtures shared by unit tests

use chrono::{NaiveDate, Utc};

use crate::models::{
    Budget, BudgetId, Entry, EntryId, EntryKind, Money, NewBudget, NewEntry, OwnerId, DATE_FORMAT,
};

pub(crate) fn owner() -> OwnerId {
    OwnerId::new("u1")
}

pub(crate) fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
}

pub(crate) fn entry(kind: EntryKind, cents: i64, category: &str, on: &str) -> Entry {
    Entry::from_new(
        EntryId::new(),
        NewEntry {
            owner_id: owner(),
            kind,
            amount: Money::from_cents(cents),
            category: category.to_string(),
            title: None,
            description: None,
            date: date(on),
        },
        Utc::now(),
    )
}

/// Income 1000 in January, Food 300 in January, Food 200 in February
pub(crate) fn scenario() -> Vec<Entry> {
    vec![
        entry(EntryKind::Income, 100_000, "Income", "2025-01-05"),
        entry(EntryKind::Expense, 30_000, "Food", "2025-01-10"),
        entry(EntryKind::Expense, 20_000, "Food", "2025-02-01"),
    ]
}

pub(crate) fn budget(month: &str, cents: i64) -> Budget {
    Budget::from_new(
        BudgetId::new(),
        NewBudget {
            owner_id: owner(),
            title: format!("Budget {}", month),
            description: None,
            period: month.parse().unwrap(),
            amount: Money::from_cents(cents),
        },
        Utc::now(),
    )
}
