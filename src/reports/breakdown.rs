//! Expense breakdown by category
//!
//! Groups keep the order in which each category first appears in the input,
//! so chart colors stay attached to the same category across refreshes.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Entry, Money};

/// Total spent in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub entry_count: usize,
}

impl CategoryTotal {
    /// Share of `overall` in hundredths of a percent, rounded half away from zero
    pub fn share_of(&self, overall: Money) -> i64 {
        if overall.is_zero() {
            return 0;
        }
        super::trend::ratio_hundredths(self.total.cents(), overall.cents())
    }
}

/// Sum expense entries per category; income entries are ignored
pub fn group_by_category(entries: &[Entry]) -> Vec<CategoryTotal> {
    let mut groups: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries.iter().filter(|e| e.is_expense()) {
        match index.get(entry.category.as_str()) {
            Some(&i) => {
                groups[i].total += entry.amount;
                groups[i].entry_count += 1;
            }
            None => {
                index.insert(entry.category.as_str(), groups.len());
                groups.push(CategoryTotal {
                    category: entry.category.clone(),
                    total: entry.amount,
                    entry_count: 1,
                });
            }
        }
    }

    groups
}
