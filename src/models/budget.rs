//! Monthly budget ceilings
//!
//! A budget caps spending for one calendar month. At most one budget per
//! owner and month is expected, but reporting sums every match instead of
//! failing when that does not hold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entry::{non_blank, parse_amount};
use super::ids::{BudgetId, OwnerId};
use super::money::Money;
use super::month::YearMonth;
use crate::error::{LedgerError, LedgerResult};

/// Unvalidated budget input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBudget {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub amount: Option<String>,
}

impl RawBudget {
    pub fn new(period: YearMonth, amount: impl Into<String>) -> Self {
        Self {
            month: Some(period.month()),
            year: Some(period.year()),
            amount: Some(amount.into()),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate and normalize into a budget draft for `owner`
    pub fn normalize(self, owner: &OwnerId) -> LedgerResult<NewBudget> {
        let month = self
            .month
            .ok_or_else(|| LedgerError::Validation("budget month is required".into()))?;
        let year = self
            .year
            .ok_or_else(|| LedgerError::Validation("budget year is required".into()))?;
        let period = YearMonth::new(year, month).ok_or_else(|| {
            LedgerError::Validation(format!("invalid budget period {}-{}", year, month))
        })?;
        let amount = parse_amount(self.amount.as_deref())?;

        Ok(NewBudget {
            owner_id: owner.clone(),
            title: non_blank(self.title).unwrap_or_else(|| format!("Budget {}", period)),
            description: non_blank(self.description),
            period,
            amount,
        })
    }
}

/// A validated budget that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBudget {
    pub owner_id: OwnerId,
    pub title: String,
    pub description: Option<String>,
    pub period: YearMonth,
    pub amount: Money,
}

/// A persisted monthly budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub owner_id: OwnerId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Target month
    pub period: YearMonth,
    /// Ceiling, non-negative
    pub amount: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn from_new(id: BudgetId, draft: NewBudget, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: draft.owner_id,
            title: draft.title,
            description: draft.description,
            period: draft.period,
            amount: draft.amount,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, draft: NewBudget, now: DateTime<Utc>) {
        self.title = draft.title;
        self.description = draft.description;
        self.period = draft.period;
        self.amount = draft.amount;
        self.updated_at = now;
    }

    pub fn month(&self) -> u32 {
        self.period.month()
    }

    pub fn year(&self) -> i32 {
        self.period.year()
    }

    pub fn to_raw(&self) -> RawBudget {
        RawBudget {
            title: Some(self.title.clone()),
            description: self.description.clone(),
            month: Some(self.period.month()),
            year: Some(self.period.year()),
            amount: Some(self.amount.to_string()),
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.period, self.title, self.amount)
    }
}

/// Partial update of a budget; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub amount: Option<String>,
}

impl BudgetPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn merge(self, current: &Budget) -> LedgerResult<NewBudget> {
        let mut raw = current.to_raw();
        if self.title.is_some() {
            raw.title = self.title;
        }
        if self.description.is_some() {
            raw.description = self.description;
        }
        if self.month.is_some() {
            raw.month = self.month;
        }
        if self.year.is_some() {
            raw.year = self.year;
        }
        if self.amount.is_some() {
            raw.amount = self.amount;
        }
        raw.normalize(&current.owner_id)
    }
}

/// Optional narrowing for budget listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BudgetFilter {
    pub period: Option<YearMonth>,
}

impl BudgetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(mut self, period: YearMonth) -> Self {
        self.period = Some(period);
        self
    }

    pub fn matches(&self, budget: &Budget) -> bool {
        self.period.map_or(true, |p| budget.period == p)
    }
}
