//! Filter specification
//!
//! An immutable description of which entries a query covers. It is hashable
//! so the service layer can key snapshot caches and request sequencing on it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entry::{EntryKind, DATE_FORMAT};
use super::month::YearMonth;

/// Inclusive calendar date range
///
/// `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_to_{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Entry kind selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl KindFilter {
    pub fn matches(&self, kind: EntryKind) -> bool {
        match self {
            Self::All => true,
            Self::Income => kind == EntryKind::Income,
            Self::Expense => kind == EntryKind::Expense,
        }
    }
}

impl From<EntryKind> for KindFilter {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Income => Self::Income,
            EntryKind::Expense => Self::Expense,
        }
    }
}

/// A query over one owner's entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Inclusive date bounds
    #[serde(default)]
    pub date_range: Option<DateRange>,

    #[serde(default)]
    pub kind: KindFilter,

    /// Exact, case-sensitive category; `None` means all
    #[serde(default)]
    pub category: Option<String>,

    /// Calendar month; `None` means all. Intersects with `date_range`.
    #[serde(default)]
    pub month: Option<YearMonth>,
}

impl FilterSpec {
    /// A filter matching every entry
    pub fn all() -> Self {
        Self::default()
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    pub fn kind(mut self, kind: impl Into<KindFilter>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Restrict to one category. A blank name is treated as "all".
    pub fn category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.is_empty() {
            None
        } else {
            Some(category)
        };
        self
    }

    pub fn month(mut self, month: YearMonth) -> Self {
        self.month = Some(month);
        self
    }

    /// True when no component narrows the result
    pub fn is_unfiltered(&self) -> bool {
        self == &Self::default()
    }
}
