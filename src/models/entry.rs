//! Income and expense entries
//!
//! Untrusted input arrives as a [`RawEntry`] of optional strings. It is
//! normalized exactly once into a [`NewEntry`]; the entry store then assigns
//! an id and timestamps to produce an [`Entry`]. Amounts are always stored as
//! non-negative magnitudes and the sign is derived from the [`EntryKind`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{EntryId, OwnerId};
use super::money::Money;
use crate::error::{LedgerError, LedgerResult};

/// Calendar date format used for input, storage and export
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether an entry adds to or takes from the owner's funds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    /// Lowercase wire form ("income" / "expense")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Display label, also the category used when none is given
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// Apply this kind's sign to a magnitude
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntryKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" | "expenses" => Ok(Self::Expense),
            other => Err(LedgerError::Validation(format!(
                "unknown entry type '{}', expected income or expense",
                other
            ))),
        }
    }
}

/// Unvalidated entry input, as typed by a user or received from a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl RawEntry {
    /// Shorthand for the common fields
    pub fn new(kind: EntryKind, amount: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.as_str().to_string()),
            amount: Some(amount.into()),
            date: Some(date.into()),
            ..Self::default()
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate and normalize into an entry draft for `owner`
    pub fn normalize(self, owner: &OwnerId) -> LedgerResult<NewEntry> {
        let kind: EntryKind = self
            .kind
            .as_deref()
            .ok_or_else(|| LedgerError::Validation("entry type is required".into()))?
            .parse()?;

        let amount = parse_amount(self.amount.as_deref())?;
        let date = parse_date(self.date.as_deref())?;
        let category = non_blank(self.category).unwrap_or_else(|| kind.label().to_string());

        Ok(NewEntry {
            owner_id: owner.clone(),
            kind,
            amount,
            category,
            title: non_blank(self.title),
            description: non_blank(self.description),
            date,
        })
    }
}

/// Parse a required, non-negative amount
pub(crate) fn parse_amount(amount: Option<&str>) -> LedgerResult<Money> {
    let text = amount
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| LedgerError::Validation("amount is required".into()))?;
    let money = Money::parse(text).map_err(|e| LedgerError::Validation(e.to_string()))?;
    if money.is_negative() {
        return Err(LedgerError::Validation(format!(
            "amount must not be negative: {}",
            text.trim()
        )));
    }
    Ok(money)
}

/// Parse a required YYYY-MM-DD calendar date
pub(crate) fn parse_date(date: Option<&str>) -> LedgerResult<NaiveDate> {
    let text = date
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LedgerError::Validation("date is required".into()))?;
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| LedgerError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", text)))
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A validated entry that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub owner_id: OwnerId,
    pub kind: EntryKind,
    pub amount: Money,
    pub category: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// A persisted income or expense entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Assigned by the entry store, never changes
    pub id: EntryId,

    pub owner_id: OwnerId,

    pub kind: EntryKind,

    /// Non-negative magnitude
    pub amount: Money,

    /// Never empty; falls back to the kind label
    pub category: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Materialize a draft with a store-assigned id
    pub fn from_new(id: EntryId, draft: NewEntry, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: draft.owner_id,
            kind: draft.kind,
            amount: draft.amount,
            category: draft.category,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields with a re-normalized draft
    pub fn apply(&mut self, draft: NewEntry, now: DateTime<Utc>) {
        self.amount = draft.amount;
        self.category = draft.category;
        self.title = draft.title;
        self.description = draft.description;
        self.date = draft.date;
        self.updated_at = now;
    }

    /// Amount with the kind's sign applied
    pub fn signed_amount(&self) -> Money {
        self.kind.signed(self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// Raw form of the current values, the base an edit patch is merged onto
    pub fn to_raw(&self) -> RawEntry {
        RawEntry {
            kind: Some(self.kind.as_str().to_string()),
            amount: Some(self.amount.to_string()),
            category: Some(self.category.clone()),
            title: self.title.clone(),
            description: self.description.clone(),
            date: Some(self.date.format(DATE_FORMAT).to_string()),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format(DATE_FORMAT),
            self.kind,
            self.category,
            self.signed_amount()
        )
    }
}

/// Partial update of an entry; `None` fields keep their current value
///
/// A field set to an empty string clears it (title, description) or resets
/// it to the kind label (category).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge onto `current` and re-normalize under the same rules as creation
    pub fn merge(self, current: &Entry) -> LedgerResult<NewEntry> {
        if let Some(kind) = self.kind.as_deref() {
            let requested: EntryKind = kind.parse()?;
            if requested != current.kind {
                return Err(LedgerError::Validation(
                    "entry type cannot change; delete and re-create the entry instead".into(),
                ));
            }
        }

        let mut raw = current.to_raw();
        if self.amount.is_some() {
            raw.amount = self.amount;
        }
        if self.category.is_some() {
            raw.category = self.category;
        }
        if self.title.is_some() {
            raw.title = self.title;
        }
        if self.description.is_some() {
            raw.description = self.description;
        }
        if self.date.is_some() {
            raw.date = self.date;
        }
        raw.normalize(&current.owner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId::new("u1")
    }

    fn entry_from(raw: RawEntry) -> Entry {
        Entry::from_new(EntryId::new(), raw.normalize(&owner()).unwrap(), Utc::now())
    }

    #[test]
    fn test_normalize_defaults_category_to_kind_label() {
        let income = RawEntry::new(EntryKind::Income, "1000", "2025-01-05")
            .normalize(&owner())
            .unwrap();
        assert_eq!(income.category, "Income");

        let expense = RawEntry::new(EntryKind::Expense, "12.5", "2025-01-05")
            .category("   ")
            .normalize(&owner())
            .unwrap();
        assert_eq!(expense.category, "Expense");
        assert_eq!(expense.amount, Money::from_cents(1250));
    }

    #[test]
    fn test_normalize_keeps_category_case() {
        let entry = RawEntry::new(EntryKind::Expense, "3", "2025-01-05")
            .category(" food ")
            .normalize(&owner())
            .unwrap();
        assert_eq!(entry.category, "food");
    }

    #[test]
    fn test_normalize_rejects_bad_amounts() {
        for amount in ["", "-5", "abc", "1.234"] {
            let err = RawEntry::new(EntryKind::Expense, amount, "2025-01-05")
                .normalize(&owner())
                .unwrap_err();
            assert!(err.is_validation(), "{} should be rejected", amount);
        }

        let missing = RawEntry {
            kind: Some("income".into()),
            date: Some("2025-01-05".into()),
            ..RawEntry::default()
        };
        assert!(missing.normalize(&owner()).unwrap_err().is_validation());
    }

    #[test]
    fn test_normalize_caps_amounts() {
        let largest = RawEntry::new(EntryKind::Income, "100000000000", "2025-01-05")
            .normalize(&owner())
            .unwrap();
        assert_eq!(largest.amount, Money::MAX);

        for amount in ["100000000000.01", "90000000000000000.00"] {
            let err = RawEntry::new(EntryKind::Income, amount, "2025-01-05")
                .normalize(&owner())
                .unwrap_err();
            assert!(err.is_validation(), "{} should be rejected", amount);
        }
    }

    #[test]
    fn test_normalize_rejects_bad_dates() {
        for date in ["", "2025-02-30", "05/01/2025", "yesterday"] {
            let err = RawEntry::new(EntryKind::Income, "10", date)
                .normalize(&owner())
                .unwrap_err();
            assert!(err.is_validation(), "{} should be rejected", date);
        }
    }

    #[test]
    fn test_normalize_requires_known_kind() {
        let raw = RawEntry {
            kind: Some("transfer".into()),
            amount: Some("1".into()),
            date: Some("2025-01-01".into()),
            ..RawEntry::default()
        };
        assert!(raw.normalize(&owner()).unwrap_err().is_validation());
        assert_eq!("Expenses".parse::<EntryKind>().unwrap(), EntryKind::Expense);
    }

    #[test]
    fn test_blank_title_becomes_none() {
        let entry = entry_from(
            RawEntry::new(EntryKind::Income, "1", "2025-01-01")
                .title("  ")
                .description(" bonus "),
        );
        assert_eq!(entry.title, None);
        assert_eq!(entry.description.as_deref(), Some("bonus"));
    }

    #[test]
    fn test_signed_amount() {
        let expense = entry_from(RawEntry::new(EntryKind::Expense, "3", "2025-01-01"));
        assert_eq!(expense.signed_amount(), Money::from_cents(-300));
        assert!(expense.is_expense());
    }

    #[test]
    fn test_patch_merges_and_renormalizes() {
        let entry = entry_from(
            RawEntry::new(EntryKind::Expense, "30", "2025-01-10")
                .category("Food")
                .title("Lunch"),
        );

        let patch = EntryPatch {
            amount: Some("45.10".into()),
            category: Some("".into()),
            ..EntryPatch::default()
        };
        let merged = patch.merge(&entry).unwrap();
        assert_eq!(merged.amount, Money::from_cents(4510));
        assert_eq!(merged.category, "Expense");
        assert_eq!(merged.title.as_deref(), Some("Lunch"));
        assert_eq!(merged.date, entry.date);
    }

    #[test]
    fn test_patch_rejects_kind_change_and_bad_values() {
        let entry = entry_from(RawEntry::new(EntryKind::Expense, "30", "2025-01-10"));

        let kind_change = EntryPatch {
            kind: Some("income".into()),
            ..EntryPatch::default()
        };
        assert!(kind_change.merge(&entry).unwrap_err().is_validation());

        let negative = EntryPatch {
            amount: Some("-1".into()),
            ..EntryPatch::default()
        };
        assert!(negative.merge(&entry).unwrap_err().is_validation());
    }

    #[test]
    fn test_serialization_uses_lowercase_kind() {
        let entry = entry_from(RawEntry::new(EntryKind::Income, "1", "2025-01-01"));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "income");
        assert_eq!(json["amount"], 100);
        assert_eq!(json["date"], "2025-01-01");
    }
}
