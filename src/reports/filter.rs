//! Filter engine
//!
//! Narrows an entry snapshot to the entries a [`FilterSpec`] describes.
//! Filtering never reorders; ordering is a separate, explicit step.

use std::cmp::Ordering;

use crate::models::{Entry, FilterSpec};

/// Check whether a single entry satisfies every active predicate
pub fn matches(entry: &Entry, spec: &FilterSpec) -> bool {
    if !spec.kind.matches(entry.kind) {
        return false;
    }

    if let Some(category) = spec.category.as_deref() {
        if entry.category != category {
            return false;
        }
    }

    if let Some(range) = spec.date_range {
        if !range.contains(entry.date) {
            return false;
        }
    }

    if let Some(month) = spec.month {
        if !month.contains(entry.date) {
            return false;
        }
    }

    true
}

/// Return the entries matching `spec`, preserving input order
///
/// An empty input or an inverted date range yields an empty result.
pub fn filter(entries: &[Entry], spec: &FilterSpec) -> Vec<Entry> {
    if spec.date_range.is_some_and(|r| r.is_inverted()) {
        return Vec::new();
    }

    entries
        .iter()
        .filter(|entry| matches(entry, spec))
        .cloned()
        .collect()
}

/// Ordering for entry listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Latest date first, as the history view shows it
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Sort entries by date, breaking ties by creation time and then id
///
/// The tie-breakers make the order total, so the same snapshot always
/// produces the same listing and the same export.
pub fn sort_entries(entries: &mut [Entry], order: SortOrder) {
    entries.sort_by(|a, b| {
        let ascending = chronological(a, b);
        match order {
            SortOrder::OldestFirst => ascending,
            SortOrder::NewestFirst => ascending.reverse(),
        }
    });
}

fn chronological(a: &Entry, b: &Entry) -> Ordering {
    a.date
        .cmp(&b.date)
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.cmp(&b.id))
}

/// Distinct categories in first-seen order
pub fn categories(entries: &[Entry]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for entry in entries {
        if !seen.iter().any(|c| c == &entry.category) {
            seen.push(entry.category.clone());
        }
    }
    seen
}
