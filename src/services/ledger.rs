//! Ledger service: the engine's entry point for views
//!
//! Each read is one logical request: fetch a snapshot of the owner's entries
//! through the store, filter it, aggregate it. Snapshots are fetched under a
//! [`FetchTicket`](super::snapshot::FetchTicket); a response that was
//! superseded or overtaken by a write is discarded and fetched again, up to
//! the configured number of attempts.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use super::budget::BudgetService;
use super::entry::EntryService;
use super::snapshot::SnapshotCache;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{to_csv, CsvExport};
use crate::models::{Budget, Entry, FilterSpec, OwnerId, YearMonth};
use crate::reports::{
    self, budget_status_for_month, group_by_category, group_by_month, savings_rate_trend,
    summarize, BudgetStatus, CategoryTotal, MonthlyTotals, SavingsRate, SortOrder, Summary,
};
use crate::storage::EntryStore;

/// Default number of snapshot fetch attempts before reporting a conflict
pub const DEFAULT_SNAPSHOT_ATTEMPTS: u32 = 3;

/// Shared engine over one entry store
pub struct LedgerService<S: EntryStore> {
    store: S,
    cache: Arc<SnapshotCache>,
    snapshot_attempts: u32,
}

impl<S: EntryStore> LedgerService<S> {
    pub fn new(store: S) -> Self {
        Self::with_cache(store, Arc::new(SnapshotCache::new()))
    }

    /// Use a cache shared with other components
    pub fn with_cache(store: S, cache: Arc<SnapshotCache>) -> Self {
        Self {
            store,
            cache,
            snapshot_attempts: DEFAULT_SNAPSHOT_ATTEMPTS,
        }
    }

    /// Attempts per read before giving up with `Conflict`; at least one
    pub fn with_snapshot_attempts(mut self, attempts: u32) -> Self {
        self.snapshot_attempts = attempts.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }

    pub fn entries(&self) -> EntryService<'_, S> {
        EntryService::new(&self.store, &self.cache)
    }

    pub fn budgets(&self) -> BudgetService<'_, S> {
        BudgetService::new(&self.store, &self.cache)
    }

    /// Current entries of `owner` matching `filter`, in chronological order
    ///
    /// A snapshot accepted by a newer concurrent read is reused instead of
    /// fetching again.
    pub fn snapshot(&self, owner: &OwnerId, filter: &FilterSpec) -> LedgerResult<Arc<Vec<Entry>>> {
        for attempt in 1..=self.snapshot_attempts {
            if let Some(cached) = self.cache.lookup(owner, filter)? {
                debug!(owner = %owner, entries = cached.len(), attempt, "snapshot cache hit");
                return Ok(cached);
            }

            let ticket = self.cache.issue(owner, filter)?;
            let sequence = ticket.sequence();
            debug!(owner = %owner, sequence, attempt, "fetching snapshot");

            let fetched = self.store.list_entries(owner, Some(filter))?;
            // The store may ignore the filter; applying it again is a no-op otherwise
            let entries = reports::filter(&fetched, filter);

            match self.cache.accept(ticket, entries)? {
                Some(snapshot) => return Ok(snapshot),
                None => debug!(owner = %owner, sequence, "discarded stale snapshot"),
            }
        }

        if let Some(cached) = self.cache.lookup(owner, filter)? {
            return Ok(cached);
        }

        warn!(
            owner = %owner,
            attempts = self.snapshot_attempts,
            "snapshot kept being superseded"
        );
        Err(LedgerError::Conflict(format!(
            "entries for {} changed during {} consecutive reads",
            owner, self.snapshot_attempts
        )))
    }

    pub fn get_summary(&self, owner: &OwnerId, filter: &FilterSpec) -> LedgerResult<Summary> {
        let snapshot = self.snapshot(owner, filter)?;
        Ok(summarize(&snapshot))
    }

    pub fn get_category_breakdown(
        &self,
        owner: &OwnerId,
        filter: &FilterSpec,
    ) -> LedgerResult<Vec<CategoryTotal>> {
        let snapshot = self.snapshot(owner, filter)?;
        Ok(group_by_category(&snapshot))
    }

    pub fn get_monthly_trend(
        &self,
        owner: &OwnerId,
        filter: &FilterSpec,
    ) -> LedgerResult<Vec<MonthlyTotals>> {
        let snapshot = self.snapshot(owner, filter)?;
        Ok(group_by_month(&snapshot))
    }

    pub fn get_savings_rate_trend(
        &self,
        owner: &OwnerId,
        filter: &FilterSpec,
    ) -> LedgerResult<Vec<SavingsRate>> {
        let trend = self.get_monthly_trend(owner, filter)?;
        Ok(savings_rate_trend(&trend))
    }

    /// Filtered entries, sorted for display
    pub fn get_history(
        &self,
        owner: &OwnerId,
        filter: &FilterSpec,
        order: SortOrder,
    ) -> LedgerResult<Vec<Entry>> {
        let snapshot = self.snapshot(owner, filter)?;
        let mut entries = snapshot.as_ref().clone();
        reports::sort_entries(&mut entries, order);
        Ok(entries)
    }

    /// Distinct categories in use, in first-seen chronological order
    pub fn get_categories(&self, owner: &OwnerId) -> LedgerResult<Vec<String>> {
        let snapshot = self.snapshot(owner, &FilterSpec::all())?;
        Ok(reports::categories(&snapshot))
    }

    /// Budget versus spending for one month
    pub fn get_budget_status(&self, owner: &OwnerId, month: YearMonth) -> LedgerResult<BudgetStatus> {
        let budgets = self.budgets().list(owner, Some(month))?;
        let snapshot = self.snapshot(owner, &FilterSpec::all().month(month))?;
        Ok(budget_status_for_month(&budgets, &snapshot, month))
    }

    /// Budgets newest period first, optionally for one month
    pub fn list_budgets(
        &self,
        owner: &OwnerId,
        month: Option<YearMonth>,
    ) -> LedgerResult<Vec<Budget>> {
        self.budgets().list(owner, month)
    }

    /// CSV of the filtered entries, oldest first, named after today
    pub fn export_csv(&self, owner: &OwnerId, filter: &FilterSpec) -> LedgerResult<CsvExport> {
        self.export_csv_on(owner, filter, Local::now().date_naive())
    }

    /// [`export_csv`](Self::export_csv) with an explicit export date
    pub fn export_csv_on(
        &self,
        owner: &OwnerId,
        filter: &FilterSpec,
        today: NaiveDate,
    ) -> LedgerResult<CsvExport> {
        let entries = self.get_history(owner, filter, SortOrder::OldestFirst)?;
        let export = to_csv(&entries, filter, today)?;

        info!(owner = %owner, rows = entries.len(), file = %export.filename, "export rendered");
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::{
        BudgetFilter, BudgetId, EntryId, EntryKind, EntryPatch, Money, NewBudget, NewEntry,
        RawBudget, RawEntry,
    };
    use crate::reports::Percent;
    use crate::storage::JsonStore;
    use crate::test_support::{date, owner};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn create_service() -> (TempDir, LedgerService<JsonStore>) {
        let temp_dir = TempDir::new().unwrap();
        let store =
            JsonStore::open(LedgerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        (temp_dir, LedgerService::new(store))
    }

    fn seed(service: &LedgerService<JsonStore>) -> Vec<Entry> {
        let entries = service.entries();
        vec![
            entries
                .create(&owner(), RawEntry::new(EntryKind::Income, "1000", "2025-01-05"))
                .unwrap(),
            entries
                .create(
                    &owner(),
                    RawEntry::new(EntryKind::Expense, "300", "2025-01-10").category("Food"),
                )
                .unwrap(),
            entries
                .create(
                    &owner(),
                    RawEntry::new(EntryKind::Expense, "200", "2025-02-01").category("Food"),
                )
                .unwrap(),
        ]
    }

    #[test]
    fn test_scenario_views() {
        let (_temp_dir, service) = create_service();
        seed(&service);
        let all = FilterSpec::all();

        let summary = service.get_summary(&owner(), &all).unwrap();
        assert_eq!(summary.total_income, Money::from_cents(100_000));
        assert_eq!(summary.total_expense, Money::from_cents(50_000));
        assert_eq!(summary.remaining, Money::from_cents(50_000));

        let categories = service.get_category_breakdown(&owner(), &all).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].category, "Food");
        assert_eq!(categories[0].total, Money::from_cents(50_000));

        let months = service.get_monthly_trend(&owner(), &all).unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[1].income, Money::zero());
        assert_eq!(months[1].expenses, Money::from_cents(20_000));

        let rates = service.get_savings_rate_trend(&owner(), &all).unwrap();
        assert_eq!(rates[0].rate, Percent::from_hundredths(7_000));
        assert_eq!(rates[1].rate, Percent::zero());
    }

    #[test]
    fn test_owners_are_isolated() {
        let (_temp_dir, service) = create_service();
        seed(&service);

        let stranger = OwnerId::new("u2");
        let summary = service.get_summary(&stranger, &FilterSpec::all()).unwrap();
        assert_eq!(summary.entry_count, 0);
        assert!(service.get_categories(&stranger).unwrap().is_empty());
    }

    #[test]
    fn test_delete_then_summarize_excludes_entry() {
        let (_temp_dir, service) = create_service();
        let seeded = seed(&service);
        let all = FilterSpec::all();

        // Warm the cache first so a stale snapshot would be visible
        assert_eq!(service.get_summary(&owner(), &all).unwrap().entry_count, 3);

        service.entries().remove(&owner(), seeded[1].id).unwrap();
        let summary = service.get_summary(&owner(), &all).unwrap();
        assert_eq!(summary.entry_count, 2);
        assert_eq!(summary.total_expense, Money::from_cents(20_000));
    }

    #[test]
    fn test_deleted_id_is_not_found_everywhere() {
        let (_temp_dir, service) = create_service();
        let seeded = seed(&service);
        let id = seeded[0].id;
        let entries = service.entries();

        entries.remove(&owner(), id).unwrap();
        assert!(entries.get(&owner(), id).unwrap_err().is_not_found());
        assert!(entries.remove(&owner(), id).unwrap_err().is_not_found());
        let patch = EntryPatch {
            amount: Some("1".into()),
            ..EntryPatch::default()
        };
        assert!(entries.update(&owner(), id, patch).unwrap_err().is_not_found());
    }

    #[test]
    fn test_foreign_entry_is_not_found() {
        let (_temp_dir, service) = create_service();
        let seeded = seed(&service);
        let stranger = OwnerId::new("u2");

        let err = service.entries().get(&stranger, seeded[0].id).unwrap_err();
        assert!(err.is_not_found());
        assert!(service
            .entries()
            .remove(&stranger, seeded[0].id)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_edit_refreshes_views() {
        let (_temp_dir, service) = create_service();
        let seeded = seed(&service);
        let all = FilterSpec::all();
        service.get_summary(&owner(), &all).unwrap();

        let patch = EntryPatch {
            amount: Some("450".into()),
            category: Some("Dining".into()),
            ..EntryPatch::default()
        };
        let edited = service.entries().update(&owner(), seeded[1].id, patch).unwrap();
        assert_eq!(edited.id, seeded[1].id);

        let summary = service.get_summary(&owner(), &all).unwrap();
        assert_eq!(summary.total_expense, Money::from_cents(65_000));
        assert_eq!(
            service.get_categories(&owner()).unwrap(),
            vec!["Income", "Dining", "Food"]
        );
    }

    #[test]
    fn test_invalid_input_never_reaches_store() {
        let (_temp_dir, service) = create_service();
        let err = service
            .entries()
            .create(&owner(), RawEntry::new(EntryKind::Expense, "-3", "2025-01-01"))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            service.get_summary(&owner(), &FilterSpec::all()).unwrap(),
            Summary::default()
        );
    }

    #[test]
    fn test_history_ordering() {
        let (_temp_dir, service) = create_service();
        let seeded = seed(&service);
        let all = FilterSpec::all();

        let newest = service
            .get_history(&owner(), &all, SortOrder::NewestFirst)
            .unwrap();
        assert_eq!(newest.first().map(|e| e.id), Some(seeded[2].id));

        let oldest = service
            .get_history(&owner(), &all, SortOrder::OldestFirst)
            .unwrap();
        assert_eq!(oldest.first().map(|e| e.id), Some(seeded[0].id));
    }

    #[test]
    fn test_budget_status_and_listing() {
        let (_temp_dir, service) = create_service();
        seed(&service);
        let jan: YearMonth = "2025-01".parse().unwrap();
        let feb = jan.next();

        service
            .budgets()
            .create(&owner(), RawBudget::new(jan, "400"))
            .unwrap();
        service
            .budgets()
            .create(&owner(), RawBudget::new(feb, "150"))
            .unwrap();

        let listed = service.list_budgets(&owner(), None).unwrap();
        assert_eq!(listed[0].period, feb);
        assert_eq!(listed[1].period, jan);

        let status = service.get_budget_status(&owner(), jan).unwrap();
        assert_eq!(status.remaining, Money::from_cents(10_000));
        let status = service.get_budget_status(&owner(), feb).unwrap();
        assert!(status.is_over_budget());
    }

    #[test]
    fn test_export_uses_filter_and_chronological_order() {
        let (_temp_dir, service) = create_service();
        seed(&service);
        let spec = FilterSpec::all().category("Food");

        let export = service
            .export_csv_on(&owner(), &spec, date("2025-03-01"))
            .unwrap();
        assert_eq!(export.filename, "transactions_2025-03-01_Food.csv");

        let lines: Vec<&str> = export.content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with("2025-01-10"));
        assert!(lines[2].ends_with("2025-02-01"));
    }

    /// Store whose every call fails, as a network adapter would when offline
    struct FailingStore;

    fn offline<T>() -> LedgerResult<T> {
        Err(LedgerError::Transport("connection refused".into()))
    }

    impl EntryStore for FailingStore {
        fn list_entries(&self, _: &OwnerId, _: Option<&FilterSpec>) -> LedgerResult<Vec<Entry>> {
            offline()
        }
        fn get_entry(&self, _: EntryId) -> LedgerResult<Option<Entry>> {
            offline()
        }
        fn create_entry(&self, _: NewEntry) -> LedgerResult<Entry> {
            offline()
        }
        fn update_entry(&self, _: EntryId, _: NewEntry) -> LedgerResult<Entry> {
            offline()
        }
        fn delete_entry(&self, _: EntryId) -> LedgerResult<()> {
            offline()
        }
        fn list_budgets(&self, _: &OwnerId, _: Option<&BudgetFilter>) -> LedgerResult<Vec<Budget>> {
            offline()
        }
        fn get_budget(&self, _: BudgetId) -> LedgerResult<Option<Budget>> {
            offline()
        }
        fn create_budget(&self, _: NewBudget) -> LedgerResult<Budget> {
            offline()
        }
        fn update_budget(&self, _: BudgetId, _: NewBudget) -> LedgerResult<Budget> {
            offline()
        }
        fn delete_budget(&self, _: BudgetId) -> LedgerResult<()> {
            offline()
        }
    }

    #[test]
    fn test_transport_error_is_not_an_empty_summary() {
        let service = LedgerService::new(FailingStore);
        let err = service.get_summary(&owner(), &FilterSpec::all()).unwrap_err();
        assert!(err.is_transport());

        let err = service
            .entries()
            .create(&owner(), RawEntry::new(EntryKind::Income, "1", "2025-01-01"))
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[derive(Clone, Copy)]
    enum Interference {
        /// Another caller acknowledges a write
        Write,
        /// Another reader of the same view fetches and wins
        NewerRead,
    }

    /// Delegates to a JSON store but lets another caller interfere during
    /// the first `interfering` listings
    struct RacingStore {
        inner: JsonStore,
        cache: Arc<SnapshotCache>,
        interference: Interference,
        interfering: usize,
        lists: AtomicUsize,
    }

    impl EntryStore for RacingStore {
        fn list_entries(&self, owner: &OwnerId, filter: Option<&FilterSpec>) -> LedgerResult<Vec<Entry>> {
            let entries = self.inner.list_entries(owner, filter)?;
            if self.lists.fetch_add(1, Ordering::SeqCst) < self.interfering {
                match self.interference {
                    Interference::Write => self.cache.invalidate(owner)?,
                    Interference::NewerRead => {
                        let spec = filter.cloned().unwrap_or_else(FilterSpec::all);
                        let newer = self.cache.issue(owner, &spec)?;
                        self.cache.accept(newer, entries.clone())?;
                    }
                }
            }
            Ok(entries)
        }
        fn get_entry(&self, id: EntryId) -> LedgerResult<Option<Entry>> {
            self.inner.get_entry(id)
        }
        fn create_entry(&self, draft: NewEntry) -> LedgerResult<Entry> {
            self.inner.create_entry(draft)
        }
        fn update_entry(&self, id: EntryId, draft: NewEntry) -> LedgerResult<Entry> {
            self.inner.update_entry(id, draft)
        }
        fn delete_entry(&self, id: EntryId) -> LedgerResult<()> {
            self.inner.delete_entry(id)
        }
        fn list_budgets(&self, owner: &OwnerId, filter: Option<&BudgetFilter>) -> LedgerResult<Vec<Budget>> {
            self.inner.list_budgets(owner, filter)
        }
        fn get_budget(&self, id: BudgetId) -> LedgerResult<Option<Budget>> {
            self.inner.get_budget(id)
        }
        fn create_budget(&self, draft: NewBudget) -> LedgerResult<Budget> {
            self.inner.create_budget(draft)
        }
        fn update_budget(&self, id: BudgetId, draft: NewBudget) -> LedgerResult<Budget> {
            self.inner.update_budget(id, draft)
        }
        fn delete_budget(&self, id: BudgetId) -> LedgerResult<()> {
            self.inner.delete_budget(id)
        }
    }

    fn racing_service(
        temp_dir: &TempDir,
        interference: Interference,
        interfering: usize,
    ) -> LedgerService<RacingStore> {
        let cache = Arc::new(SnapshotCache::new());
        let store = RacingStore {
            inner: JsonStore::open(LedgerPaths::with_base_dir(temp_dir.path().to_path_buf()))
                .unwrap(),
            cache: Arc::clone(&cache),
            interference,
            interfering,
            lists: AtomicUsize::new(0),
        };
        LedgerService::with_cache(store, cache)
    }

    #[test]
    fn test_stale_snapshot_is_refetched() {
        let temp_dir = TempDir::new().unwrap();
        let service = racing_service(&temp_dir, Interference::Write, 1);

        let summary = service.get_summary(&owner(), &FilterSpec::all()).unwrap();
        assert_eq!(summary.entry_count, 0);
        assert_eq!(service.store().lists.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_newer_read_snapshot_is_reused() {
        let temp_dir = TempDir::new().unwrap();
        let service = racing_service(&temp_dir, Interference::NewerRead, 1);
        service
            .entries()
            .create(&owner(), RawEntry::new(EntryKind::Income, "50", "2025-01-05"))
            .unwrap();

        let summary = service.get_summary(&owner(), &FilterSpec::all()).unwrap();
        assert_eq!(summary.total_income, Money::from_cents(5_000));
        assert_eq!(service.store().lists.load(Ordering::SeqCst), 1);

        // a newer read winning the only attempt is still a result
        let other_dir = TempDir::new().unwrap();
        let single =
            racing_service(&other_dir, Interference::NewerRead, 1).with_snapshot_attempts(1);
        assert!(single.get_summary(&owner(), &FilterSpec::all()).is_ok());
    }

    #[test]
    fn test_conflict_after_exhausted_attempts() {
        let temp_dir = TempDir::new().unwrap();
        let service =
            racing_service(&temp_dir, Interference::Write, usize::MAX).with_snapshot_attempts(4);

        let err = service.get_summary(&owner(), &FilterSpec::all()).unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(_)));
        assert_eq!(service.store().lists.load(Ordering::SeqCst), 4);
    }
}
