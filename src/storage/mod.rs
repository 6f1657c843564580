//! Storage layer for ledgerview
//!
//! [`EntryStore`] is the boundary between the engine and wherever entries and
//! budgets actually live. Every call may fail with a transport error, which
//! callers propagate untouched. [`JsonStore`] is the file-backed
//! implementation: JSON files with atomic writes, one per record type.

pub mod budgets;
pub mod entries;
pub mod file_io;

pub use budgets::BudgetRepository;
pub use entries::EntryRepository;
pub use file_io::{read_json, write_json_atomic};

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Budget, BudgetFilter, BudgetId, Entry, EntryId, FilterSpec, NewBudget, NewEntry, OwnerId,
};
use crate::reports;

pub(crate) fn poisoned<T>(e: PoisonError<T>) -> LedgerError {
    LedgerError::Transport(format!("Storage lock poisoned: {}", e))
}

/// Persistence boundary for entries and budgets
///
/// Listings only ever return the given owner's records. Entries come back
/// in `(date, created_at, id)` order and budgets by period.
pub trait EntryStore: Send + Sync {
    fn list_entries(
        &self,
        owner: &OwnerId,
        filter: Option<&FilterSpec>,
    ) -> LedgerResult<Vec<Entry>>;

    fn get_entry(&self, id: EntryId) -> LedgerResult<Option<Entry>>;

    /// Persist a draft and assign its id
    fn create_entry(&self, draft: NewEntry) -> LedgerResult<Entry>;

    /// Replace the editable fields of an existing entry
    fn update_entry(&self, id: EntryId, draft: NewEntry) -> LedgerResult<Entry>;

    fn delete_entry(&self, id: EntryId) -> LedgerResult<()>;

    fn list_budgets(
        &self,
        owner: &OwnerId,
        filter: Option<&BudgetFilter>,
    ) -> LedgerResult<Vec<Budget>>;

    fn get_budget(&self, id: BudgetId) -> LedgerResult<Option<Budget>>;

    fn create_budget(&self, draft: NewBudget) -> LedgerResult<Budget>;

    fn update_budget(&self, id: BudgetId, draft: NewBudget) -> LedgerResult<Budget>;

    fn delete_budget(&self, id: BudgetId) -> LedgerResult<()>;
}

impl<S: EntryStore + ?Sized> EntryStore for Arc<S> {
    fn list_entries(
        &self,
        owner: &OwnerId,
        filter: Option<&FilterSpec>,
    ) -> LedgerResult<Vec<Entry>> {
        (**self).list_entries(owner, filter)
    }

    fn get_entry(&self, id: EntryId) -> LedgerResult<Option<Entry>> {
        (**self).get_entry(id)
    }

    fn create_entry(&self, draft: NewEntry) -> LedgerResult<Entry> {
        (**self).create_entry(draft)
    }

    fn update_entry(&self, id: EntryId, draft: NewEntry) -> LedgerResult<Entry> {
        (**self).update_entry(id, draft)
    }

    fn delete_entry(&self, id: EntryId) -> LedgerResult<()> {
        (**self).delete_entry(id)
    }

    fn list_budgets(
        &self,
        owner: &OwnerId,
        filter: Option<&BudgetFilter>,
    ) -> LedgerResult<Vec<Budget>> {
        (**self).list_budgets(owner, filter)
    }

    fn get_budget(&self, id: BudgetId) -> LedgerResult<Option<Budget>> {
        (**self).get_budget(id)
    }

    fn create_budget(&self, draft: NewBudget) -> LedgerResult<Budget> {
        (**self).create_budget(draft)
    }

    fn update_budget(&self, id: BudgetId, draft: NewBudget) -> LedgerResult<Budget> {
        (**self).update_budget(id, draft)
    }

    fn delete_budget(&self, id: BudgetId) -> LedgerResult<()> {
        (**self).delete_budget(id)
    }
}

/// File-backed [`EntryStore`]
///
/// A mutation is acknowledged only after its file has been rewritten. If
/// the write fails the in-memory change is rolled back and the error is
/// returned.
pub struct JsonStore {
    paths: LedgerPaths,
    entries: EntryRepository,
    budgets: BudgetRepository,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Open the store under `paths`, loading whatever is already on disk
    pub fn open(paths: LedgerPaths) -> LedgerResult<Self> {
        paths
            .ensure_directories()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let store = Self {
            entries: EntryRepository::new(paths.entries_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            paths,
            write_lock: Mutex::new(()),
        };
        store.entries.load()?;
        store.budgets.load()?;
        Ok(store)
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    fn commit_entry(&self, entry: Entry) -> LedgerResult<Entry> {
        let previous = self.entries.upsert(entry.clone())?;
        if let Err(e) = self.entries.save() {
            match previous {
                Some(old) => self.entries.upsert(old)?,
                None => self.entries.delete(entry.id)?,
            };
            return Err(e);
        }
        Ok(entry)
    }

    fn commit_budget(&self, budget: Budget) -> LedgerResult<Budget> {
        let previous = self.budgets.upsert(budget.clone())?;
        if let Err(e) = self.budgets.save() {
            match previous {
                Some(old) => self.budgets.upsert(old)?,
                None => self.budgets.delete(budget.id)?,
            };
            return Err(e);
        }
        Ok(budget)
    }
}

impl EntryStore for JsonStore {
    fn list_entries(
        &self,
        owner: &OwnerId,
        filter: Option<&FilterSpec>,
    ) -> LedgerResult<Vec<Entry>> {
        let entries = self.entries.list_for_owner(owner)?;
        Ok(match filter {
            Some(spec) => reports::filter(&entries, spec),
            None => entries,
        })
    }

    fn get_entry(&self, id: EntryId) -> LedgerResult<Option<Entry>> {
        self.entries.get(id)
    }

    fn create_entry(&self, draft: NewEntry) -> LedgerResult<Entry> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        self.commit_entry(Entry::from_new(EntryId::new(), draft, Utc::now()))
    }

    fn update_entry(&self, id: EntryId, draft: NewEntry) -> LedgerResult<Entry> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        let mut entry = self
            .entries
            .get(id)?
            .ok_or_else(|| LedgerError::entry_not_found(id.to_string()))?;
        entry.apply(draft, Utc::now());
        self.commit_entry(entry)
    }

    fn delete_entry(&self, id: EntryId) -> LedgerResult<()> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        let removed = self
            .entries
            .delete(id)?
            .ok_or_else(|| LedgerError::entry_not_found(id.to_string()))?;
        if let Err(e) = self.entries.save() {
            self.entries.upsert(removed)?;
            return Err(e);
        }
        Ok(())
    }

    fn list_budgets(
        &self,
        owner: &OwnerId,
        filter: Option<&BudgetFilter>,
    ) -> LedgerResult<Vec<Budget>> {
        let mut budgets = self.budgets.list_for_owner(owner)?;
        if let Some(filter) = filter {
            budgets.retain(|b| filter.matches(b));
        }
        Ok(budgets)
    }

    fn get_budget(&self, id: BudgetId) -> LedgerResult<Option<Budget>> {
        self.budgets.get(id)
    }

    fn create_budget(&self, draft: NewBudget) -> LedgerResult<Budget> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        self.commit_budget(Budget::from_new(BudgetId::new(), draft, Utc::now()))
    }

    fn update_budget(&self, id: BudgetId, draft: NewBudget) -> LedgerResult<Budget> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        let mut budget = self
            .budgets
            .get(id)?
            .ok_or_else(|| LedgerError::budget_not_found(id.to_string()))?;
        budget.apply(draft, Utc::now());
        self.commit_budget(budget)
    }

    fn delete_budget(&self, id: BudgetId) -> LedgerResult<()> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        let removed = self
            .budgets
            .delete(id)?
            .ok_or_else(|| LedgerError::budget_not_found(id.to_string()))?;
        if let Err(e) = self.budgets.save() {
            self.budgets.upsert(removed)?;
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryKind, RawBudget, RawEntry};
    use crate::test_support::owner;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, JsonStore) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = JsonStore::open(paths).unwrap();
        (temp_dir, store)
    }

    fn draft(kind: EntryKind, amount: &str, category: &str, date: &str) -> NewEntry {
        RawEntry::new(kind, amount, date)
            .category(category)
            .normalize(&owner())
            .unwrap()
    }

    #[test]
    fn test_open_creates_directories() {
        let (temp_dir, store) = create_test_store();
        assert!(temp_dir.path().join("data").exists());
        assert_eq!(store.paths().base_dir(), temp_dir.path());
    }

    #[test]
    fn test_create_and_list_with_filter() {
        let (_temp_dir, store) = create_test_store();
        store
            .create_entry(draft(EntryKind::Income, "1000", "", "2025-01-05"))
            .unwrap();
        let food = store
            .create_entry(draft(EntryKind::Expense, "300", "Food", "2025-01-10"))
            .unwrap();

        assert_eq!(store.list_entries(&owner(), None).unwrap().len(), 2);

        let spec = FilterSpec::all().kind(EntryKind::Expense);
        let listed = store.list_entries(&owner(), Some(&spec)).unwrap();
        assert_eq!(listed, vec![food]);

        let stranger = OwnerId::new("someone-else");
        assert!(store.list_entries(&stranger, None).unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete_missing_entry() {
        let (_temp_dir, store) = create_test_store();
        let missing = EntryId::new();

        let err = store
            .update_entry(missing, draft(EntryKind::Expense, "1", "A", "2025-01-01"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store.delete_entry(missing).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let (_temp_dir, store) = create_test_store();
        let created = store
            .create_entry(draft(EntryKind::Expense, "300", "Food", "2025-01-10"))
            .unwrap();

        let updated = store
            .update_entry(
                created.id,
                draft(EntryKind::Expense, "350", "Dining", "2025-01-11"),
            )
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.category, "Dining");
    }

    #[test]
    fn test_data_survives_reopen() {
        let (temp_dir, store) = create_test_store();
        let entry = store
            .create_entry(draft(EntryKind::Expense, "12.34", "Food", "2025-03-01"))
            .unwrap();
        let budget = store
            .create_budget(
                RawBudget::new("2025-03".parse().unwrap(), "500")
                    .normalize(&owner())
                    .unwrap(),
            )
            .unwrap();
        drop(store);

        let reopened =
            JsonStore::open(LedgerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        assert_eq!(reopened.get_entry(entry.id).unwrap(), Some(entry));
        assert_eq!(reopened.get_budget(budget.id).unwrap(), Some(budget));
    }

    #[test]
    fn test_budget_filter() {
        let (_temp_dir, store) = create_test_store();
        let jan = "2025-01".parse().unwrap();
        let feb = "2025-02".parse().unwrap();
        store
            .create_budget(RawBudget::new(jan, "100").normalize(&owner()).unwrap())
            .unwrap();
        let feb_budget = store
            .create_budget(RawBudget::new(feb, "200").normalize(&owner()).unwrap())
            .unwrap();

        let filter = BudgetFilter::new().period(feb);
        let listed = store.list_budgets(&owner(), Some(&filter)).unwrap();
        assert_eq!(listed, vec![feb_budget.clone()]);

        store.delete_budget(feb_budget.id).unwrap();
        assert!(store.get_budget(feb_budget.id).unwrap().is_none());
        assert!(store.delete_budget(feb_budget.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_corrupt_file_is_transport_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.entries_file(), "[oops").unwrap();

        let err = JsonStore::open(paths).err().unwrap();
        assert!(err.is_transport());
    }

    #[test]
    fn test_stored_budget_with_invalid_month_is_rejected() {
        let (temp_dir, store) = create_test_store();
        let period = "2025-03".parse().unwrap();
        store
            .create_budget(RawBudget::new(period, "100").normalize(&owner()).unwrap())
            .unwrap();
        let paths = store.paths().clone();
        drop(store);

        let text = std::fs::read_to_string(paths.budgets_file()).unwrap();
        let mut json: serde_json::Value = serde_json::from_str(&text).unwrap();
        json["budgets"][0]["period"]["month"] = serde_json::json!(13);
        std::fs::write(paths.budgets_file(), json.to_string()).unwrap();

        let err = JsonStore::open(LedgerPaths::with_base_dir(temp_dir.path().to_path_buf()))
            .err()
            .unwrap();
        assert!(err.is_transport());
    }
}
