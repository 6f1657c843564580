//! Budget service
//!
//! Monthly budget management. Budgets do not change any entry snapshot, but
//! mutations still invalidate the owner's cache so that budget views never
//! mix data from before and after a write.

use tracing::info;

use super::snapshot::SnapshotCache;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, BudgetFilter, BudgetId, BudgetPatch, OwnerId, RawBudget, YearMonth};
use crate::storage::EntryStore;

/// Service for budget management
pub struct BudgetService<'a, S: EntryStore> {
    store: &'a S,
    cache: &'a SnapshotCache,
}

impl<'a, S: EntryStore> BudgetService<'a, S> {
    pub fn new(store: &'a S, cache: &'a SnapshotCache) -> Self {
        Self { store, cache }
    }

    pub fn create(&self, owner: &OwnerId, raw: RawBudget) -> LedgerResult<Budget> {
        let draft = raw.normalize(owner)?;
        let budget = self.store.create_budget(draft)?;
        self.cache.invalidate(owner)?;

        info!(owner = %owner, budget = %budget.id, period = %budget.period, "budget created");
        Ok(budget)
    }

    pub fn get(&self, owner: &OwnerId, id: BudgetId) -> LedgerResult<Budget> {
        self.store
            .get_budget(id)?
            .filter(|budget| &budget.owner_id == owner)
            .ok_or_else(|| LedgerError::budget_not_found(id.to_string()))
    }

    pub fn update(
        &self,
        owner: &OwnerId,
        id: BudgetId,
        patch: BudgetPatch,
    ) -> LedgerResult<Budget> {
        let current = self.get(owner, id)?;
        if patch.is_empty() {
            return Ok(current);
        }

        let draft = patch.merge(&current)?;
        let budget = self.store.update_budget(id, draft)?;
        self.cache.invalidate(owner)?;

        info!(owner = %owner, budget = %budget.id, "budget updated");
        Ok(budget)
    }

    pub fn remove(&self, owner: &OwnerId, id: BudgetId) -> LedgerResult<Budget> {
        let budget = self.get(owner, id)?;
        self.store.delete_budget(id)?;
        self.cache.invalidate(owner)?;

        info!(owner = %owner, budget = %id, "budget removed");
        Ok(budget)
    }

    /// Budgets of `owner`, newest period first
    ///
    /// Budgets sharing a period are ordered by creation, newest first.
    pub fn list(&self, owner: &OwnerId, month: Option<YearMonth>) -> LedgerResult<Vec<Budget>> {
        let filter = month.map(|m| BudgetFilter::new().period(m));
        let mut budgets = self.store.list_budgets(owner, filter.as_ref())?;
        budgets.sort_by(|a, b| {
            b.period
                .cmp(&a.period)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(budgets)
    }
}
