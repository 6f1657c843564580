//! Budget repository for JSON storage
//!
//! Manages loading and saving budgets to budgets.json.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Budget, BudgetId, OwnerId};

use super::file_io::{read_json, write_json_atomic};
use super::poisoned;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(poisoned)?;
        data.clear();
        for budget in file_data.budgets {
            data.insert(budget.id, budget);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self.data.read().map_err(poisoned)?;

        let mut budgets: Vec<_> = data.values().cloned().collect();
        sort_budgets(&mut budgets);

        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, LedgerError> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.get(&id).cloned())
    }

    /// Budgets of one owner, ordered by period then creation
    pub fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Budget>, LedgerError> {
        let data = self.data.read().map_err(poisoned)?;

        let mut budgets: Vec<_> = data
            .values()
            .filter(|b| &b.owner_id == owner)
            .cloned()
            .collect();
        sort_budgets(&mut budgets);
        Ok(budgets)
    }

    /// Insert or replace a budget, returning the previous version
    pub fn upsert(&self, budget: Budget) -> Result<Option<Budget>, LedgerError> {
        let mut data = self.data.write().map_err(poisoned)?;
        Ok(data.insert(budget.id, budget))
    }

    pub fn delete(&self, id: BudgetId) -> Result<Option<Budget>, LedgerError> {
        let mut data = self.data.write().map_err(poisoned)?;
        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.len())
    }
}

fn sort_budgets(budgets: &mut [Budget]) {
    budgets.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
}
