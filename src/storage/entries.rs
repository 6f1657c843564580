//! Entry repository for JSON storage
//!
//! Manages loading and saving entries to entries.json, with an owner index.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Entry, EntryId, OwnerId};
use crate::reports::{sort_entries, SortOrder};

use super::file_io::{read_json, write_json_atomic};
use super::poisoned;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EntryData {
    entries: Vec<Entry>,
}

/// Repository for entry persistence with an owner index
pub struct EntryRepository {
    path: PathBuf,
    data: RwLock<HashMap<EntryId, Entry>>,
    by_owner: RwLock<HashMap<OwnerId, Vec<EntryId>>>,
}

impl EntryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_owner: RwLock::new(HashMap::new()),
        }
    }

    /// Load entries from disk and rebuild the owner index
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: EntryData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(poisoned)?;
        let mut by_owner = self.by_owner.write().map_err(poisoned)?;

        data.clear();
        by_owner.clear();

        for entry in file_data.entries {
            by_owner
                .entry(entry.owner_id.clone())
                .or_default()
                .push(entry.id);
            data.insert(entry.id, entry);
        }

        Ok(())
    }

    /// Save entries to disk, oldest first
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self.data.read().map_err(poisoned)?;

        let mut entries: Vec<_> = data.values().cloned().collect();
        sort_entries(&mut entries, SortOrder::OldestFirst);

        write_json_atomic(&self.path, &EntryData { entries })
    }

    pub fn get(&self, id: EntryId) -> Result<Option<Entry>, LedgerError> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.get(&id).cloned())
    }

    /// All entries of one owner in chronological order
    pub fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Entry>, LedgerError> {
        let data = self.data.read().map_err(poisoned)?;
        let by_owner = self.by_owner.read().map_err(poisoned)?;

        let ids = by_owner.get(owner).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut entries: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        sort_entries(&mut entries, SortOrder::OldestFirst);
        Ok(entries)
    }

    /// Insert or replace an entry, returning the previous version
    pub fn upsert(&self, entry: Entry) -> Result<Option<Entry>, LedgerError> {
        let mut data = self.data.write().map_err(poisoned)?;
        let mut by_owner = self.by_owner.write().map_err(poisoned)?;

        let previous = data.get(&entry.id).cloned();
        if let Some(old) = &previous {
            if let Some(ids) = by_owner.get_mut(&old.owner_id) {
                ids.retain(|&id| id != entry.id);
            }
        }

        by_owner
            .entry(entry.owner_id.clone())
            .or_default()
            .push(entry.id);
        data.insert(entry.id, entry);

        Ok(previous)
    }

    /// Remove an entry, returning it if it existed
    pub fn delete(&self, id: EntryId) -> Result<Option<Entry>, LedgerError> {
        let mut data = self.data.write().map_err(poisoned)?;
        let mut by_owner = self.by_owner.write().map_err(poisoned)?;

        let removed = data.remove(&id);
        if let Some(entry) = &removed {
            if let Some(ids) = by_owner.get_mut(&entry.owner_id) {
                ids.retain(|&eid| eid != id);
            }
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.len())
    }
}
