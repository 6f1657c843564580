//! Entry service
//!
//! Create, edit, remove and look up entries on behalf of one owner. Input is
//! normalized here before it reaches the store, and every acknowledged
//! mutation invalidates the owner's cached snapshots.

use tracing::info;

use super::snapshot::SnapshotCache;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Entry, EntryId, EntryPatch, OwnerId, RawEntry};
use crate::storage::EntryStore;

/// Service for entry management
pub struct EntryService<'a, S: EntryStore> {
    store: &'a S,
    cache: &'a SnapshotCache,
}

impl<'a, S: EntryStore> EntryService<'a, S> {
    pub fn new(store: &'a S, cache: &'a SnapshotCache) -> Self {
        Self { store, cache }
    }

    /// Validate `raw` and persist it as a new entry
    pub fn create(&self, owner: &OwnerId, raw: RawEntry) -> LedgerResult<Entry> {
        let draft = raw.normalize(owner)?;
        let entry = self.store.create_entry(draft)?;
        self.cache.invalidate(owner)?;

        info!(owner = %owner, entry = %entry.id, kind = entry.kind.as_str(), "entry created");
        Ok(entry)
    }

    /// Fetch an entry; unknown, deleted and foreign ids are all `NotFound`
    pub fn get(&self, owner: &OwnerId, id: EntryId) -> LedgerResult<Entry> {
        self.store
            .get_entry(id)?
            .filter(|entry| &entry.owner_id == owner)
            .ok_or_else(|| LedgerError::entry_not_found(id.to_string()))
    }

    /// Merge `patch` onto the current entry and re-validate the result
    ///
    /// An empty patch returns the entry unchanged without writing.
    pub fn update(&self, owner: &OwnerId, id: EntryId, patch: EntryPatch) -> LedgerResult<Entry> {
        let current = self.get(owner, id)?;
        if patch.is_empty() {
            return Ok(current);
        }

        let draft = patch.merge(&current)?;
        let entry = self.store.update_entry(id, draft)?;
        self.cache.invalidate(owner)?;

        info!(owner = %owner, entry = %entry.id, "entry updated");
        Ok(entry)
    }

    pub fn remove(&self, owner: &OwnerId, id: EntryId) -> LedgerResult<Entry> {
        let entry = self.get(owner, id)?;
        self.store.delete_entry(id)?;
        self.cache.invalidate(owner)?;

        info!(owner = %owner, entry = %id, "entry removed");
        Ok(entry)
    }
}
