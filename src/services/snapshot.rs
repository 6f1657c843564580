//! Snapshot bookkeeping for last-request-wins reads
//!
//! Every fetch of an owner's entries is issued a [`FetchTicket`]. The
//! response is accepted only if the ticket is still the newest one issued
//! for the same `(owner, filter)` key and no mutation for that owner was
//! acknowledged since the ticket was issued. Accepted snapshots are cached
//! until the owner's next mutation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::LedgerResult;
use crate::models::{Entry, FilterSpec, OwnerId};
use crate::storage::poisoned;

type SnapshotKey = (OwnerId, FilterSpec);

/// Proof that a fetch was started, checked when its response comes back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    owner: OwnerId,
    filter: FilterSpec,
    sequence: u64,
    generation: u64,
}

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Debug)]
struct CachedSnapshot {
    generation: u64,
    entries: Arc<Vec<Entry>>,
}

#[derive(Debug, Default)]
struct CacheState {
    latest: HashMap<SnapshotKey, u64>,
    generations: HashMap<OwnerId, u64>,
    snapshots: HashMap<SnapshotKey, CachedSnapshot>,
}

impl CacheState {
    fn generation(&self, owner: &OwnerId) -> u64 {
        self.generations.get(owner).copied().unwrap_or(0)
    }
}

/// Per-owner snapshot cache with sequence-numbered fetch tickets
#[derive(Debug, Default)]
pub struct SnapshotCache {
    sequence: AtomicU64,
    state: RwLock<CacheState>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cached snapshot that is still current for the owner, if any
    pub fn lookup(
        &self,
        owner: &OwnerId,
        filter: &FilterSpec,
    ) -> LedgerResult<Option<Arc<Vec<Entry>>>> {
        let state = self.state.read().map_err(poisoned)?;
        let current = state.generation(owner);
        Ok(state
            .snapshots
            .get(&(owner.clone(), filter.clone()))
            .filter(|cached| cached.generation == current)
            .map(|cached| Arc::clone(&cached.entries)))
    }

    /// Start a fetch; supersedes every earlier ticket for the same key
    pub fn issue(&self, owner: &OwnerId, filter: &FilterSpec) -> LedgerResult<FetchTicket> {
        let mut state = self.state.write().map_err(poisoned)?;
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = state.generation(owner);
        state
            .latest
            .insert((owner.clone(), filter.clone()), sequence);

        Ok(FetchTicket {
            owner: owner.clone(),
            filter: filter.clone(),
            sequence,
            generation,
        })
    }

    /// Apply a fetch response, or `None` if it went stale in flight
    pub fn accept(
        &self,
        ticket: FetchTicket,
        entries: Vec<Entry>,
    ) -> LedgerResult<Option<Arc<Vec<Entry>>>> {
        let mut state = self.state.write().map_err(poisoned)?;

        if state.generation(&ticket.owner) != ticket.generation {
            return Ok(None);
        }

        let key = (ticket.owner, ticket.filter);
        if state.latest.get(&key) != Some(&ticket.sequence) {
            return Ok(None);
        }

        let entries = Arc::new(entries);
        state.snapshots.insert(
            key,
            CachedSnapshot {
                generation: ticket.generation,
                entries: Arc::clone(&entries),
            },
        );
        Ok(Some(entries))
    }

    /// Record an acknowledged mutation for `owner`
    ///
    /// Drops the owner's cached snapshots and makes every ticket issued so
    /// far for that owner stale.
    pub fn invalidate(&self, owner: &OwnerId) -> LedgerResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        *state.generations.entry(owner.clone()).or_insert(0) += 1;
        state.snapshots.retain(|(o, _), _| o != owner);
        Ok(())
    }
}
