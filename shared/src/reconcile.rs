//! Client cache reconciliation
//!
//! Two pieces:
//! - [`VersionedStore`]: a keyed cache where every entry carries a monotonic
//!   version. Stale writes (lower version than held) are dropped and deletions
//!   leave tombstones, so a late push cannot resurrect a deleted record.
//! - [`LocalState`] + [`apply`]: optimistic edits as explicit state
//!   transitions. A confirmed edit keeps the optimistic value, a rejected one
//!   falls back to the last confirmed value and flags a re-fetch.

use std::collections::HashMap;

use crate::message::OrderEvent;
use crate::models::Order;

/// Record with a stable key and a monotonic revision
pub trait Versioned {
    fn key(&self) -> &str;
    fn version(&self) -> u64;
}

impl Versioned for Order {
    fn key(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Point in a store's write history, taken when a fetch is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnapshotMark(u64);

/// Keyed cache with version checks and deletion tombstones
#[derive(Debug, Clone)]
pub struct VersionedStore<T> {
    entries: HashMap<String, T>,
    tombstones: HashMap<String, u64>,
    /// Write tick of each held entry
    written: HashMap<String, u64>,
    clock: u64,
}

impl<T> Default for VersionedStore<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            tombstones: HashMap::new(),
            written: HashMap::new(),
            clock: 0,
        }
    }
}

impl<T: Versioned + Clone> VersionedStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `item` is at least as new as what is held
    fn accepts(&self, item: &T) -> bool {
        if let Some(&dead) = self.tombstones.get(item.key()) {
            // Only a strictly newer revision brings a deleted key back
            if item.version() <= dead {
                return false;
            }
        }
        self.entries
            .get(item.key())
            .is_none_or(|held| item.version() >= held.version())
    }

    /// Insert or replace; returns false when the write is stale
    pub fn upsert(&mut self, item: T) -> bool {
        if !self.accepts(&item) {
            return false;
        }
        self.tombstones.remove(item.key());
        self.clock += 1;
        self.written.insert(item.key().to_string(), self.clock);
        self.entries.insert(item.key().to_string(), item);
        true
    }

    /// Remove `key`, leaving a tombstone at `version` (or the held version)
    pub fn remove(&mut self, key: &str, version: Option<u64>) -> Option<T> {
        let removed = self.entries.remove(key);
        self.written.remove(key);
        let held = removed.as_ref().map(Versioned::version).unwrap_or(0);
        let dead = version.unwrap_or(held).max(held);
        let slot = self.tombstones.entry(key.to_string()).or_insert(dead);
        *slot = (*slot).max(dead);
        removed
    }

    /// Mark to pass to [`merge_snapshot`](Self::merge_snapshot) once the
    /// fetch issued now resolves
    pub fn mark(&self) -> SnapshotMark {
        SnapshotMark(self.clock)
    }

    /// Replace contents with a snapshot fetched since `since`
    ///
    /// Fetched entries older than held ones keep the held value; tombstoned
    /// keys stay dead unless the snapshot carries a newer revision. Keys absent
    /// from the snapshot are dropped, except those written after `since`: the
    /// snapshot was read before they existed.
    pub fn merge_snapshot(&mut self, snapshot: Vec<T>, since: SnapshotMark) {
        let mut next = HashMap::with_capacity(snapshot.len());
        for item in snapshot {
            if let Some(&dead) = self.tombstones.get(item.key())
                && item.version() <= dead
            {
                continue;
            }
            let keep = match self.entries.get(item.key()) {
                Some(held) if held.version() > item.version() => held.clone(),
                _ => item,
            };
            next.insert(keep.key().to_string(), keep);
        }

        self.clock += 1;
        let mut written = HashMap::with_capacity(next.len());
        for key in next.keys() {
            written.insert(key.clone(), self.clock);
        }
        for (key, held) in &self.entries {
            if let Some(&at) = self.written.get(key)
                && at > since.0
                && !next.contains_key(key)
            {
                next.insert(key.clone(), held.clone());
                written.insert(key.clone(), at);
            }
        }

        self.tombstones.retain(|key, _| !next.contains_key(key));
        self.entries = next;
        self.written = written;
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_tombstoned(&self, key: &str) -> bool {
        self.tombstones.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Drop everything, tombstones included
    pub fn clear(&mut self) {
        self.entries.clear();
        self.tombstones.clear();
        self.written.clear();
    }
}

/// Result of applying a push event to a branch-scoped order cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    /// Tagged with another branch
    OtherBranch,
    /// Older than the held revision, or deleted
    Stale,
    /// Deletion of an order not held locally
    NotHeld,
}

/// Apply a realtime event to the orders of `branch_id`
///
/// Created/updated events tagged with another branch are discarded. Deletions
/// carry no branch tag and only apply to orders already held.
pub fn apply_event(
    store: &mut VersionedStore<Order>,
    event: OrderEvent,
    branch_id: &str,
) -> EventOutcome {
    match event {
        OrderEvent::Created { order, branch_id: tag } | OrderEvent::Updated { order, branch_id: tag } => {
            if tag.as_deref().is_some_and(|b| b != branch_id) {
                return EventOutcome::OtherBranch;
            }
            if store.upsert(order) {
                EventOutcome::Applied
            } else {
                EventOutcome::Stale
            }
        }
        OrderEvent::Deleted { id, version } => {
            if !store.contains(&id) {
                return EventOutcome::NotHeld;
            }
            store.remove(&id, version);
            EventOutcome::Applied
        }
    }
}

/// View-model state for an optimistically edited value
#[derive(Debug, Clone, PartialEq)]
pub struct LocalState<T> {
    /// Last value the server acknowledged
    pub confirmed: T,
    /// Pending local edit, shown instead of `confirmed`
    pub optimistic: Option<T>,
    /// The confirmed value may be out of date; re-fetch before trusting it
    pub needs_refetch: bool,
}

impl<T> LocalState<T> {
    pub fn new(confirmed: T) -> Self {
        Self {
            confirmed,
            optimistic: None,
            needs_refetch: false,
        }
    }

    /// Value to render
    pub fn visible(&self) -> &T {
        self.optimistic.as_ref().unwrap_or(&self.confirmed)
    }

    /// Publish an optimistic edit
    pub fn propose(self, value: T) -> Self {
        Self {
            optimistic: Some(value),
            ..self
        }
    }

    pub fn is_pending(&self) -> bool {
        self.optimistic.is_some()
    }
}

/// Server answer to an optimistic edit
#[derive(Debug, Clone, PartialEq)]
pub enum ServerOutcome<T> {
    /// Accepted; carries the canonical value when the server returned one
    Confirmed(Option<T>),
    /// Rejected or failed
    Rejected,
    /// Fresh canonical value from a re-fetch
    Fetched(T),
}

/// Reconcile local state with a server outcome
pub fn apply<T>(local: LocalState<T>, server: ServerOutcome<T>) -> LocalState<T> {
    match server {
        ServerOutcome::Confirmed(canonical) => {
            let confirmed = canonical.or(local.optimistic).unwrap_or(local.confirmed);
            LocalState {
                confirmed,
                optimistic: None,
                needs_refetch: local.needs_refetch,
            }
        }
        ServerOutcome::Rejected => LocalState {
            confirmed: local.confirmed,
            optimistic: None,
            needs_refetch: true,
        },
        ServerOutcome::Fetched(value) => LocalState::new(value),
    }
}
