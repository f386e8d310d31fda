//! Concurrent keyed storage of account lockout records.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::record::AccountRecord;

/// Concurrent store of [`AccountRecord`]s keyed by normalized username.
///
/// The store is the exclusive owner of all records; callers only ever see
/// cloned snapshots. All mutations, attempt processing and administrative
/// alike, go through [`transact`](Self::transact) or
/// [`update_existing`](Self::update_existing), which hold the shard lock for
/// the key across load-transition-commit. Two concurrent updates for the
/// same username can therefore never both read the same pre-state and
/// independently commit.
///
/// Constructed once at startup and shared via `Arc` between the
/// attempt-processing and administrative surfaces.
#[derive(Debug, Default)]
pub struct LockoutStore {
    records: DashMap<String, AccountRecord>,
}

impl LockoutStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Snapshot of the record for a normalized username, if one exists.
    pub fn get(&self, username: &str) -> Option<AccountRecord> {
        self.records.get(username).map(|r| r.clone())
    }

    /// Atomically load, transform, and commit the record under `username`.
    ///
    /// The closure observes the current record (or `None` if the username
    /// has never been seen) and returns the record to commit together with a
    /// caller-defined outcome. The key's shard lock is held for the whole
    /// operation, so no other mutation for the same key can interleave
    /// between load and commit.
    pub fn transact<D>(
        &self,
        username: &str,
        f: impl FnOnce(Option<&AccountRecord>) -> (AccountRecord, D),
    ) -> (AccountRecord, D) {
        match self.records.entry(username.to_string()) {
            Entry::Occupied(mut occupied) => {
                let (next, outcome) = f(Some(occupied.get()));
                occupied.insert(next.clone());
                (next, outcome)
            }
            Entry::Vacant(vacant) => {
                let (next, outcome) = f(None);
                vacant.insert(next.clone());
                (next, outcome)
            }
        }
    }

    /// Atomically update an existing record, or return `None` if the
    /// username has never been seen. Unlike [`transact`](Self::transact)
    /// this never creates a record.
    pub fn update_existing<D>(
        &self,
        username: &str,
        f: impl FnOnce(&AccountRecord) -> (AccountRecord, D),
    ) -> Option<(AccountRecord, D)> {
        self.records.get_mut(username).map(|mut current| {
            let (next, outcome) = f(&current);
            *current = next.clone();
            (next, outcome)
        })
    }

    /// Delete the record for a username; returns whether one existed.
    pub fn remove(&self, username: &str) -> bool {
        self.records.remove(username).is_some()
    }

    /// Point-in-time snapshots of every record.
    ///
    /// Iteration may observe a mixture of states across keys while writers
    /// are active, but each individual snapshot is internally consistent.
    pub fn snapshots(&self) -> Vec<AccountRecord> {
        self.records.iter().map(|r| r.value().clone()).collect()
    }

    /// Empty the store, returning how many records were actually removed.
    pub fn clear(&self) -> usize {
        let keys: Vec<String> = self.records.iter().map(|r| r.key().clone()).collect();
        keys.iter()
            .filter(|key| self.records.remove(key.as_str()).is_some())
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
