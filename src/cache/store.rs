//! Cache Store Module
//!
//! The entry map and its aggregate metrics. The store holds no policy of its
//! own: every operation in [`crate::ops`] receives it by mutable reference.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheMetrics};

// == Cache Store ==
/// Caller-owned entry map plus metrics.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    pub(crate) entries: HashMap<String, CacheEntry>,
    /// Performance counters and live occupancy
    pub(crate) metrics: CacheMetrics,
    /// Logical clock stamped onto inserts and reads
    tick: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry stored under `key`, expired or not.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over every stored entry, including expired ones.
    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.values()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Direct access to the counters, for hosts that keep their own books.
    pub fn metrics_mut(&mut self) -> &mut CacheMetrics {
        &mut self.metrics
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact sum of stored entry sizes.
    pub fn total_size(&self) -> u64 {
        self.entries.values().map(|entry| entry.size).sum()
    }

    pub(crate) fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Inserts an entry stamped with a fresh tick, returning any entry it replaced.
    pub(crate) fn insert(&mut self, mut entry: CacheEntry) -> Option<CacheEntry> {
        let tick = self.next_tick();
        entry.insert_tick = tick;
        entry.access_tick = tick;
        self.entries.insert(entry.key.clone(), entry)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        self.entries.remove(key)
    }
}
