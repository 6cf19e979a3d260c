//! Cache Metrics Module
//!
//! Tracks cache performance counters and live occupancy.

use serde::Serialize;

// == Cache Metrics ==
/// Cache-wide counters.
///
/// Everything except `current_entries` and `current_size` only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    /// Reads that returned a value
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Total reads
    pub gets: u64,
    /// Total writes
    pub sets: u64,
    /// Explicit deletions
    pub deletes: u64,
    /// Entries removed by capacity limits or expiry sweeps
    pub evictions: u64,
    /// Entries currently stored
    pub current_entries: usize,
    /// Sum of stored entry sizes in bytes
    pub current_size: u64,
}

impl CacheMetrics {
    // == Constructor ==
    /// Creates a new CacheMetrics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.gets += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.gets += 1;
    }

    /// Accounts for a newly stored entry of `size` bytes.
    pub fn record_set(&mut self, size: u64, entries: usize) {
        self.sets += 1;
        self.current_size += size;
        self.current_entries = entries;
    }

    pub fn record_delete(&mut self, size: u64, entries: usize) {
        self.deletes += 1;
        self.release(size, entries);
    }

    pub fn record_eviction(&mut self, size: u64, entries: usize) {
        self.evictions += 1;
        self.release(size, entries);
    }

    // == Release ==
    /// Drops `size` bytes from the live total without touching any counter.
    pub fn release(&mut self, size: u64, entries: usize) {
        self.current_size = self.current_size.saturating_sub(size);
        self.current_entries = entries;
    }

    /// Zeroes the live occupancy, leaving counters alone.
    pub fn reset_occupancy(&mut self) {
        self.current_size = 0;
        self.current_entries = 0;
    }
}
