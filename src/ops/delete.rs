//! Single-key removal and full clear.

use tracing::debug;

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};
use crate::ops::{Callbacks, EvictionReason};

// == Delete ==
/// Removes an entry by key.
pub fn delete(store: &mut CacheStore, callbacks: &Callbacks, key: &str) -> Result<()> {
    let entry = store
        .remove(key)
        .ok_or_else(|| CacheError::NotFound(key.to_string()))?;

    let remaining = store.len();
    store.metrics.record_delete(entry.size, remaining);
    debug!(key, "deleted entry");
    callbacks.evicted(key, EvictionReason::Manual);
    Ok(())
}

// == Clear ==
/// Empties the store. Counters survive and no callbacks fire.
pub fn clear(store: &mut CacheStore) {
    let dropped = store.len();
    store.entries.clear();
    store.metrics.reset_occupancy();
    debug!(dropped, "cleared cache");
}
