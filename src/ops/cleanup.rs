//! Active expiry sweep and compaction.

use chrono::Utc;
use tracing::debug;

use crate::cache::CacheStore;
use crate::error::Result;
use crate::ops::{Callbacks, EvictionReason};

// == Clean ==
/// Removes every expired entry.
///
/// Returns the removed keys, sorted.
pub fn clean(store: &mut CacheStore, callbacks: &Callbacks) -> Vec<String> {
    let expired = expired_keys(store);

    for key in &expired {
        if let Some(entry) = store.remove(key) {
            let remaining = store.len();
            store.metrics.record_eviction(entry.size, remaining);
            callbacks.evicted(key, EvictionReason::Ttl);
        }
    }

    if !expired.is_empty() {
        debug!(removed = expired.len(), "expired entries swept");
    }
    expired
}

// == Compact ==
/// Sweeps expired entries, then recomputes live totals from the store.
pub fn compact(store: &mut CacheStore, callbacks: &Callbacks) -> Result<()> {
    clean(store, callbacks);

    let actual_size = store.total_size();
    if actual_size != store.metrics.current_size {
        debug!(
            recorded = store.metrics.current_size,
            actual = actual_size,
            "corrected size drift"
        );
    }
    store.metrics.current_size = actual_size;
    store.metrics.current_entries = store.len();
    Ok(())
}

// == Expired Keys ==
/// Keys of expired entries, sorted. Removes nothing.
pub fn expired_keys(store: &CacheStore) -> Vec<String> {
    let now = Utc::now();
    let mut keys: Vec<String> = store
        .entries()
        .filter(|entry| entry.is_expired_at(now))
        .map(|entry| entry.key.clone())
        .collect();
    keys.sort();
    keys
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheEntry, CacheValue};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread::sleep;
    use std::time::Duration;

    fn add(store: &mut CacheStore, key: &str, value: &str, ttl: Duration) {
        let entry = CacheEntry::new(key, CacheValue::from(value), ttl);
        let size = entry.size;
        store.insert(entry);
        let len = store.len();
        store.metrics.record_set(size, len);
    }

    fn mixed_store() -> CacheStore {
        let mut store = CacheStore::new();
        add(&mut store, "b_short", "12", Duration::from_millis(1));
        add(&mut store, "a_short", "345", Duration::from_millis(1));
        add(&mut store, "long", "6789", Duration::from_secs(60));
        add(&mut store, "forever", "0", Duration::ZERO);
        sleep(Duration::from_millis(5));
        store
    }

    #[test]
    fn test_expired_keys_is_read_only() {
        let store = mixed_store();

        assert_eq!(expired_keys(&store), vec!["a_short", "b_short"]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_clean_removes_expired() {
        let mut store = mixed_store();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let callbacks = Callbacks::new().on_eviction(move |_, reason| {
            assert_eq!(reason, EvictionReason::Ttl);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let removed = clean(&mut store, &callbacks);

        assert_eq!(removed, vec!["a_short", "b_short"]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.metrics().evictions, 2);
        assert_eq!(store.metrics().current_size, 5);
        assert_eq!(store.metrics().current_entries, 2);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clean_nothing_expired() {
        let mut store = CacheStore::new();
        add(&mut store, "k", "v", Duration::ZERO);

        assert!(clean(&mut store, &Callbacks::new()).is_empty());
        assert_eq!(store.metrics().evictions, 0);
    }

    #[test]
    fn test_compact_heals_drift() {
        let mut store = mixed_store();
        store.metrics_mut().current_size = 999;
        store.metrics_mut().current_entries = 42;

        compact(&mut store, &Callbacks::new()).unwrap();

        assert_eq!(store.metrics().current_size, 5);
        assert_eq!(store.metrics().current_entries, 2);
    }
}
