//! Read path: hit/miss classification and lazy expiry.

use chrono::Utc;
use tracing::debug;

use crate::cache::{CacheStore, CacheValue};
use crate::error::{CacheError, Result};
use crate::ops::Callbacks;

// == Get ==
/// Retrieves a value by key.
///
/// Expired entries are removed on the spot and their size released from
/// the live totals before the miss is reported.
pub fn get(store: &mut CacheStore, callbacks: &Callbacks, key: &str) -> Result<CacheValue> {
    let expired = match store.entries.get(key) {
        Some(entry) => entry.is_expired_at(Utc::now()),
        None => {
            store.metrics.record_miss();
            callbacks.miss(key);
            return Err(CacheError::NotFound(key.to_string()));
        }
    };

    if expired {
        if let Some(entry) = store.remove(key) {
            let remaining = store.len();
            store.metrics.release(entry.size, remaining);
        }
        store.metrics.record_miss();
        debug!(key, "lazily expired entry on read");
        callbacks.miss(key);
        return Err(CacheError::Expired(key.to_string()));
    }

    let tick = store.next_tick();
    let value = match store.entries.get_mut(key) {
        Some(entry) => {
            entry.touch(tick);
            entry.value.clone()
        }
        None => return Err(CacheError::NotFound(key.to_string())),
    };

    store.metrics.record_hit();
    callbacks.hit(key);
    Ok(value)
}

// == Exists ==
/// True if `key` is stored and not expired. Touches no bookkeeping.
pub fn exists(store: &CacheStore, key: &str) -> bool {
    store
        .entry(key)
        .map(|entry| !entry.is_expired())
        .unwrap_or(false)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEntry;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread::sleep;
    use std::time::Duration;

    fn store_with(key: &str, value: &str, ttl: Duration) -> CacheStore {
        let mut store = CacheStore::new();
        let entry = CacheEntry::new(key, CacheValue::from(value), ttl);
        let size = entry.size;
        store.insert(entry);
        let len = store.len();
        store.metrics.record_set(size, len);
        store
    }

    #[test]
    fn test_get_hit_updates_bookkeeping() {
        let mut store = store_with("k", "value", Duration::ZERO);
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let callbacks = Callbacks::new().on_hit(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let value = get(&mut store, &callbacks, "k").unwrap();
        assert_eq!(value.as_str(), Some("value"));
        get(&mut store, &callbacks, "k").unwrap();

        assert_eq!(store.entry("k").unwrap().access_count, 2);
        assert_eq!(store.metrics().hits, 2);
        assert_eq!(store.metrics().gets, 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_get_missing_key() {
        let mut store = CacheStore::new();
        let misses = Arc::new(AtomicUsize::new(0));
        let counter = misses.clone();
        let callbacks = Callbacks::new().on_miss(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let result = get(&mut store, &callbacks, "nope");
        assert_eq!(result, Err(CacheError::NotFound("nope".to_string())));
        assert_eq!(store.metrics().misses, 1);
        assert_eq!(store.metrics().gets, 1);
        assert_eq!(misses.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_get_expired_removes_and_releases() {
        let mut store = store_with("k", "value", Duration::from_millis(1));
        assert_eq!(store.metrics().current_size, 5);

        sleep(Duration::from_millis(5));

        let result = get(&mut store, &Callbacks::new(), "k");
        assert_eq!(result, Err(CacheError::Expired("k".to_string())));
        assert!(store.is_empty());
        assert_eq!(store.metrics().current_size, 0);
        assert_eq!(store.metrics().current_entries, 0);
        assert_eq!(store.metrics().misses, 1);
        assert_eq!(store.metrics().evictions, 0);

        // A second read sees a plain miss.
        let result = get(&mut store, &Callbacks::new(), "k");
        assert_eq!(result, Err(CacheError::NotFound("k".to_string())));
    }

    #[test]
    fn test_exists_is_pure() {
        let store = store_with("k", "value", Duration::ZERO);

        assert!(exists(&store, "k"));
        assert!(!exists(&store, "other"));
        assert_eq!(store.metrics().gets, 0);
        assert_eq!(store.entry("k").unwrap().access_count, 0);
    }

    #[test]
    fn test_exists_false_for_expired() {
        let store = store_with("k", "value", Duration::from_millis(1));
        sleep(Duration::from_millis(5));

        assert!(!exists(&store, "k"));
        assert!(store.contains_key("k"));
    }
}
