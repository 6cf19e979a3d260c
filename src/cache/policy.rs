//! Eviction Policy Module
//!
//! Orders entries by removal priority for each eviction policy.

use std::cmp::Ordering;

use crate::cache::{CacheEntry, CacheStore};
use crate::config::EvictionPolicy;

impl EvictionPolicy {
    // == Compare ==
    /// Orders two entries so that the one to evict first sorts first.
    ///
    /// Timestamp ties fall back to the store's logical clock, so entries
    /// written or read within the same clock reading still order stably.
    pub fn compare(&self, a: &CacheEntry, b: &CacheEntry) -> Ordering {
        match self {
            EvictionPolicy::Lru => a
                .accessed_at
                .cmp(&b.accessed_at)
                .then(a.access_tick.cmp(&b.access_tick)),
            EvictionPolicy::Lfu => a
                .access_count
                .cmp(&b.access_count)
                .then(a.access_tick.cmp(&b.access_tick)),
            EvictionPolicy::Fifo => a
                .created_at
                .cmp(&b.created_at)
                .then(a.insert_tick.cmp(&b.insert_tick)),
            EvictionPolicy::Ttl => match (a.expires_at, b.expires_at) {
                (Some(x), Some(y)) => x.cmp(&y).then(a.insert_tick.cmp(&b.insert_tick)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a
                    .created_at
                    .cmp(&b.created_at)
                    .then(a.insert_tick.cmp(&b.insert_tick)),
            },
        }
    }

    // == Eviction Order ==
    /// Returns every key in the store, first eviction candidate first.
    pub fn eviction_order(&self, store: &CacheStore) -> Vec<String> {
        let mut entries: Vec<&CacheEntry> = store.entries().collect();
        entries.sort_by(|a, b| self.compare(a, b));
        entries.into_iter().map(|entry| entry.key.clone()).collect()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheValue;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Duration;

    fn insert(store: &mut CacheStore, key: &str, ttl: Duration) {
        store.insert(CacheEntry::new(key, CacheValue::from("v"), ttl));
    }

    #[test]
    fn test_fifo_orders_by_insertion() {
        let mut store = CacheStore::new();
        insert(&mut store, "a", Duration::ZERO);
        insert(&mut store, "b", Duration::ZERO);
        insert(&mut store, "c", Duration::ZERO);

        assert_eq!(EvictionPolicy::Fifo.eviction_order(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lru_orders_by_access() {
        let mut store = CacheStore::new();
        insert(&mut store, "a", Duration::ZERO);
        insert(&mut store, "b", Duration::ZERO);
        insert(&mut store, "c", Duration::ZERO);

        let tick = store.next_tick();
        store.entries.get_mut("a").unwrap().touch(tick);

        assert_eq!(EvictionPolicy::Lru.eviction_order(&store), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_lfu_orders_by_access_count() {
        let mut store = CacheStore::new();
        insert(&mut store, "a", Duration::ZERO);
        insert(&mut store, "b", Duration::ZERO);

        for _ in 0..3 {
            let tick = store.next_tick();
            store.entries.get_mut("a").unwrap().touch(tick);
        }
        let tick = store.next_tick();
        store.entries.get_mut("b").unwrap().touch(tick);

        assert_eq!(EvictionPolicy::Lfu.eviction_order(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_ttl_puts_non_expiring_last() {
        let mut store = CacheStore::new();
        insert(&mut store, "forever_old", Duration::ZERO);
        insert(&mut store, "late", Duration::from_secs(60));
        insert(&mut store, "forever_new", Duration::ZERO);
        insert(&mut store, "soon", Duration::from_secs(5));

        assert_eq!(
            EvictionPolicy::Ttl.eviction_order(&store),
            vec!["soon", "late", "forever_old", "forever_new"]
        );
    }

    #[test]
    fn test_ttl_compare_explicit_instants() {
        let now = Utc::now();
        let mut a = CacheEntry::new("a", CacheValue::from("v"), Duration::ZERO);
        let mut b = CacheEntry::new("b", CacheValue::from("v"), Duration::ZERO);
        a.expires_at = Some(now + ChronoDuration::seconds(10));
        b.expires_at = Some(now + ChronoDuration::seconds(1));

        assert_eq!(EvictionPolicy::Ttl.compare(&a, &b), Ordering::Greater);
        b.expires_at = None;
        assert_eq!(EvictionPolicy::Ttl.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_empty_store_has_no_candidates() {
        let store = CacheStore::new();
        assert!(EvictionPolicy::Lru.eviction_order(&store).is_empty());
    }
}
