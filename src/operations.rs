//! Cache Operations Coordinator
//!
//! Single entry point composing the read, write, delete and cleanup paths
//! over a caller-owned [`CacheStore`].

use std::time::Duration;

use chrono::Utc;
use regex::Regex;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStore, CacheValue};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::models::EntryReport;
use crate::ops::{cleanup, delete, get, set, Callbacks};

// == Cache Operations ==
/// Façade over the cache operations.
///
/// Holds the policy configuration and observers; the entries themselves live
/// in the [`CacheStore`] passed to every call. Nothing here is synchronized:
/// concurrent callers must serialize access to the store themselves, e.g.
/// through [`SharedCache`](crate::SharedCache).
#[derive(Debug, Clone, Default)]
pub struct CacheOperations {
    config: CacheConfig,
    callbacks: Callbacks,
}

impl CacheOperations {
    // == Constructor ==
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            callbacks: Callbacks::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Swaps the configuration. Existing entries are not re-evaluated.
    pub fn set_config(&mut self, config: CacheConfig) {
        debug!(policy = %config.eviction_policy, "cache configuration replaced");
        self.config = config;
    }

    pub fn set_callbacks(&mut self, callbacks: Callbacks) {
        self.callbacks = callbacks;
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Compressed entries are returned as their compressed bytes.
    pub fn get(&self, store: &mut CacheStore, key: &str) -> Result<CacheValue> {
        get::get(store, &self.callbacks, key)
    }

    /// True if `key` is present and not expired.
    pub fn exists(&self, store: &CacheStore, key: &str) -> bool {
        get::exists(store, key)
    }

    /// Clones the full entry under `key` without touching any bookkeeping.
    pub fn get_entry(&self, store: &CacheStore, key: &str) -> Option<CacheEntry> {
        store.entry(key).cloned()
    }

    /// Bookkeeping of the live entry under `key`, without its value.
    pub fn entry_report(&self, store: &CacheStore, key: &str) -> Option<EntryReport> {
        store
            .entry(key)
            .filter(|entry| !entry.is_expired())
            .map(EntryReport::from)
    }

    // == Set ==
    /// Stores a value. `Duration::ZERO` applies the configured default TTL.
    pub fn set(
        &self,
        store: &mut CacheStore,
        key: impl Into<String>,
        value: impl Into<CacheValue>,
        ttl: Duration,
    ) -> Result<()> {
        set::set(
            store,
            &self.config,
            &self.callbacks,
            key.into(),
            value.into(),
            ttl,
        )
    }

    // == Delete ==
    pub fn delete(&self, store: &mut CacheStore, key: &str) -> Result<()> {
        delete::delete(store, &self.callbacks, key)
    }

    pub fn clear(&self, store: &mut CacheStore) {
        delete::clear(store);
    }

    // == Cleanup ==
    /// Removes expired entries, returning their keys sorted.
    pub fn clean(&self, store: &mut CacheStore) -> Vec<String> {
        cleanup::clean(store, &self.callbacks)
    }

    /// Removes expired entries and recomputes live totals.
    pub fn compact(&self, store: &mut CacheStore) -> Result<()> {
        cleanup::compact(store, &self.callbacks)
    }

    pub fn get_expired_keys(&self, store: &CacheStore) -> Vec<String> {
        cleanup::expired_keys(store)
    }

    // == Key Enumeration ==
    /// All live keys, sorted.
    pub fn get_keys(&self, store: &CacheStore) -> Vec<String> {
        live_keys(store, |_| true)
    }

    /// Live keys matching the regular expression `pattern`, sorted.
    pub fn get_keys_by_pattern(&self, store: &CacheStore, pattern: &str) -> Result<Vec<String>> {
        let regex = Regex::new(pattern).map_err(|e| CacheError::InvalidPattern(e.to_string()))?;
        Ok(live_keys(store, |key| regex.is_match(key)))
    }

    /// Keys in the order the configured policy would evict them.
    pub fn eviction_order(&self, store: &CacheStore) -> Vec<String> {
        self.config.eviction_policy.eviction_order(store)
    }
}

fn live_keys(store: &CacheStore, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
    let now = Utc::now();
    let mut keys: Vec<String> = store
        .entries()
        .filter(|entry| !entry.is_expired_at(now) && keep(entry.key.as_str()))
        .map(|entry| entry.key.clone())
        .collect();
    keys.sort();
    keys
}
