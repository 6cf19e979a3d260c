//! Shared Cache
//!
//! Pairs the coordinator with its store behind one lock so that concurrent
//! tasks can use the cache safely. Every method holds the lock for exactly
//! one operation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::cache::{CacheStore, CacheValue};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::models::{EntryReport, MetricsReport};
use crate::operations::CacheOperations;
use crate::ops::Callbacks;
use crate::tasks::spawn_cleanup_task;

/// The coordinator and the store it operates on.
#[derive(Debug, Default)]
pub struct CacheState {
    pub ops: CacheOperations,
    pub store: CacheStore,
}

/// Thread-safe handle to a cache.
///
/// Contains the cache state wrapped in Arc<RwLock<>>; clones share the same
/// cache.
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    pub inner: Arc<RwLock<CacheState>>,
}

impl SharedCache {
    /// Creates a new SharedCache with an empty store.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheState {
                ops: CacheOperations::new(config),
                store: CacheStore::new(),
            })),
        }
    }

    /// Creates a new SharedCache from environment configuration.
    pub fn from_env() -> Self {
        Self::new(CacheConfig::from_env())
    }

    // Reads update access bookkeeping, so they take the write lock too.
    pub async fn get(&self, key: &str) -> Result<CacheValue> {
        let mut guard = self.inner.write().await;
        let state = &mut *guard;
        state.ops.get(&mut state.store, key)
    }

    pub async fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<CacheValue>,
        ttl: Duration,
    ) -> Result<()> {
        let mut guard = self.inner.write().await;
        let state = &mut *guard;
        state.ops.set(&mut state.store, key, value, ttl)
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let mut guard = self.inner.write().await;
        let state = &mut *guard;
        state.ops.delete(&mut state.store, key)
    }

    pub async fn exists(&self, key: &str) -> bool {
        let state = self.inner.read().await;
        state.ops.exists(&state.store, key)
    }

    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        let state = &mut *guard;
        state.ops.clear(&mut state.store);
    }

    pub async fn clean(&self) -> Vec<String> {
        let mut guard = self.inner.write().await;
        let state = &mut *guard;
        state.ops.clean(&mut state.store)
    }

    pub async fn compact(&self) -> Result<()> {
        let mut guard = self.inner.write().await;
        let state = &mut *guard;
        state.ops.compact(&mut state.store)
    }

    pub async fn keys(&self) -> Vec<String> {
        let state = self.inner.read().await;
        state.ops.get_keys(&state.store)
    }

    pub async fn keys_by_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        let state = self.inner.read().await;
        state.ops.get_keys_by_pattern(&state.store, pattern)
    }

    pub async fn set_callbacks(&self, callbacks: Callbacks) {
        self.inner.write().await.ops.set_callbacks(callbacks);
    }

    pub async fn set_config(&self, config: CacheConfig) {
        self.inner.write().await.ops.set_config(config);
    }

    pub async fn entry_report(&self, key: &str) -> Option<EntryReport> {
        let state = self.inner.read().await;
        state.ops.entry_report(&state.store, key)
    }

    /// Snapshot of the current counters.
    pub async fn metrics(&self) -> MetricsReport {
        let state = self.inner.read().await;
        MetricsReport::new(state.store.metrics())
    }

    /// Starts the expiry sweep every `cleanup_interval` seconds of the
    /// current configuration (at least one second).
    pub async fn spawn_cleanup(&self) -> JoinHandle<()> {
        let secs = self.inner.read().await.ops.config().cleanup_interval;
        spawn_cleanup_task(self.clone(), Duration::from_secs(secs.max(1)))
    }
}
