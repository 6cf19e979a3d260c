//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::shared::SharedCache;

/// Spawns a background task that periodically removes expired entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep holds the cache's write lock only while it
/// runs, and fires the eviction callback for every key it removes.
///
/// # Arguments
/// * `cache` - Shared handle to the cache
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = SharedCache::new(CacheConfig::default());
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.clean().await;

            if removed.is_empty() {
                debug!("TTL cleanup: no expired entries found");
            } else {
                info!("TTL cleanup: removed {} expired entries", removed.len());
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = SharedCache::new(CacheConfig::default());

        cache
            .set("expire_soon", "value", Duration::from_millis(50))
            .await
            .unwrap();

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(100));

        // Wait for entry to expire and cleanup to run
        tokio::time::sleep(Duration::from_millis(400)).await;

        {
            let state = cache.inner.read().await;
            assert!(
                !state.store.contains_key("expire_soon"),
                "Expired entry should have been swept"
            );
            assert_eq!(state.store.metrics().evictions, 1);
            assert_eq!(state.store.metrics().current_size, 0);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = SharedCache::new(CacheConfig::default());

        cache
            .set("long_lived", "value", Duration::from_secs(3600))
            .await
            .unwrap();

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        let result = cache.get("long_lived").await;
        assert!(result.is_ok(), "Valid entry should not be removed");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache = SharedCache::new(CacheConfig::default());

        let handle = spawn_cleanup_task(cache, Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
