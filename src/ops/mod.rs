//! Cache Operations
//!
//! The read, write, delete and cleanup paths. Each one is a set of free
//! functions over a caller-owned [`CacheStore`](crate::cache::CacheStore);
//! none of them locks anything.

pub mod cleanup;
pub mod delete;
pub mod get;
pub mod set;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

// == Eviction Reason ==
/// Why an entry left the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionReason {
    /// Freed to respect `max_size`
    Size,
    /// Freed to respect `max_entries`
    Capacity,
    /// Removed by an explicit delete
    Manual,
    /// Removed by an expiry sweep
    Ttl,
}

impl fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            EvictionReason::Size => "size",
            EvictionReason::Capacity => "capacity",
            EvictionReason::Manual => "manual",
            EvictionReason::Ttl => "ttl",
        };
        f.write_str(reason)
    }
}

pub type KeyCallback = Arc<dyn Fn(&str) + Send + Sync>;
pub type EvictionCallback = Arc<dyn Fn(&str, EvictionReason) + Send + Sync>;

// == Callbacks ==
/// Observers invoked inline with the operation that triggers them.
#[derive(Clone, Default)]
pub struct Callbacks {
    on_hit: Option<KeyCallback>,
    on_miss: Option<KeyCallback>,
    on_eviction: Option<EvictionCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_hit(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_hit = Some(Arc::new(f));
        self
    }

    pub fn on_miss(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_miss = Some(Arc::new(f));
        self
    }

    pub fn on_eviction(mut self, f: impl Fn(&str, EvictionReason) + Send + Sync + 'static) -> Self {
        self.on_eviction = Some(Arc::new(f));
        self
    }

    pub(crate) fn hit(&self, key: &str) {
        if let Some(f) = &self.on_hit {
            f(key);
        }
    }

    pub(crate) fn miss(&self, key: &str) {
        if let Some(f) = &self.on_miss {
            f(key);
        }
    }

    pub(crate) fn evicted(&self, key: &str, reason: EvictionReason) {
        if let Some(f) = &self.on_eviction {
            f(key, reason);
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_hit", &self.on_hit.is_some())
            .field("on_miss", &self.on_miss.is_some())
            .field("on_eviction", &self.on_eviction.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_empty_callbacks_are_noops() {
        let callbacks = Callbacks::new();
        callbacks.hit("k");
        callbacks.miss("k");
        callbacks.evicted("k", EvictionReason::Manual);
    }

    #[test]
    fn test_callbacks_receive_key_and_reason() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callbacks = Callbacks::new().on_eviction(move |key, reason| {
            sink.lock().unwrap().push(format!("{}:{}", key, reason));
        });

        callbacks.evicted("a", EvictionReason::Size);
        callbacks.evicted("b", EvictionReason::Ttl);

        assert_eq!(*seen.lock().unwrap(), vec!["a:size", "b:ttl"]);
    }
}
