//! Cache Engine - An in-process key-value cache
//!
//! Size, entry-count and TTL bounded caching with LRU, LFU, FIFO and TTL
//! eviction, optional gzip compression of large values, and hit/miss/eviction
//! callbacks.
//!
//! The engine itself is unsynchronized: [`CacheOperations`] works on a
//! caller-owned [`CacheStore`]. [`SharedCache`] wraps both in a lock for
//! concurrent use.

pub mod cache;
pub mod compression;
pub mod config;
pub mod error;
pub mod models;
pub mod operations;
pub mod ops;
pub mod shared;
pub mod tasks;

pub use cache::{CacheEntry, CacheMetrics, CacheStore, CacheValue};
pub use compression::Compressor;
pub use config::{CacheConfig, CompressionType, EvictionPolicy};
pub use error::{CacheError, Result};
pub use operations::CacheOperations;
pub use ops::{Callbacks, EvictionReason};
pub use shared::{CacheState, SharedCache};
pub use tasks::spawn_cleanup_task;
