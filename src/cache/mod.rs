//! Cache Module
//!
//! Entries, the caller-owned entry store, metrics and eviction ordering.

mod entry;
mod metrics;
mod policy;
mod store;


// Re-export public types
pub use entry::{
    CacheEntry, CacheValue, DEFAULT_SIZE_ESTIMATE, META_COMPRESSION_TYPE, META_ORIGINAL_SIZE,
};
pub use metrics::CacheMetrics;
pub use store::CacheStore;
