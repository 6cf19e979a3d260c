//! Report DTOs for cache metrics and entries

use serde::Serialize;

use crate::cache::{CacheEntry, CacheMetrics};

/// Point-in-time view of the cache counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    #[serde(flatten)]
    pub metrics: CacheMetrics,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Snapshot time in RFC 3339 format
    pub timestamp: String,
}

impl MetricsReport {
    /// Creates a new MetricsReport stamped with the current time
    pub fn new(metrics: &CacheMetrics) -> Self {
        Self {
            metrics: metrics.clone(),
            hit_rate: metrics.hit_rate(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Bookkeeping of a single entry, without its value.
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub key: String,
    pub size: u64,
    pub access_count: u64,
    pub compressed: bool,
    pub created_at: String,
    pub accessed_at: String,
    /// Expiry in RFC 3339 format, absent for entries that never expire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl From<&CacheEntry> for EntryReport {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            key: entry.key.clone(),
            size: entry.size,
            access_count: entry.access_count,
            compressed: entry.compressed,
            created_at: entry.created_at.to_rfc3339(),
            accessed_at: entry.accessed_at.to_rfc3339(),
            expires_at: entry.expires_at.map(|t| t.to_rfc3339()),
        }
    }
}
