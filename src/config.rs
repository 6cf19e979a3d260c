//! Configuration Module
//!
//! Policy parameters for the cache engine, loadable from environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Eviction ratio used when the configured one falls outside (0, 1].
pub const DEFAULT_EVICTION_RATIO: f64 = 0.1;

// == Eviction Policy ==
/// Order in which entries are sacrificed when a capacity limit is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum EvictionPolicy {
    /// Least recently accessed first
    #[default]
    Lru,
    /// Least frequently accessed first
    Lfu,
    /// Oldest insertion first
    Fifo,
    /// Soonest expiry first, non-expiring entries last
    Ttl,
}

impl From<&str> for EvictionPolicy {
    /// Parses a policy tag. Unknown tags fall back to LRU.
    fn from(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "lfu" => EvictionPolicy::Lfu,
            "fifo" => EvictionPolicy::Fifo,
            "ttl" => EvictionPolicy::Ttl,
            _ => EvictionPolicy::Lru,
        }
    }
}

impl From<String> for EvictionPolicy {
    fn from(tag: String) -> Self {
        EvictionPolicy::from(tag.as_str())
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Lfu => "lfu",
            EvictionPolicy::Fifo => "fifo",
            EvictionPolicy::Ttl => "ttl",
        };
        f.write_str(tag)
    }
}

// == Compression Type ==
/// Supported compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionType {
    #[default]
    Gzip,
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionType::Gzip => f.write_str("gzip"),
        }
    }
}

/// Cache policy parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// A zero `max_size` or `max_entries` means that limit is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum total size of stored values in bytes
    pub max_size: u64,
    /// Maximum number of entries
    pub max_entries: usize,
    /// Eviction order once a limit is hit
    pub eviction_policy: EvictionPolicy,
    /// Fraction of capacity to free once eviction triggers
    pub eviction_ratio: f64,
    /// TTL applied to writes that do not request one (zero = never expire)
    pub default_ttl: Duration,
    /// Compress values larger than 1 KiB
    pub enable_compression: bool,
    /// Compression algorithm
    pub compression_type: CompressionType,
    /// Compression level (0-9)
    pub compression_level: u32,
    /// Background cleanup frequency in seconds
    pub cleanup_interval: u64,
    /// Reject writes that cannot fit after eviction instead of accepting them
    pub strict_capacity: bool,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum total bytes (default: 0, unbounded)
    /// - `CACHE_MAX_ENTRIES` - Maximum entries (default: 1000)
    /// - `CACHE_EVICTION_POLICY` - `lru`, `lfu`, `fifo` or `ttl` (default: lru)
    /// - `CACHE_EVICTION_RATIO` - Fraction of capacity to free (default: 0.1)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 0, never expire)
    /// - `CACHE_ENABLE_COMPRESSION` - `true`/`false` (default: false)
    /// - `CACHE_COMPRESSION_LEVEL` - 0-9 (default: 6)
    /// - `CACHE_CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_size: parse_env("CACHE_MAX_SIZE").unwrap_or(defaults.max_size),
            max_entries: parse_env("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            eviction_policy: env::var("CACHE_EVICTION_POLICY")
                .map(EvictionPolicy::from)
                .unwrap_or(defaults.eviction_policy),
            eviction_ratio: parse_env("CACHE_EVICTION_RATIO").unwrap_or(defaults.eviction_ratio),
            default_ttl: parse_env("CACHE_DEFAULT_TTL")
                .map(Duration::from_secs)
                .unwrap_or(defaults.default_ttl),
            enable_compression: parse_env("CACHE_ENABLE_COMPRESSION")
                .unwrap_or(defaults.enable_compression),
            compression_type: defaults.compression_type,
            compression_level: parse_env("CACHE_COMPRESSION_LEVEL")
                .unwrap_or(defaults.compression_level),
            cleanup_interval: parse_env("CACHE_CLEANUP_INTERVAL")
                .unwrap_or(defaults.cleanup_interval),
            strict_capacity: defaults.strict_capacity,
        }
    }

    /// Returns the eviction ratio clamped into (0, 1].
    pub fn effective_eviction_ratio(&self) -> f64 {
        if self.eviction_ratio > 1.0 {
            1.0
        } else if self.eviction_ratio > 0.0 {
            self.eviction_ratio
        } else {
            DEFAULT_EVICTION_RATIO
        }
    }

    /// Size eviction stops once `current + incoming` fits under this.
    pub fn target_size(&self) -> u64 {
        scaled_floor(self.max_size, self.effective_eviction_ratio())
    }

    /// Count eviction stops once the entry count is at or below this.
    pub fn target_entries(&self) -> usize {
        scaled_floor(self.max_entries as u64, self.effective_eviction_ratio()) as usize
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 0,
            max_entries: 1000,
            eviction_policy: EvictionPolicy::Lru,
            eviction_ratio: DEFAULT_EVICTION_RATIO,
            default_ttl: Duration::ZERO,
            enable_compression: false,
            compression_type: CompressionType::Gzip,
            compression_level: 6,
            cleanup_interval: 60,
            strict_capacity: false,
        }
    }
}

// Epsilon absorbs float noise such as 50 * 0.6 landing just under 30. The
// target always sits below the limit so that eviction frees at least one unit.
fn scaled_floor(limit: u64, ratio: f64) -> u64 {
    if limit == 0 {
        return 0;
    }
    let scaled = (limit as f64 * (1.0 - ratio) + 1e-9).floor().max(0.0) as u64;
    scaled.min(limit - 1)
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
