//! Cache Entry Module
//!
//! Defines stored values and the bookkeeping kept alongside each of them.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Size assumed for values whose encoding fails.
pub const DEFAULT_SIZE_ESTIMATE: u64 = 64;

/// Size assumed for scalar numerics.
const NUMERIC_SIZE: u64 = 8;

/// Metadata key holding the pre-compression byte length.
pub const META_ORIGINAL_SIZE: &str = "original_size";

/// Metadata key holding the compression algorithm tag.
pub const META_COMPRESSION_TYPE: &str = "compression_type";

// == Cache Value ==
/// A value as handed to the cache by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheValue {
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Json(serde_json::Value),
}

impl CacheValue {
    // == Estimate Size ==
    /// Estimates how many bytes this value occupies.
    pub fn estimate_size(&self) -> u64 {
        match self {
            CacheValue::Text(s) => s.len() as u64,
            CacheValue::Bytes(b) => b.len() as u64,
            CacheValue::Int(_) | CacheValue::Float(_) => NUMERIC_SIZE,
            CacheValue::Bool(_) => 1,
            CacheValue::Json(v) => serde_json::to_vec(v)
                .map(|encoded| encoded.len() as u64)
                .unwrap_or(DEFAULT_SIZE_ESTIMATE),
        }
    }

    // == To Bytes ==
    /// Byte representation fed to the compressor.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            CacheValue::Bytes(b) => Ok(b.clone()),
            CacheValue::Text(s) => Ok(s.as_bytes().to_vec()),
            other => serde_json::to_vec(other),
        }
    }

    /// Returns the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CacheValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the byte payload, if any.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            CacheValue::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        CacheValue::Text(value)
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        CacheValue::Text(value.to_string())
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(value: Vec<u8>) -> Self {
        CacheValue::Bytes(value)
    }
}

impl From<&[u8]> for CacheValue {
    fn from(value: &[u8]) -> Self {
        CacheValue::Bytes(value.to_vec())
    }
}

impl From<i64> for CacheValue {
    fn from(value: i64) -> Self {
        CacheValue::Int(value)
    }
}

impl From<i32> for CacheValue {
    fn from(value: i32) -> Self {
        CacheValue::Int(value.into())
    }
}

impl From<f64> for CacheValue {
    fn from(value: f64) -> Self {
        CacheValue::Float(value)
    }
}

impl From<bool> for CacheValue {
    fn from(value: bool) -> Self {
        CacheValue::Bool(value)
    }
}

impl From<serde_json::Value> for CacheValue {
    fn from(value: serde_json::Value) -> Self {
        CacheValue::Json(value)
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Key the entry is stored under
    pub key: String,
    /// The stored value, possibly replaced by its compressed bytes
    pub value: CacheValue,
    /// Byte length of whatever `value` currently holds
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub accessed_at: DateTime<Utc>,
    /// Requested TTL, zero when none was requested
    pub ttl: Duration,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
    /// Successful reads so far
    pub access_count: u64,
    /// True when `value` holds compressed bytes
    pub compressed: bool,
    /// Compression provenance and other annotations
    pub metadata: HashMap<String, serde_json::Value>,
    // Logical clock values used to order entries sharing a timestamp.
    pub(crate) insert_tick: u64,
    pub(crate) access_tick: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    ///
    /// # Arguments
    /// * `key` - The key the entry is stored under
    /// * `value` - The value to store
    /// * `ttl` - TTL to apply, `Duration::ZERO` for none
    pub fn new(key: impl Into<String>, value: CacheValue, ttl: Duration) -> Self {
        let now = Utc::now();
        // A TTL too large to represent is treated as no expiry.
        let expires_at = if ttl.is_zero() {
            None
        } else {
            chrono::Duration::from_std(ttl)
                .ok()
                .and_then(|delta| now.checked_add_signed(delta))
        };
        let size = value.estimate_size();

        Self {
            key: key.into(),
            value,
            size,
            created_at: now,
            updated_at: now,
            accessed_at: now,
            ttl,
            expires_at,
            access_count: 0,
            compressed: false,
            metadata: HashMap::new(),
            insert_tick: 0,
            access_tick: 0,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a fixed instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => expires <= now,
            None => false,
        }
    }

    // == Touch ==
    /// Records a successful read.
    pub(crate) fn touch(&mut self, tick: u64) {
        self.accessed_at = Utc::now();
        self.access_count += 1;
        self.access_tick = tick;
    }

    // == Time To Live ==
    /// Returns remaining TTL, or None if no expiration is set.
    ///
    /// Expired entries report `Duration::ZERO`.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| (expires - Utc::now()).to_std().unwrap_or(Duration::ZERO))
    }

    /// Pre-compression byte length, when the entry was compressed.
    pub fn original_size(&self) -> Option<u64> {
        self.metadata.get(META_ORIGINAL_SIZE).and_then(|v| v.as_u64())
    }
}
