//! Write path: size estimation, eviction pre-check, TTL resolution and
//! optional compression.

use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{
    CacheEntry, CacheStore, CacheValue, META_COMPRESSION_TYPE, META_ORIGINAL_SIZE,
};
use crate::compression::{Compressor, COMPRESSION_THRESHOLD};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::ops::{Callbacks, EvictionReason};

// == Set ==
/// Stores a value under `key`.
///
/// An existing entry under the same key is replaced silently and its size
/// released before any capacity check. Limits are soft unless
/// `strict_capacity` is enabled: a write that still does not fit after
/// eviction is stored anyway and a warning is logged. In strict mode a write
/// that could never fit is rejected before anything is evicted.
///
/// # Arguments
/// * `key` - The key to store
/// * `value` - The value to store
/// * `ttl` - Requested TTL, `Duration::ZERO` to fall back to the default TTL
pub fn set(
    store: &mut CacheStore,
    config: &CacheConfig,
    callbacks: &Callbacks,
    key: String,
    value: CacheValue,
    ttl: Duration,
) -> Result<()> {
    let replaced = store.remove(&key);
    if let Some(old) = &replaced {
        let remaining = store.len();
        store.metrics.release(old.size, remaining);
    }

    let incoming = value.estimate_size();
    let ttl = if ttl.is_zero() { config.default_ttl } else { ttl };
    let mut entry = CacheEntry::new(key, value, ttl);

    if config.enable_compression && entry.size > COMPRESSION_THRESHOLD {
        let compressor = Compressor::new(config.compression_type, config.compression_level);
        compress_entry(&mut entry, &compressor);
    }

    if config.strict_capacity {
        if let Some(reason) = unreachable_limit(store, config, entry.size, replaced.is_some()) {
            if let Some(old) = replaced {
                restore(store, old);
            }
            return Err(CacheError::CapacityExceeded(format!(
                "cannot store '{}' ({} bytes): {}",
                entry.key, entry.size, reason
            )));
        }
    }

    evict_for_size(store, config, callbacks, incoming);
    if replaced.is_none() {
        evict_for_count(store, config, callbacks);
    }

    if let Some(reason) = over_limit(store, config, entry.size) {
        warn!(key = %entry.key, size = entry.size, "{}; storing anyway", reason);
    }

    let size = entry.size;
    store.insert(entry);
    let len = store.len();
    store.metrics.record_set(size, len);
    Ok(())
}

// == Evict For Size ==
/// Frees room once `current_size + incoming` would exceed `max_size`,
/// stopping as soon as it fits under the eviction target.
fn evict_for_size(
    store: &mut CacheStore,
    config: &CacheConfig,
    callbacks: &Callbacks,
    incoming: u64,
) {
    if config.max_size == 0 || store.metrics.current_size + incoming <= config.max_size {
        return;
    }

    let target = config.target_size();
    for key in config.eviction_policy.eviction_order(store) {
        if store.metrics.current_size + incoming <= target {
            break;
        }
        evict(store, callbacks, &key, EvictionReason::Size);
    }
}

// == Evict For Count ==
/// Frees entries once the count has reached `max_entries`, stopping at the
/// eviction target.
fn evict_for_count(store: &mut CacheStore, config: &CacheConfig, callbacks: &Callbacks) {
    if config.max_entries == 0 || store.metrics.current_entries < config.max_entries {
        return;
    }

    let target = config.target_entries();
    for key in config.eviction_policy.eviction_order(store) {
        if store.metrics.current_entries <= target {
            break;
        }
        evict(store, callbacks, &key, EvictionReason::Capacity);
    }
}

fn evict(store: &mut CacheStore, callbacks: &Callbacks, key: &str, reason: EvictionReason) {
    if let Some(entry) = store.remove(key) {
        let remaining = store.len();
        store.metrics.record_eviction(entry.size, remaining);
        debug!(key, size = entry.size, %reason, "evicted entry");
        callbacks.evicted(key, reason);
    }
}

/// Describes the limit a write of `size` bytes would still break, if any.
fn over_limit(store: &CacheStore, config: &CacheConfig, size: u64) -> Option<String> {
    if config.max_size > 0 && store.metrics.current_size + size > config.max_size {
        return Some(format!("max_size of {} bytes exceeded", config.max_size));
    }
    if config.max_entries > 0 && store.metrics.current_entries >= config.max_entries {
        return Some(format!("max_entries of {} reached", config.max_entries));
    }
    None
}

/// Describes the limit a write of `size` bytes would break even after every
/// other entry had been evicted. Overwrites never trigger count eviction, so
/// for them the current count has to be under the limit already.
fn unreachable_limit(
    store: &CacheStore,
    config: &CacheConfig,
    size: u64,
    overwrite: bool,
) -> Option<String> {
    if config.max_size > 0 && size > config.max_size {
        return Some(format!("max_size of {} bytes exceeded", config.max_size));
    }
    if overwrite && config.max_entries > 0 && store.metrics.current_entries >= config.max_entries {
        return Some(format!("max_entries of {} reached", config.max_entries));
    }
    None
}

fn restore(store: &mut CacheStore, old: CacheEntry) {
    let size = old.size;
    store.entries.insert(old.key.clone(), old);
    store.metrics.current_size += size;
    store.metrics.current_entries = store.len();
}

// == Compress Entry ==
/// Replaces the entry's value with its compressed bytes when that shrinks it.
///
/// Failures leave the entry untouched.
fn compress_entry(entry: &mut CacheEntry, compressor: &Compressor) {
    let raw = match entry.value.to_bytes() {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key = %entry.key, error = %e, "could not encode value for compression");
            return;
        }
    };

    let compressed = match compressor.compress(&raw) {
        Ok(compressed) => compressed,
        Err(e) => {
            warn!(key = %entry.key, error = %e, "compression failed, storing uncompressed");
            return;
        }
    };

    if compressed.len() >= raw.len() {
        debug!(key = %entry.key, "compression did not shrink value");
        return;
    }

    debug!(
        key = %entry.key,
        original = entry.size,
        compressed = compressed.len(),
        "compressed value"
    );
    entry
        .metadata
        .insert(META_ORIGINAL_SIZE.to_string(), entry.size.into());
    entry.metadata.insert(
        META_COMPRESSION_TYPE.to_string(),
        compressor.kind().to_string().into(),
    );
    entry.size = compressed.len() as u64;
    entry.value = CacheValue::Bytes(compressed);
    entry.compressed = true;
}
