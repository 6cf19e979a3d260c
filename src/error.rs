//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Key pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Compressor failed; never surfaced by the write path
    #[error("Compression failed: {0}")]
    Compression(String),

    /// Strict capacity is enabled and eviction could not make room
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::NotFound("k".to_string()).to_string(),
            "Key not found: k"
        );
        assert_eq!(
            CacheError::Expired("k".to_string()).to_string(),
            "Key expired: k"
        );
        assert!(CacheError::InvalidPattern("unclosed class".to_string())
            .to_string()
            .contains("unclosed class"));
    }
}
