//! Value compression
//!
//! Gzip compression for large values, backed by flate2.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression as FlateCompression;

use crate::config::CompressionType;
use crate::error::{CacheError, Result};

/// Values at or below this many bytes are never compressed.
pub const COMPRESSION_THRESHOLD: u64 = 1024;

/// Compresses and decompresses stored values.
#[derive(Debug, Clone, Copy)]
pub struct Compressor {
    kind: CompressionType,
    level: u32,
}

impl Compressor {
    pub fn new(kind: CompressionType, level: u32) -> Self {
        Self {
            kind,
            level: level.min(9),
        }
    }

    pub fn kind(&self) -> CompressionType {
        self.kind
    }

    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self.kind {
            CompressionType::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), FlateCompression::new(self.level));
                encoder
                    .write_all(data)
                    .map_err(|e| CacheError::Compression(e.to_string()))?;
                encoder
                    .finish()
                    .map_err(|e| CacheError::Compression(e.to_string()))
            }
        }
    }

    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self.kind {
            CompressionType::Gzip => {
                let mut decoder = GzDecoder::new(data);
                let mut result = Vec::new();
                decoder
                    .read_to_end(&mut result)
                    .map_err(|e| CacheError::Compression(e.to_string()))?;
                Ok(result)
            }
        }
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(CompressionType::Gzip, 6)
    }
}
