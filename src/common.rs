//! Common types and constants for the PKWare Data Compression Library format
//!
//! This module defines the core types, constants, and structures used by both
//! the compression (implode) and decompression (explode) engines.

use crate::error::{DclError, Result};

/// Compression mode for the PKWare DCL format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMode {
    /// Binary mode - every literal is a fixed 8-bit value
    Binary = 0,
    /// ASCII mode - literals use a text-tuned variable-length code
    ASCII = 1,
}

impl CompressionMode {
    /// Create a CompressionMode from the header byte
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(CompressionMode::Binary),
            1 => Ok(CompressionMode::ASCII),
            _ => Err(DclError::InvalidCompressionType(value)),
        }
    }
}

/// Dictionary size for compression/decompression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictionarySize {
    /// 1024 bytes (1KB) dictionary
    Size1K = 1024,
    /// 2048 bytes (2KB) dictionary
    Size2K = 2048,
    /// 4096 bytes (4KB) dictionary
    Size4K = 4096,
}

impl DictionarySize {
    /// Number of low distance bits stored after the distance code
    pub fn bits(&self) -> u8 {
        match self {
            DictionarySize::Size1K => 4, // 2^10 = 1024, needs 10 bits, 10-6=4
            DictionarySize::Size2K => 5, // 2^11 = 2048, needs 11 bits, 11-6=5
            DictionarySize::Size4K => 6, // 2^12 = 4096, needs 12 bits, 12-6=6
        }
    }

    /// Bit mask for the low distance bits
    pub fn mask(&self) -> u32 {
        (1u32 << self.bits()) - 1
    }

    /// Window size in bytes
    pub fn bytes(&self) -> usize {
        *self as usize
    }

    /// Create a DictionarySize from the header byte
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            4 => Ok(DictionarySize::Size1K),
            5 => Ok(DictionarySize::Size2K),
            6 => Ok(DictionarySize::Size4K),
            _ => Err(DclError::InvalidDictionarySize(bits)),
        }
    }

    /// Create a DictionarySize from a compression level (1 = 1KB .. 3 = 4KB)
    pub fn from_level(level: u8) -> Result<Self> {
        match level {
            1 => Ok(DictionarySize::Size1K),
            2 => Ok(DictionarySize::Size2K),
            3 => Ok(DictionarySize::Size4K),
            _ => Err(DclError::InvalidLevel(level)),
        }
    }
}

/// Shortest repetition the format can express
pub const MIN_REP_LENGTH: usize = 2;

/// Longest repetition the format can express (length symbols 0x100..=0x304)
pub const MAX_REP_LENGTH: usize = 0x206; // 518 bytes

/// Longest backward distance allowed for a 2-byte repetition
pub const MAX_SHORT_REP_DISTANCE: usize = 0x100;

/// Number of bytes the stream header occupies
pub const HEADER_SIZE: usize = 2;

/// Bytes required before a stream header is accepted
pub const MIN_STREAM_SIZE: usize = 4;

/// Statistics for compression/decompression operations
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompressionStats {
    /// Number of literal bytes encoded/decoded
    pub literal_count: usize,
    /// Number of repetitions encoded/decoded
    pub match_count: usize,
    /// Longest repetition seen
    pub longest_match: usize,
    /// Bytes fed into the engine
    pub input_bytes: u64,
    /// Bytes produced by the engine
    pub output_bytes: u64,
}

impl CompressionStats {
    /// Size of the output relative to the input, 0.0 when nothing was fed
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }

    pub(crate) fn record_match(&mut self, length: usize) {
        self.match_count += 1;
        self.longest_match = self.longest_match.max(length);
    }
}

/// A chunk-driven transform over a single DCL stream
///
/// `feed` may be called any number of times with arbitrarily split input and
/// returns whatever output became available. `finish` signals end of input and
/// returns the remaining output. Splitting the input differently never changes
/// the concatenated output.
pub trait ChunkCodec {
    /// Process a chunk of input and return the output it completed
    fn feed(&mut self, chunk: &[u8]) -> Result<Vec<u8>>;

    /// Signal end of input and return the final output
    fn finish(&mut self) -> Result<Vec<u8>>;

    /// Running statistics for this stream
    fn stats(&self) -> &CompressionStats;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_mode() {
        assert_eq!(
            CompressionMode::from_u8(0).unwrap(),
            CompressionMode::Binary
        );
        assert_eq!(CompressionMode::from_u8(1).unwrap(), CompressionMode::ASCII);
        assert!(matches!(
            CompressionMode::from_u8(2),
            Err(DclError::InvalidCompressionType(2))
        ));
    }

    #[test]
    fn test_dictionary_size() {
        assert_eq!(DictionarySize::Size1K.bits(), 4);
        assert_eq!(DictionarySize::Size2K.bits(), 5);
        assert_eq!(DictionarySize::Size4K.bits(), 6);

        assert_eq!(DictionarySize::Size1K.mask(), 0x0F);
        assert_eq!(DictionarySize::Size2K.mask(), 0x1F);
        assert_eq!(DictionarySize::Size4K.mask(), 0x3F);

        assert_eq!(DictionarySize::Size2K.bytes(), 2048);

        assert_eq!(
            DictionarySize::from_bits(4).unwrap(),
            DictionarySize::Size1K
        );
        assert_eq!(
            DictionarySize::from_bits(6).unwrap(),
            DictionarySize::Size4K
        );
        assert!(matches!(
            DictionarySize::from_bits(7),
            Err(DclError::InvalidDictionarySize(7))
        ));
    }

    #[test]
    fn test_levels() {
        assert_eq!(
            DictionarySize::from_level(1).unwrap(),
            DictionarySize::Size1K
        );
        assert_eq!(
            DictionarySize::from_level(2).unwrap(),
            DictionarySize::Size2K
        );
        assert_eq!(
            DictionarySize::from_level(3).unwrap(),
            DictionarySize::Size4K
        );
        assert!(DictionarySize::from_level(0).is_err());
        assert!(DictionarySize::from_level(4).is_err());
    }

    #[test]
    fn test_constants() {
        assert_eq!(MAX_REP_LENGTH, 518);
        assert_eq!(MAX_REP_LENGTH + 0xFE, 0x304);
        assert_eq!(MAX_SHORT_REP_DISTANCE, 256);
    }

    #[test]
    fn test_stats_ratio() {
        let mut stats = CompressionStats::default();
        assert_eq!(stats.ratio(), 0.0);
        stats.input_bytes = 200;
        stats.output_bytes = 50;
        assert_eq!(stats.ratio(), 0.25);

        stats.record_match(7);
        stats.record_match(3);
        assert_eq!(stats.match_count, 2);
        assert_eq!(stats.longest_match, 7);
    }
}
