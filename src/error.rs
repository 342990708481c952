//! Error handling for DCL operations
//!
//! This module defines the error type used throughout the crate. It uses
//! thiserror for ergonomic error handling; every variant is a permanent
//! failure of the stream it was raised for.

use thiserror::Error;

/// Error type for DCL operations
#[derive(Debug, Error)]
pub enum DclError {
    /// Not enough bytes to hold a stream header
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Header byte 0 is neither binary (0) nor ASCII (1)
    #[error("Invalid compression type: {0} (expected 0 or 1)")]
    InvalidCompressionType(u8),

    /// Header byte 1 is not 4, 5 or 6
    #[error("Invalid dictionary size bits: {0} (expected 4, 5, or 6)")]
    InvalidDictionarySize(u8),

    /// Compression level outside 1..=3
    #[error("Invalid compression level: {0} (expected 1, 2, or 3)")]
    InvalidLevel(u8),

    /// Input ended before the end-of-stream symbol was decoded
    #[error("Compressed stream is truncated: end-of-stream marker not found")]
    TruncatedStream,

    /// A prefix code that maps to no symbol of the given table
    #[error("Malformed {table} code: 0x{bits:02X}")]
    MalformedSymbol {
        /// Which code table was being decoded
        table: &'static str,
        /// The bits that failed to decode
        bits: u32,
    },

    /// A back-reference pointing before the start of the produced data
    #[error("Back-reference distance {distance} exceeds available history {available}")]
    DistanceTooFar {
        /// Decoded distance
        distance: usize,
        /// Bytes that can be referenced
        available: usize,
    },

    /// The engine already finished or failed and accepts no more work
    #[error("Codec engine is closed")]
    EngineClosed,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DclError> for std::io::Error {
    fn from(err: DclError) -> Self {
        match err {
            DclError::Io(e) => e,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}

/// Result type alias for DCL operations
pub type Result<T> = std::result::Result<T, DclError>;
