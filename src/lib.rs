//! pkdcl - PKWare Data Compression Library streams in Rust
//!
//! This crate implements the PKWare DCL "implode" format (1980s DOS era) and
//! its decompressor, "explode". The format combines a sliding dictionary of
//! 1, 2 or 4 KB with static prefix codes and is found in game archives and
//! other legacy containers.
//!
//! # Features
//!
//! - Decompression (explode) and compression (implode)
//! - Binary and ASCII compression modes
//! - Dictionary sizes: 1KB, 2KB, and 4KB
//! - Repetitions of 2 to 518 bytes
//! - Chunk-driven engines that accept input split at any byte boundary
//! - Streaming API via Read/Write traits, and tokio drivers behind `async`
//!
//! # Example - Decompression
//!
//! ```no_run
//! use pkdcl::{explode_bytes, ExplodeReader};
//! use std::io::Read;
//!
//! let compressed_data = std::fs::read("data.imploded")?;
//! let decompressed = explode_bytes(&compressed_data)?;
//!
//! // Or use streaming API
//! let mut reader = ExplodeReader::new(std::io::Cursor::new(compressed_data))?;
//! let mut output = Vec::new();
//! reader.read_to_end(&mut output)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example - Compression
//!
//! ```
//! use pkdcl::{CompressionMode, DictionarySize, implode_bytes, ImplodeWriter};
//! use std::io::Write;
//!
//! let data = b"Hello, World! This is a test.";
//! let compressed = implode_bytes(data, CompressionMode::ASCII, DictionarySize::Size2K)?;
//!
//! // Or use streaming API
//! let mut writer =
//!     ImplodeWriter::new(Vec::new(), CompressionMode::ASCII, DictionarySize::Size2K)?;
//! writer.write_all(data)?;
//! let output = writer.finish()?;
//! assert_eq!(output, compressed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example - Chunked engines
//!
//! ```
//! use pkdcl::{ChunkCodec, CompressionMode, DictionarySize, Exploder, Imploder};
//!
//! let mut imploder = Imploder::new(CompressionMode::Binary, DictionarySize::Size4K);
//! let mut compressed = Vec::new();
//! for chunk in b"abcabcabcabc".chunks(5) {
//!     compressed.extend(imploder.feed(chunk)?);
//! }
//! compressed.extend(imploder.finish()?);
//!
//! let mut exploder = Exploder::new();
//! let mut restored = exploder.feed(&compressed)?;
//! restored.extend(exploder.finish()?);
//! assert_eq!(restored, b"abcabcabcabc");
//! # Ok::<(), pkdcl::DclError>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod bits;
pub mod common;
pub mod error;
pub mod explode;
pub mod header;
pub mod implode;
pub mod tables;
pub mod window;

// Async drivers (only available with async feature)
#[cfg(feature = "async")]
pub mod async_stream;

// Re-export commonly used types
pub use common::{
    ChunkCodec, CompressionMode, CompressionStats, DictionarySize, MAX_REP_LENGTH, MIN_REP_LENGTH,
    MAX_SHORT_REP_DISTANCE,
};
pub use error::{DclError, Result};
pub use explode::{ExplodeReader, Exploder};
pub use header::CompressionHeader;
pub use implode::{ImplodeWriter, Imploder};

#[cfg(feature = "async")]
pub use async_stream::{explode_async, implode_async, StreamOptions};

// Convenience functions

/// Compress data using the PKWare implode algorithm
///
/// # Arguments
/// * `data` - The data to compress
/// * `mode` - Compression mode (Binary or ASCII)
/// * `dict_size` - Dictionary size (1KB, 2KB, or 4KB)
///
/// # Returns
/// A vector containing the compressed data
pub fn implode_bytes(
    data: &[u8],
    mode: CompressionMode,
    dict_size: DictionarySize,
) -> Result<Vec<u8>> {
    implode::implode_bytes(data, mode, dict_size)
}

/// Decompress data using the PKWare explode algorithm
///
/// # Arguments
/// * `data` - The compressed data
///
/// # Returns
/// A vector containing the decompressed data
pub fn explode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    explode::explode_bytes(data)
}
