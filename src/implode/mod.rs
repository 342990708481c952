//! Implode (compression) implementation
//!
//! This module produces PKWare DCL streams. [`Imploder`] is the chunk-driven
//! engine; [`ImplodeWriter`] wraps it behind `std::io::Write`.

mod engine;
mod hash;
mod pattern;
mod state;
mod writer;

pub use engine::Imploder;
pub use hash::MatchFinder;
pub use pattern::{find_repetition, MatchResult, MAX_CHAIN_LENGTH};
pub use state::ImplodeState;
pub use writer::ImplodeWriter;

use crate::{CompressionMode, DictionarySize, Result};

/// Hash table size for pattern matching (2304 entries)
pub const HASH_TABLE_SIZE: usize = 0x900;

/// PKLib hash function for byte pairs
/// Formula: (byte0 * 4) + (byte1 * 5)
pub const fn byte_pair_hash(buffer: &[u8]) -> usize {
    ((buffer[0] as usize) * 4) + ((buffer[1] as usize) * 5)
}

/// Convenience function to compress data in memory
pub fn implode_bytes(
    data: &[u8],
    mode: CompressionMode,
    dict_size: DictionarySize,
) -> Result<Vec<u8>> {
    let mut engine = Imploder::new(mode, dict_size);
    let mut output = engine.feed(data)?;
    output.extend(engine.finish()?);
    Ok(output)
}
