//! Explode (decompression) implementation
//!
//! This module decodes PKWare DCL streams. The [`Exploder`] engine is driven
//! chunk by chunk and can stop at any bit position, so input may be split at
//! arbitrary byte boundaries. [`ExplodeReader`] wraps it behind `std::io::Read`.

mod ascii;
mod decoder;
mod engine;
mod reader;
mod state;

pub use ascii::{populate_ascii_table, AsciiTables, PatIterator};
pub use engine::{ExplodePhase, Exploder};
pub use reader::ExplodeReader;
pub use state::ExplodeState;

use crate::Result;

/// Input buffer size for streaming decompression (2048 bytes)
pub const IN_BUFF_SIZE: usize = 0x800;

/// Size of the 8-bit prefix lookup tables (256 entries)
pub const CODES_SIZE: usize = 0x100;

/// Size of offset arrays (256 bytes)
pub const OFFSS_SIZE: usize = 0x100;

/// Size of smaller offset arrays (128 bytes)
pub const OFFSS_SIZE1: usize = 0x80;

/// Size of ASCII character bits array (256 bytes)
pub const CH_BITS_ASC_SIZE: usize = 0x100;

/// Lookup table slot that no code starts with
pub(crate) const INVALID_CODE: u8 = 0xFF;

/// Convenience function to decompress data in memory
pub fn explode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut engine = Exploder::new();
    let mut output = engine.feed(data)?;
    output.extend(engine.finish()?);
    Ok(output)
}
