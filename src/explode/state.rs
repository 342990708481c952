//! Decompression state
//!
//! Everything an explode stream needs once its header is known: the decode
//! tables (built once, read-only afterwards) and the sliding window.

use super::ascii::AsciiTables;
use super::{CODES_SIZE, INVALID_CODE};
use crate::header::CompressionHeader;
use crate::tables::{DIST_BITS, DIST_CODE, LEN_BITS, LEN_CODE};
use crate::window::SlidingWindow;
use crate::CompressionMode;

/// Per-stream decode tables and history
#[derive(Debug)]
pub struct ExplodeState {
    /// Parsed stream header
    pub header: CompressionHeader,
    /// Number of low distance bits for repetitions longer than 2 (4, 5 or 6)
    pub dsize_bits: u32,
    /// Length code index for each 8-bit prefix
    pub length_codes: [u8; CODES_SIZE],
    /// Distance bucket index for each 8-bit prefix
    pub dist_pos_codes: [u8; CODES_SIZE],
    /// Literal lookup tables, ASCII mode only
    pub ascii: Option<Box<AsciiTables>>,
    /// Decompressed history for back-references
    pub window: SlidingWindow,
}

impl ExplodeState {
    /// Build all tables for a stream with the given header
    pub fn new(header: CompressionHeader) -> Self {
        let mut length_codes = [INVALID_CODE; CODES_SIZE];
        let mut dist_pos_codes = [INVALID_CODE; CODES_SIZE];
        gen_decode_tabs(&mut length_codes, &LEN_CODE, &LEN_BITS);
        gen_decode_tabs(&mut dist_pos_codes, &DIST_CODE, &DIST_BITS);

        let ascii = match header.mode {
            CompressionMode::ASCII => Some(Box::new(AsciiTables::generate())),
            CompressionMode::Binary => None,
        };

        Self {
            header,
            dsize_bits: header.dict_size.bits() as u32,
            length_codes,
            dist_pos_codes,
            ascii,
            window: SlidingWindow::new(header.dict_size.bytes()),
        }
    }
}

/// Fill `positions` so that every 8-bit prefix maps to the code it starts with
fn gen_decode_tabs(positions: &mut [u8; CODES_SIZE], start_indexes: &[u8], length_bits: &[u8]) {
    for (i, (&start, &bits)) in start_indexes.iter().zip(length_bits).enumerate() {
        let step = 1usize << bits;
        for index in (start as usize..CODES_SIZE).step_by(step) {
            positions[index] = i as u8;
        }
    }
}
