//! ASCII-mode literal decode tables
//!
//! ASCII literals use codes of 4 to 13 bits. Instead of walking the code bit by
//! bit, the decoder indexes direct lookup tables with the next 8 (or 7) bits.
//! Codes of up to 8 bits live in `ascii_table_2c34`; longer codes put a
//! sentinel there and are resolved from one of three secondary tables after
//! their common prefix has been consumed.
//!
//! Slots are enumerated with a prefix-allocation iterator: a code of length
//! `bits` owns every slot whose low `bits` bits equal the code, i.e. the seed
//! plus every multiple of `1 << bits` below the table size.

use super::{CH_BITS_ASC_SIZE, OFFSS_SIZE, OFFSS_SIZE1};
use crate::tables::{CH_BITS_ASC, CH_CODE_ASC};

/// Marks a `ascii_table_2c34` slot that continues in a secondary table
pub const ASCII_SECONDARY: u8 = 0xFF;

/// Prefix-allocation iterator: enumerates table slots sharing a code's low bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatIterator {
    limit: u32,
    step: u32,
}

impl PatIterator {
    /// Slots stop below `limit`; consecutive slots are `1 << step` apart
    pub fn new(limit: u32, step: u32) -> Self {
        Self { limit, step }
    }

    /// `[seed, seed + (1 << step)]`, or `None` once `seed` reaches the limit
    ///
    /// A next slot that would not fit in a `u32` is reported as `limit`.
    pub fn next_pair(&self, seed: u32) -> Option<[u32; 2]> {
        if seed >= self.limit {
            return None;
        }
        let next = 1u32
            .checked_shl(self.step)
            .and_then(|stride| seed.checked_add(stride))
            .unwrap_or(self.limit);
        Some([seed, next])
    }

    /// Every slot from `seed` upwards that lies below the limit
    pub fn slots(self, seed: u32) -> impl Iterator<Item = u32> {
        std::iter::successors(self.next_pair(seed), move |&[_, next]| {
            self.next_pair(next)
        })
        .map(|[slot, _]| slot)
    }
}

/// Slots below `limit` owned by `symbol`'s ASCII code shifted right by `base`
///
/// `bits` is the number of code bits left after the shift and must not be
/// zero. Shifting out every code bit leaves a seed of 0.
pub fn populate_ascii_table(bits: u8, symbol: usize, base: u32, limit: u32) -> Vec<u32> {
    debug_assert!(bits > 0, "zero-length code for symbol {symbol:#04X}");
    let seed = CH_CODE_ASC[symbol].checked_shr(base).unwrap_or(0) as u32;
    PatIterator::new(limit, bits as u32).slots(seed).collect()
}

/// The five derived tables used to decode ASCII literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiTables {
    /// Codes of up to 8 bits, indexed by the next 8 bits
    pub ascii_table_2c34: [u8; OFFSS_SIZE],
    /// Long codes with a non-zero low nibble pattern, after 4 bits
    pub ascii_table_2d34: [u8; OFFSS_SIZE],
    /// Long codes whose low 6 bits are zero, after 6 bits
    pub ascii_table_2e34: [u8; OFFSS_SIZE1],
    /// Long codes whose low 8 bits are zero, after 8 bits
    pub ascii_table_2eb4: [u8; OFFSS_SIZE],
    /// Bits still to consume once a table lookup resolved the byte
    pub ch_bits_asc: [u8; CH_BITS_ASC_SIZE],
}

impl AsciiTables {
    /// Build all tables from the static ASCII code table
    pub fn generate() -> Self {
        let mut tables = Self {
            ascii_table_2c34: [0; OFFSS_SIZE],
            ascii_table_2d34: [0; OFFSS_SIZE],
            ascii_table_2e34: [0; OFFSS_SIZE1],
            ascii_table_2eb4: [0; OFFSS_SIZE],
            ch_bits_asc: CH_BITS_ASC,
        };

        // Same order as PKLib's GenAscTabs; several long codes share a sentinel slot
        for symbol in (0..CH_BITS_ASC_SIZE).rev() {
            let code = CH_CODE_ASC[symbol];
            let bits = CH_BITS_ASC[symbol];
            let value = symbol as u8;

            if bits <= 8 {
                fill(
                    &mut tables.ascii_table_2c34,
                    populate_ascii_table(bits, symbol, 0, 0x100),
                    value,
                );
            } else if code & 0xFF != 0 {
                tables.ascii_table_2c34[(code & 0xFF) as usize] = ASCII_SECONDARY;

                if code & 0x3F != 0 {
                    let rest = bits - 4;
                    tables.ch_bits_asc[symbol] = rest;
                    fill(
                        &mut tables.ascii_table_2d34,
                        populate_ascii_table(rest, symbol, 4, 0x100),
                        value,
                    );
                } else {
                    let rest = bits - 6;
                    tables.ch_bits_asc[symbol] = rest;
                    fill(
                        &mut tables.ascii_table_2e34,
                        populate_ascii_table(rest, symbol, 6, 0x80),
                        value,
                    );
                }
            } else {
                let rest = bits - 8;
                tables.ch_bits_asc[symbol] = rest;
                fill(
                    &mut tables.ascii_table_2eb4,
                    populate_ascii_table(rest, symbol, 8, 0x100),
                    value,
                );
            }
        }

        tables
    }
}

fn fill(table: &mut [u8], slots: Vec<u32>, value: u8) {
    for slot in slots {
        table[slot as usize] = value;
    }
}
