//! Compression code tables
//!
//! Builds the encode side of the static code tables: one table for the
//! combined literal/length alphabet and one for distance buckets.

use crate::bits::{BitWriter, CodeEntry, CodeTable};
use crate::header::CompressionHeader;
use crate::tables::{
    CH_BITS_ASC, CH_CODE_ASC, DIST_BITS, DIST_CODE, EX_LEN_BITS, LEN_BITS, LEN_CODE,
    LENGTH_SYMBOL_BASE, LITERALS_COUNT, LITERAL_END_OF_STREAM,
};
use crate::{CompressionMode, MIN_REP_LENGTH};

/// Length symbols start at 0x100 for a repetition of two bytes
const LENGTH_SYMBOL_BIAS: usize = LENGTH_SYMBOL_BASE - MIN_REP_LENGTH;

/// Encode tables for one stream
#[derive(Debug)]
pub struct ImplodeState {
    /// Stream header
    pub header: CompressionHeader,
    /// Number of low distance bits for repetitions longer than 2 (4, 5 or 6)
    pub dsize_bits: u32,
    /// Literal bytes (0x00..0x100), repetition lengths (0x100..0x305) and the
    /// end-of-stream symbol (0x305), each with its leading flag bit
    pub literals: Box<CodeTable>,
    /// Distance bucket codes
    pub distances: [CodeEntry; 0x40],
}

impl ImplodeState {
    /// Create the tables for the given header
    pub fn new(header: CompressionHeader) -> Self {
        let mut literals = Box::new([CodeEntry::default(); LITERALS_COUNT]);

        for (byte, entry) in literals[..LENGTH_SYMBOL_BASE].iter_mut().enumerate() {
            *entry = match header.mode {
                // Binary mode: 9 bits per literal, flag bit 0 then the raw byte
                CompressionMode::Binary => CodeEntry {
                    bits: 9,
                    code: (byte * 2) as u16,
                },
                CompressionMode::ASCII => CodeEntry {
                    bits: CH_BITS_ASC[byte] + 1,
                    code: CH_CODE_ASC[byte] * 2,
                },
            };
        }

        let mut symbol = LENGTH_SYMBOL_BASE;
        for i in 0..LEN_CODE.len() {
            for extra in 0..(1u16 << EX_LEN_BITS[i]) {
                literals[symbol] = CodeEntry {
                    bits: EX_LEN_BITS[i] + LEN_BITS[i] + 1,
                    code: (extra << (LEN_BITS[i] + 1)) | ((LEN_CODE[i] as u16) * 2) | 1,
                };
                symbol += 1;
            }
        }
        debug_assert_eq!(symbol, LITERALS_COUNT);

        let mut distances = [CodeEntry::default(); 0x40];
        for (entry, (&bits, &code)) in distances.iter_mut().zip(DIST_BITS.iter().zip(&DIST_CODE)) {
            *entry = CodeEntry {
                bits,
                code: code as u16,
            };
        }

        Self {
            header,
            dsize_bits: header.dict_size.bits() as u32,
            literals,
            distances,
        }
    }

    /// Emit a literal byte
    pub fn encode_literal(&self, writer: &mut BitWriter, byte: u8) {
        writer.put_code(self.literals[byte as usize]);
    }

    /// Emit a repetition of `length` bytes found `distance` bytes back
    pub fn encode_repetition(&self, writer: &mut BitWriter, length: usize, distance: usize) {
        writer.put_code(self.literals[length + LENGTH_SYMBOL_BIAS]);

        let low_bits = if length == MIN_REP_LENGTH {
            2
        } else {
            self.dsize_bits
        };
        let distance = (distance - 1) as u32;
        writer.put_code(self.distances[(distance >> low_bits) as usize]);
        writer.put_bits(low_bits, distance & ((1 << low_bits) - 1));
    }

    /// Emit the end-of-stream symbol
    pub fn encode_end(&self, writer: &mut BitWriter) {
        writer.put_code(self.literals[LITERAL_END_OF_STREAM]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DictionarySize, MAX_REP_LENGTH};

    fn state(mode: CompressionMode) -> ImplodeState {
        ImplodeState::new(CompressionHeader::new(mode, DictionarySize::Size1K))
    }

    #[test]
    fn test_binary_literals() {
        let state = state(CompressionMode::Binary);
        assert_eq!(
            state.literals[b'A' as usize],
            CodeEntry { bits: 9, code: 0x82 }
        );
        assert_eq!(state.literals[0xFF], CodeEntry { bits: 9, code: 0x1FE });
    }

    #[test]
    fn test_ascii_literals_carry_flag_bit() {
        let state = state(CompressionMode::ASCII);
        for byte in 0..0x100 {
            let entry = state.literals[byte];
            assert_eq!(entry.bits, CH_BITS_ASC[byte] + 1);
            assert_eq!(entry.code & 1, 0);
        }
    }

    #[test]
    fn test_length_symbols() {
        let state = state(CompressionMode::Binary);
        // Shortest repetition: length code 0 (3 bits, 0b101), no extra bits
        assert_eq!(
            state.literals[MIN_REP_LENGTH + LENGTH_SYMBOL_BIAS],
            CodeEntry {
                bits: 4,
                code: 0b1011
            }
        );
        // Three bytes: length code 1 (2 bits, 0b11)
        assert_eq!(
            state.literals[3 + LENGTH_SYMBOL_BIAS],
            CodeEntry {
                bits: 3,
                code: 0b111
            }
        );
        for symbol in LENGTH_SYMBOL_BASE..LITERALS_COUNT {
            assert_eq!(state.literals[symbol].code & 1, 1);
        }
        assert!(MAX_REP_LENGTH + LENGTH_SYMBOL_BIAS < LITERAL_END_OF_STREAM);
    }

    #[test]
    fn test_end_marker_bits() {
        let state = state(CompressionMode::Binary);
        let mut writer = BitWriter::new();
        state.encode_end(&mut writer);
        writer.flush();
        // Flag bit, seven zero bits of length code 15, then eight one bits
        assert_eq!(writer.take_output(), vec![0x01, 0xFF]);
    }

    #[test]
    fn test_repetition_bits() {
        let state = state(CompressionMode::Binary);
        let mut writer = BitWriter::new();
        state.encode_literal(&mut writer, b'A');
        state.encode_literal(&mut writer, b'I');
        state.encode_repetition(&mut writer, 11, 2);
        state.encode_end(&mut writer);
        writer.flush();
        assert_eq!(
            writer.take_output(),
            vec![0x82, 0x24, 0x25, 0x8f, 0x80, 0x7f]
        );
    }
}
