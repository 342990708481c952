//! Symbol decoding
//!
//! Every decode step is all-or-nothing with respect to input: when the bit
//! reader runs dry mid-symbol the step reports [`Stall::NeedInput`] and the
//! caller rewinds to the symbol start.

use super::ascii::{AsciiTables, ASCII_SECONDARY};
use super::state::ExplodeState;
use super::INVALID_CODE;
use crate::bits::BitReader;
use crate::error::DclError;
use crate::tables::{
    CH_BITS_ASC, CH_CODE_ASC, DIST_BITS, END_OF_STREAM_LENGTH, EX_LEN_BITS, LEN_BASE, LEN_BITS,
};
use crate::MIN_REP_LENGTH;

/// One decoded unit of the bitstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Symbol {
    Literal(u8),
    Repetition { length: usize, distance: usize },
    EndOfStream,
}

/// Why a decode step stopped without producing a symbol
#[derive(Debug)]
pub(crate) enum Stall {
    /// Not enough buffered bits; retry with more input
    NeedInput,
    /// The stream is corrupt
    Error(DclError),
}

impl From<DclError> for Stall {
    fn from(err: DclError) -> Self {
        Stall::Error(err)
    }
}

pub(crate) type DecodeResult<T> = std::result::Result<T, Stall>;

fn take(reader: &mut BitReader, n: u32) -> DecodeResult<u32> {
    reader.take_bits(n).ok_or(Stall::NeedInput)
}

fn peek(reader: &BitReader, n: u32) -> DecodeResult<u32> {
    reader.peek_bits(n).ok_or(Stall::NeedInput)
}

impl ExplodeState {
    /// Decode the next literal, repetition or end-of-stream marker
    pub(crate) fn decode_symbol(&self, reader: &mut BitReader) -> DecodeResult<Symbol> {
        if take(reader, 1)? == 0 {
            let byte = match self.ascii.as_deref() {
                Some(tables) => decode_ascii_literal(tables, reader)?,
                None => take(reader, 8)? as u8,
            };
            return Ok(Symbol::Literal(byte));
        }

        let length = self.decode_length(reader)?;
        if length == END_OF_STREAM_LENGTH {
            return Ok(Symbol::EndOfStream);
        }

        let length = length as usize + MIN_REP_LENGTH;
        let distance = self.decode_distance(reader, length)?;
        Ok(Symbol::Repetition { length, distance })
    }

    /// Length code plus extra bits, before the +2 bias
    fn decode_length(&self, reader: &mut BitReader) -> DecodeResult<u32> {
        let bits = peek(reader, 8)?;
        let code = self.length_codes[bits as usize];
        if code == INVALID_CODE {
            return Err(DclError::MalformedSymbol {
                table: "length",
                bits,
            }
            .into());
        }

        let code = code as usize;
        take(reader, LEN_BITS[code] as u32)?;
        let extra = take(reader, EX_LEN_BITS[code] as u32)?;
        Ok(LEN_BASE[code] as u32 + extra)
    }

    fn decode_distance(&self, reader: &mut BitReader, length: usize) -> DecodeResult<usize> {
        let bits = peek(reader, 8)?;
        let code = self.dist_pos_codes[bits as usize];
        if code == INVALID_CODE {
            return Err(DclError::MalformedSymbol {
                table: "distance",
                bits,
            }
            .into());
        }
        take(reader, DIST_BITS[code as usize] as u32)?;

        // 2-byte repetitions only reach 256 bytes back
        let low_bits = if length == MIN_REP_LENGTH {
            2
        } else {
            self.dsize_bits
        };
        let low = take(reader, low_bits)?;
        Ok((((code as u32) << low_bits) | low) as usize + 1)
    }
}

fn decode_ascii_literal(tables: &AsciiTables, reader: &mut BitReader) -> DecodeResult<u8> {
    let start = reader.mark();
    let bits = peek(reader, 8)?;

    let value = if bits != 0 {
        let value = tables.ascii_table_2c34[bits as usize];
        if value != ASCII_SECONDARY {
            value
        } else if bits & 0x3F != 0 {
            take(reader, 4)?;
            tables.ascii_table_2d34[peek(reader, 8)? as usize]
        } else {
            take(reader, 6)?;
            tables.ascii_table_2e34[peek(reader, 7)? as usize]
        }
    } else {
        take(reader, 8)?;
        tables.ascii_table_2eb4[peek(reader, 8)? as usize]
    };
    take(reader, tables.ch_bits_asc[value as usize] as u32)?;

    // Secondary tables have unfilled slots; reject anything that is not the
    // exact code of the byte it resolved to
    let consumed = (reader.mark() - start) as u32;
    let symbol = value as usize;
    let code = reader.bits_at(start, consumed);
    if consumed != CH_BITS_ASC[symbol] as u32 || code != CH_CODE_ASC[symbol] as u32 {
        return Err(DclError::MalformedSymbol {
            table: "ascii literal",
            bits: code,
        }
        .into());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitWriter;
    use crate::header::CompressionHeader;
    use crate::{CompressionMode, DictionarySize};

    fn state(mode: CompressionMode) -> ExplodeState {
        ExplodeState::new(CompressionHeader::new(mode, DictionarySize::Size1K))
    }

    fn reader_for(bytes: &[u8]) -> BitReader {
        let mut reader = BitReader::new();
        reader.extend(bytes);
        reader
    }

    #[test]
    fn test_binary_literal() {
        let state = state(CompressionMode::Binary);
        // Flag 0, then 'A' (0x41) as 8 raw bits
        let mut reader = reader_for(&[0x82, 0x00]);
        assert_eq!(
            state.decode_symbol(&mut reader).unwrap(),
            Symbol::Literal(b'A')
        );
        assert_eq!(reader.mark(), 9);
    }

    #[test]
    fn test_repetition_from_known_stream() {
        let state = state(CompressionMode::Binary);
        let mut reader = reader_for(&[0x82, 0x24, 0x25, 0x8f, 0x80, 0x7f]);
        assert_eq!(
            state.decode_symbol(&mut reader).unwrap(),
            Symbol::Literal(b'A')
        );
        assert_eq!(
            state.decode_symbol(&mut reader).unwrap(),
            Symbol::Literal(b'I')
        );
        assert_eq!(
            state.decode_symbol(&mut reader).unwrap(),
            Symbol::Repetition {
                length: 11,
                distance: 2
            }
        );
        assert_eq!(
            state.decode_symbol(&mut reader).unwrap(),
            Symbol::EndOfStream
        );
    }

    #[test]
    fn test_short_input_needs_more() {
        let state = state(CompressionMode::Binary);
        let mut reader = reader_for(&[0x82]);
        assert!(matches!(state.decode_symbol(&mut reader), Err(Stall::NeedInput)));
    }

    #[test]
    fn test_unassigned_length_prefix_is_malformed() {
        let mut state = state(CompressionMode::Binary);
        state.length_codes[0] = INVALID_CODE;
        // Flag 1 followed by an all-zero length prefix
        let mut reader = reader_for(&[0x01, 0x00]);
        assert!(matches!(
            state.decode_symbol(&mut reader),
            Err(Stall::Error(DclError::MalformedSymbol {
                table: "length",
                bits: 0
            }))
        ));
    }

    #[test]
    fn test_ascii_literals_decode_every_byte() {
        let state = state(CompressionMode::ASCII);
        let mut writer = BitWriter::new();
        for byte in 0..=255u8 {
            writer.put_bits(1, 0);
            writer.put_bits(
                CH_BITS_ASC[byte as usize] as u32,
                CH_CODE_ASC[byte as usize] as u32,
            );
        }
        writer.flush();

        let mut reader = reader_for(&writer.take_output());
        reader.close();
        for byte in 0..=255u8 {
            assert_eq!(
                state.decode_symbol(&mut reader).unwrap(),
                Symbol::Literal(byte)
            );
        }
    }
}
