//! Bit-level cursor over DCL streams
//!
//! The DCL format packs codes LSB-first: the first bit of a code is bit 0 of
//! the first byte it touches, and codes freely straddle byte boundaries.
//!
//! [`BitReader`] never fails when it runs dry. A short read returns `None`,
//! leaving the cursor untouched, so callers can roll a whole symbol back with
//! [`BitReader::mark`] / [`BitReader::reset`] and retry once more input has
//! been appended.

use crate::tables::LITERALS_COUNT;

/// A single variable-length code: `bits` low-order bits of `code`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeEntry {
    /// Code length in bits
    pub bits: u8,
    /// Code value, LSB-first
    pub code: u16,
}

/// Encode table for the combined literal/length alphabet
pub type CodeTable = [CodeEntry; LITERALS_COUNT];

/// Accumulates input bytes and hands them out bit by bit
#[derive(Debug, Default)]
pub struct BitReader {
    buf: Vec<u8>,
    /// Read position in bits, relative to `buf[0]`
    pos: usize,
    /// Set once no further input will arrive
    closed: bool,
}

impl BitReader {
    /// Create an empty reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Append input bytes
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Mark the input as complete; peeks past the end now read zero bits
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of unread bits
    pub fn available_bits(&self) -> usize {
        self.buf.len() * 8 - self.pos
    }

    /// Unread bytes, starting at the current byte (only meaningful when aligned)
    pub fn remaining_bytes(&self) -> &[u8] {
        &self.buf[self.pos / 8..]
    }

    /// Current position, for rolling back a partially decoded symbol
    pub fn mark(&self) -> usize {
        self.pos
    }

    /// Return to a position obtained from [`mark`](Self::mark)
    pub fn reset(&mut self, mark: usize) {
        debug_assert!(mark <= self.buf.len() * 8);
        self.pos = mark;
    }

    /// Look at the next `n` bits without consuming them
    ///
    /// Returns `None` when fewer than `n` bits are buffered and more input may
    /// still arrive. After [`close`](Self::close) missing bits read as zero.
    pub fn peek_bits(&self, n: u32) -> Option<u32> {
        if (n as usize) > self.available_bits() && !self.closed {
            return None;
        }
        Some(self.bits_at(self.pos, n))
    }

    /// Consume the next `n` bits, or `None` if they have not all arrived
    pub fn take_bits(&mut self, n: u32) -> Option<u32> {
        if (n as usize) > self.available_bits() {
            return None;
        }
        let value = self.bits_at(self.pos, n);
        self.pos += n as usize;
        Some(value)
    }

    /// Read `n` (<= 24) bits starting at absolute bit `start`, zero past the end
    pub fn bits_at(&self, start: usize, n: u32) -> u32 {
        debug_assert!(n <= 24, "Cannot read more than 24 bits at once");
        let mut value = 0u32;
        let mut got = 0u32;
        let mut byte_index = start / 8;
        let mut shift = (start % 8) as u32;

        while got < n {
            let Some(&byte) = self.buf.get(byte_index) else {
                break;
            };
            value |= ((byte as u32) >> shift) << got;
            got += 8 - shift;
            shift = 0;
            byte_index += 1;
        }

        if n == 0 {
            0
        } else {
            value & (u32::MAX >> (32 - n))
        }
    }

    /// Drop fully consumed bytes from the front of the buffer
    pub fn compact(&mut self) {
        let consumed = self.pos / 8;
        if consumed > 0 {
            self.buf.drain(..consumed);
            self.pos -= consumed * 8;
        }
    }
}

/// Packs codes into bytes, LSB-first
#[derive(Debug, Default)]
pub struct BitWriter {
    out: Vec<u8>,
    /// Byte being assembled
    partial: u8,
    /// Bits already filled in `partial` (0..8)
    filled: u32,
}

impl BitWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append whole bytes; the writer must be byte aligned
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        debug_assert_eq!(self.filled, 0);
        self.out.extend_from_slice(bytes);
    }

    /// Append the low `n` (<= 24) bits of `value`
    pub fn put_bits(&mut self, n: u32, value: u32) {
        debug_assert!(n <= 24, "Cannot write more than 24 bits at once");
        if n == 0 {
            return;
        }

        let mut acc = self.partial as u32 | ((value & (u32::MAX >> (32 - n))) << self.filled);
        let mut filled = self.filled + n;
        while filled >= 8 {
            self.out.push(acc as u8);
            acc >>= 8;
            filled -= 8;
        }

        self.partial = acc as u8;
        self.filled = filled;
    }

    /// Append a table entry
    pub fn put_code(&mut self, entry: CodeEntry) {
        self.put_bits(entry.bits as u32, entry.code as u32);
    }

    /// Bits waiting in the partial byte
    pub fn pending_bits(&self) -> u32 {
        self.filled
    }

    /// Zero-pad and emit the partial byte, if any
    pub fn flush(&mut self) {
        if self.filled > 0 {
            self.out.push(self.partial);
            self.partial = 0;
            self.filled = 0;
        }
    }

    /// Hand out all completed bytes, keeping the partial byte
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out)
    }
}
