//! Sliding dictionary window
//!
//! The window is the logical sequence of every byte produced (explode) or
//! consumed (implode) so far. Positions are absolute offsets into that
//! sequence; storage only keeps what back-references can still reach, plus
//! any bytes not yet encoded.

use crate::error::{DclError, Result};

/// Append-only byte history addressed by absolute position
#[derive(Debug)]
pub struct SlidingWindow {
    buf: Vec<u8>,
    /// Absolute position of `buf[0]`
    start: usize,
    /// Maximum backward reach
    size: usize,
}

impl SlidingWindow {
    /// Create a window reaching `size` bytes back
    pub fn new(size: usize) -> Self {
        Self {
            buf: Vec::with_capacity(size * 2),
            start: 0,
            size,
        }
    }

    /// Maximum backward reach in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Absolute position just past the last byte
    pub fn end(&self) -> usize {
        self.start + self.buf.len()
    }

    /// Byte at absolute position `pos`
    ///
    /// `pos` must lie between the oldest retained byte and [`end`](Self::end).
    pub fn byte(&self, pos: usize) -> u8 {
        self.buf[pos - self.start]
    }

    /// Retained bytes from absolute position `pos` to the end
    pub fn slice_from(&self, pos: usize) -> &[u8] {
        &self.buf[pos - self.start..]
    }

    /// How far back a reference made at `pos` may reach
    pub fn reach(&self, pos: usize) -> usize {
        pos.min(self.size)
    }

    /// Append one byte
    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Append bytes
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Repeat `length` bytes found `distance` bytes behind the end
    ///
    /// Bytes are produced one at a time so a distance shorter than the length
    /// replicates the pattern. Every produced byte is also appended to `out`.
    pub fn copy_match(&mut self, distance: usize, length: usize, out: &mut Vec<u8>) -> Result<()> {
        let available = self.reach(self.end());
        if distance == 0 || distance > available {
            return Err(DclError::DistanceTooFar {
                distance,
                available,
            });
        }

        for _ in 0..length {
            let byte = self.buf[self.buf.len() - distance];
            self.buf.push(byte);
            out.push(byte);
        }
        Ok(())
    }

    /// Forget history that no reference made at `pos` or later can reach
    pub fn slide(&mut self, pos: usize) {
        let keep_from = pos.saturating_sub(self.size);
        // Drop in bulk so the cost stays amortized
        if keep_from >= self.start + self.size {
            self.buf.drain(..keep_from - self.start);
            self.start = keep_from;
        }
    }
}
