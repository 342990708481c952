//! ExplodeReader - Streaming decompression reader
//!
//! Pulls compressed bytes from an inner reader in [`IN_BUFF_SIZE`] chunks and
//! serves the decompressed bytes through `std::io::Read`.

use super::engine::Exploder;
use super::IN_BUFF_SIZE;
use crate::header::CompressionHeader;
use crate::Result;
use std::io::{self, Read};

/// Streaming decompression reader implementing Read trait
#[derive(Debug)]
pub struct ExplodeReader<R: Read> {
    reader: R,
    engine: Exploder,
    in_buff: Vec<u8>,
    finished: bool,
    output_buffer: Vec<u8>,
    output_pos: usize,
}

impl<R: Read> ExplodeReader<R> {
    /// Create a new ExplodeReader
    ///
    /// Never fails; the header is validated on the first read. The `Result`
    /// matches [`ImplodeWriter::new`](crate::ImplodeWriter::new).
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            reader,
            engine: Exploder::new(),
            in_buff: vec![0; IN_BUFF_SIZE],
            finished: false,
            output_buffer: Vec::new(),
            output_pos: 0,
        })
    }

    /// The stream header, once enough input has been read to parse it
    pub fn header(&self) -> Option<CompressionHeader> {
        self.engine.header()
    }

    /// Statistics for the data decompressed so far
    pub fn stats(&self) -> &crate::CompressionStats {
        crate::ChunkCodec::stats(&self.engine)
    }

    /// Unwrap the inner reader
    ///
    /// Bytes read past the end-of-stream marker are not returned to it.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn refill(&mut self) -> io::Result<()> {
        let n = loop {
            match self.reader.read(&mut self.in_buff) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };

        self.output_buffer = if n == 0 {
            self.finished = true;
            self.engine.finish()?
        } else {
            let output = self.engine.feed(&self.in_buff[..n])?;
            // Stop pulling input once the end-of-stream marker has been seen
            if self.engine.is_done() {
                self.finished = true;
            }
            output
        };
        self.output_pos = 0;
        Ok(())
    }
}

impl<R: Read> Read for ExplodeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.output_pos >= self.output_buffer.len() {
            if self.finished {
                return Ok(0);
            }
            self.refill()?;
        }

        let available = &self.output_buffer[self.output_pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.output_pos += n;
        Ok(n)
    }
}
