//! ImplodeWriter - Streaming compression writer
//!
//! Pushes everything written through an [`Imploder`] and forwards the
//! compressed bytes to the inner writer as soon as they are complete.

use super::engine::Imploder;
use crate::error::DclError;
use crate::{CompressionMode, CompressionStats, DictionarySize, Result};
use log::warn;
use std::io::{self, Write};

/// Streaming compression writer implementing Write trait
#[derive(Debug)]
pub struct ImplodeWriter<W: Write> {
    /// `None` once [`finish`](Self::finish) handed the writer back
    writer: Option<W>,
    engine: Imploder,
}

impl<W: Write> ImplodeWriter<W> {
    /// Create a new ImplodeWriter
    ///
    /// Never fails; the header reaches `writer` with the first compressed
    /// output. The `Result` keeps room for fallible setup without an API
    /// break.
    pub fn new(writer: W, mode: CompressionMode, dict_size: DictionarySize) -> Result<Self> {
        Ok(Self {
            writer: Some(writer),
            engine: Imploder::new(mode, dict_size),
        })
    }

    /// Statistics for the data compressed so far
    pub fn stats(&self) -> &CompressionStats {
        crate::ChunkCodec::stats(&self.engine)
    }

    /// Finish compression, flush all remaining data and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        let tail = self.engine.finish()?;
        let mut writer = self.writer.take().ok_or(DclError::EngineClosed)?;
        writer.write_all(&tail)?;
        writer.flush()?;
        Ok(writer)
    }

    fn forward(&mut self, bytes: &[u8]) -> io::Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        match self.writer.as_mut() {
            Some(writer) => writer.write_all(bytes),
            None => Err(DclError::EngineClosed.into()),
        }
    }
}

impl<W: Write> Write for ImplodeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let compressed = self.engine.feed(buf)?;
        self.forward(&compressed)?;
        Ok(buf.len())
    }

    /// Flushes the inner writer
    ///
    /// Bytes still held for lookahead stay buffered until
    /// [`finish`](ImplodeWriter::finish).
    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for ImplodeWriter<W> {
    fn drop(&mut self) {
        if self.writer.is_none() || self.engine.is_finished() {
            return;
        }
        // Best effort; errors cannot be reported from drop
        let result = self
            .engine
            .finish()
            .map_err(io::Error::from)
            .and_then(|tail| self.forward(&tail));
        if let Err(err) = result {
            warn!("Failed to finish implode stream on drop: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explode::explode_bytes;

    #[test]
    fn test_finish_returns_writer() {
        let mut writer =
            ImplodeWriter::new(Vec::new(), CompressionMode::Binary, DictionarySize::Size1K)
                .unwrap();
        writer.write_all(b"AIAIAIAIAIAIA").unwrap();
        let output = writer.finish().unwrap();
        assert_eq!(output, [0x00, 0x04, 0x82, 0x24, 0x25, 0x8f, 0x80, 0x7f]);
    }

    #[test]
    fn test_many_small_writes() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 97) as u8).collect();
        let mut writer =
            ImplodeWriter::new(Vec::new(), CompressionMode::Binary, DictionarySize::Size4K)
                .unwrap();
        for chunk in data.chunks(7) {
            writer.write_all(chunk).unwrap();
        }
        writer.flush().unwrap();
        assert_eq!(writer.stats().input_bytes, 5000);

        let output = writer.finish().unwrap();
        assert_eq!(explode_bytes(&output).unwrap(), data);
    }

    #[test]
    fn test_drop_finishes_stream() {
        let mut output = Vec::new();
        {
            let mut writer =
                ImplodeWriter::new(&mut output, CompressionMode::ASCII, DictionarySize::Size2K)
                    .unwrap();
            writer.write_all(b"dropped without finish").unwrap();
        }
        assert_eq!(explode_bytes(&output).unwrap(), b"dropped without finish");
    }
}
