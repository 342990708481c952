//! Chunk-driven compression engine

use super::hash::MatchFinder;
use super::pattern::find_repetition;
use super::state::ImplodeState;
use crate::bits::BitWriter;
use crate::common::{ChunkCodec, CompressionStats};
use crate::error::{DclError, Result};
use crate::header::CompressionHeader;
use crate::window::SlidingWindow;
use crate::{CompressionMode, DictionarySize, MAX_REP_LENGTH};
use log::{debug, trace};

/// Incremental DCL encoder
///
/// The header is part of the first output returned. Positions are only
/// encoded once a full maximum-length lookahead is buffered behind them, so
/// the output does not depend on how the input was split.
///
/// ```
/// use pkdcl::implode::Imploder;
/// use pkdcl::{CompressionMode, DictionarySize};
///
/// let mut engine = Imploder::new(CompressionMode::Binary, DictionarySize::Size1K);
/// let mut output = engine.feed(b"AIAIAIAIAIAIA")?;
/// output.extend(engine.finish()?);
/// assert_eq!(output, [0x00, 0x04, 0x82, 0x24, 0x25, 0x8f, 0x80, 0x7f]);
/// # Ok::<(), pkdcl::DclError>(())
/// ```
#[derive(Debug)]
pub struct Imploder {
    state: ImplodeState,
    window: SlidingWindow,
    finder: MatchFinder,
    output: BitWriter,
    /// Absolute position of the next byte to encode
    pos: usize,
    finished: bool,
    stats: CompressionStats,
}

impl Imploder {
    /// Create an engine for the given mode and dictionary size
    pub fn new(mode: CompressionMode, dict_size: DictionarySize) -> Self {
        let header = CompressionHeader::new(mode, dict_size);
        let mut output = BitWriter::new();
        output.put_bytes(&header.to_bytes());
        debug!(
            "Implode header: {:?} mode, {} byte dictionary",
            mode,
            dict_size.bytes()
        );

        Self {
            state: ImplodeState::new(header),
            window: SlidingWindow::new(dict_size.bytes()),
            finder: MatchFinder::new(),
            output,
            pos: 0,
            finished: false,
            stats: CompressionStats::default(),
        }
    }

    /// The header this engine writes
    pub fn header(&self) -> CompressionHeader {
        self.state.header
    }

    /// Whether [`finish`](Self::finish) has completed
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Accept more raw bytes and return the compressed bytes completed so far
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        if self.finished {
            return Err(DclError::EngineClosed);
        }

        self.window.extend(chunk);
        self.stats.input_bytes += chunk.len() as u64;

        while self.window.end() - self.pos > MAX_REP_LENGTH {
            self.encode_next();
        }
        self.window.slide(self.pos);

        let output = self.take_output();
        trace!(
            "Imploded {} input bytes into {} output bytes",
            chunk.len(),
            output.len()
        );
        Ok(output)
    }

    /// Encode all buffered input, append the end-of-stream code and flush
    ///
    /// Calling it again returns nothing.
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        if self.finished {
            return Ok(Vec::new());
        }

        while self.pos < self.window.end() {
            self.encode_next();
        }
        self.state.encode_end(&mut self.output);
        self.output.flush();
        self.finished = true;

        let output = self.take_output();
        debug!(
            "Implode finished: {} bytes in, {} bytes out, {} literals, {} repetitions",
            self.stats.input_bytes,
            self.stats.output_bytes,
            self.stats.literal_count,
            self.stats.match_count
        );
        Ok(output)
    }

    fn take_output(&mut self) -> Vec<u8> {
        let output = self.output.take_output();
        self.stats.output_bytes += output.len() as u64;
        output
    }

    fn encode_next(&mut self) {
        let pos = self.pos;
        let found = find_repetition(&self.window, &self.finder, pos);

        let advance = if found.is_match() {
            self.state
                .encode_repetition(&mut self.output, found.length, found.distance);
            self.stats.record_match(found.length);
            found.length
        } else {
            self.state
                .encode_literal(&mut self.output, self.window.byte(pos));
            self.stats.literal_count += 1;
            1
        };

        // A position is indexed once the byte after it is known
        let end = self.window.end();
        for indexed in pos..(pos + advance).min(end - 1) {
            self.finder.insert(&self.window, indexed);
        }
        self.pos += advance;
    }
}

impl ChunkCodec for Imploder {
    fn feed(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        Imploder::feed(self, chunk)
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        Imploder::finish(self)
    }

    fn stats(&self) -> &CompressionStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explode::explode_bytes;

    fn implode_all(data: &[u8], mode: CompressionMode, dict_size: DictionarySize) -> Vec<u8> {
        let mut engine = Imploder::new(mode, dict_size);
        let mut output = engine.feed(data).unwrap();
        output.extend(engine.finish().unwrap());
        output
    }

    #[test]
    fn test_reference_vector() {
        assert_eq!(
            implode_all(
                b"AIAIAIAIAIAIA",
                CompressionMode::Binary,
                DictionarySize::Size1K
            ),
            [0x00, 0x04, 0x82, 0x24, 0x25, 0x8f, 0x80, 0x7f]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            implode_all(b"", CompressionMode::Binary, DictionarySize::Size1K),
            [0x00, 0x04, 0x01, 0xff]
        );
        assert_eq!(
            implode_all(b"", CompressionMode::ASCII, DictionarySize::Size4K),
            [0x01, 0x06, 0x01, 0xff]
        );
    }

    #[test]
    fn test_header_comes_first() {
        let mut engine = Imploder::new(CompressionMode::ASCII, DictionarySize::Size2K);
        assert_eq!(engine.feed(b"x").unwrap(), [0x01, 0x05]);
        assert_eq!(engine.header().dictionary_size_bits(), 5);
    }

    #[test]
    fn test_byte_at_a_time_matches_single_chunk() {
        let data: Vec<u8> = b"the quick brown fox jumps over the lazy dog. "
            .iter()
            .cycle()
            .take(3000)
            .copied()
            .collect();
        let whole = implode_all(&data, CompressionMode::ASCII, DictionarySize::Size2K);

        let mut engine = Imploder::new(CompressionMode::ASCII, DictionarySize::Size2K);
        let mut output = Vec::new();
        for byte in &data {
            output.extend(engine.feed(&[*byte]).unwrap());
        }
        output.extend(engine.finish().unwrap());
        assert_eq!(output, whole);
        assert_eq!(explode_bytes(&output).unwrap(), data);
    }

    #[test]
    fn test_stats() {
        let mut engine = Imploder::new(CompressionMode::Binary, DictionarySize::Size4K);
        let mut output = engine.feed(b"aaaaaaaaaa").unwrap();
        output.extend(engine.finish().unwrap());
        assert_eq!(output, [0x00, 0x06, 0xc2, 0xd2, 0x81, 0x80, 0x7f]);

        let stats = ChunkCodec::stats(&engine);
        assert_eq!(stats.input_bytes, 10);
        assert_eq!(stats.output_bytes, 7);
        assert_eq!(stats.literal_count, 1);
        assert_eq!(stats.match_count, 1);
        assert_eq!(stats.longest_match, 9);
    }

    #[test]
    fn test_closed_after_finish() {
        let mut engine = Imploder::new(CompressionMode::Binary, DictionarySize::Size1K);
        engine.finish().unwrap();
        assert!(engine.is_finished());
        assert!(engine.finish().unwrap().is_empty());
        assert!(matches!(engine.feed(b"more"), Err(DclError::EngineClosed)));
    }
}
