//! Chunk-driven decompression engine

use super::decoder::{Stall, Symbol};
use super::state::ExplodeState;
use crate::bits::BitReader;
use crate::common::{ChunkCodec, CompressionStats, HEADER_SIZE, MIN_STREAM_SIZE};
use crate::error::{DclError, Result};
use crate::header::CompressionHeader;
use log::{debug, trace, warn};

/// Where an [`Exploder`] is in its stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplodePhase {
    /// Fewer than four bytes have arrived
    AwaitingHeader,
    /// Decoding symbols
    Streaming,
    /// The end-of-stream marker was decoded
    Done,
    /// A decode error occurred; the engine is unusable
    Failed,
}

/// Incremental DCL decoder
///
/// ```
/// use pkdcl::explode::Exploder;
///
/// let stream = [0x00, 0x04, 0x82, 0x24, 0x25, 0x8f, 0x80, 0x7f];
/// let mut engine = Exploder::new();
/// let mut output = Vec::new();
/// for byte in stream {
///     output.extend(engine.feed(&[byte])?);
/// }
/// output.extend(engine.finish()?);
/// assert_eq!(output, b"AIAIAIAIAIAIA");
/// # Ok::<(), pkdcl::DclError>(())
/// ```
#[derive(Debug)]
pub struct Exploder {
    phase: ExplodePhase,
    input: BitReader,
    state: Option<ExplodeState>,
    stats: CompressionStats,
}

impl Default for Exploder {
    fn default() -> Self {
        Self::new()
    }
}

impl Exploder {
    /// Create an engine waiting for a stream header
    pub fn new() -> Self {
        Self {
            phase: ExplodePhase::AwaitingHeader,
            input: BitReader::new(),
            state: None,
            stats: CompressionStats::default(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> ExplodePhase {
        self.phase
    }

    /// Whether the end-of-stream marker has been decoded
    pub fn is_done(&self) -> bool {
        self.phase == ExplodePhase::Done
    }

    /// The stream header, once parsed
    pub fn header(&self) -> Option<CompressionHeader> {
        self.state.as_ref().map(|state| state.header)
    }

    /// Accept more compressed bytes and return the bytes they completed
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        if self.phase == ExplodePhase::Failed || self.input.is_closed() {
            return Err(DclError::EngineClosed);
        }
        self.stats.input_bytes += chunk.len() as u64;

        if self.phase == ExplodePhase::Done {
            trace!("Ignoring {} bytes after end of stream", chunk.len());
            return Ok(Vec::new());
        }

        self.input.extend(chunk);
        let output = self.advance()?;
        trace!(
            "Exploded {} input bytes into {} output bytes",
            chunk.len(),
            output.len()
        );
        Ok(output)
    }

    /// Signal end of input and return the remaining output
    ///
    /// Fails with [`DclError::TruncatedStream`] if the end-of-stream marker
    /// never arrives. Calling it again after success returns nothing.
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        if self.phase == ExplodePhase::Failed {
            return Err(DclError::EngineClosed);
        }
        if self.input.is_closed() {
            return Ok(Vec::new());
        }

        self.input.close();
        let output = self.advance()?;
        if self.phase != ExplodePhase::Done {
            return Err(self.fail(DclError::TruncatedStream));
        }

        debug!(
            "Explode finished: {} bytes in, {} bytes out, {} literals, {} repetitions",
            self.stats.input_bytes,
            self.stats.output_bytes,
            self.stats.literal_count,
            self.stats.match_count
        );
        Ok(output)
    }

    fn advance(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        match self.run(&mut output) {
            Ok(()) => {
                self.stats.output_bytes += output.len() as u64;
                Ok(output)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: DclError) -> DclError {
        warn!("Explode failed: {}", err);
        self.phase = ExplodePhase::Failed;
        err
    }

    fn read_header(&mut self) -> Result<bool> {
        let available = self.input.remaining_bytes();
        if available.len() < MIN_STREAM_SIZE && !self.input.is_closed() {
            return Ok(false);
        }

        let header = CompressionHeader::read(available)?;
        self.input.take_bits(HEADER_SIZE as u32 * 8);
        debug!(
            "Stream header: {:?} mode, {} byte dictionary",
            header.mode,
            header.dict_size.bytes()
        );

        self.state = Some(ExplodeState::new(header));
        self.phase = ExplodePhase::Streaming;
        Ok(true)
    }

    fn run(&mut self, output: &mut Vec<u8>) -> Result<()> {
        if self.phase == ExplodePhase::AwaitingHeader && !self.read_header()? {
            return Ok(());
        }
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };

        while self.phase == ExplodePhase::Streaming {
            let mark = self.input.mark();
            match state.decode_symbol(&mut self.input) {
                Ok(Symbol::Literal(byte)) => {
                    state.window.push(byte);
                    output.push(byte);
                    self.stats.literal_count += 1;
                }
                Ok(Symbol::Repetition { length, distance }) => {
                    state.window.copy_match(distance, length, output)?;
                    self.stats.record_match(length);
                }
                Ok(Symbol::EndOfStream) => {
                    debug!("End of stream marker reached");
                    self.phase = ExplodePhase::Done;
                }
                Err(Stall::NeedInput) => {
                    self.input.reset(mark);
                    break;
                }
                Err(Stall::Error(err)) => return Err(err),
            }
            let end = state.window.end();
            state.window.slide(end);
        }

        self.input.compact();
        Ok(())
    }
}

impl ChunkCodec for Exploder {
    fn feed(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        Exploder::feed(self, chunk)
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        Exploder::finish(self)
    }

    fn stats(&self) -> &CompressionStats {
        &self.stats
    }
}
