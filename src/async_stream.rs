//! Async stream drivers
//!
//! Drives the chunk engines over tokio's `AsyncRead` / `AsyncWrite`. The
//! engines themselves are synchronous; each chunk is processed to completion
//! before the next read is awaited.

use crate::common::ChunkCodec;
use crate::explode::Exploder;
use crate::implode::Imploder;
use crate::{CompressionMode, CompressionStats, DictionarySize, Result};
use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Configuration options for stream processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOptions {
    /// Number of bytes read from the source per engine call
    pub chunk_size: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024, // 64KB chunks
        }
    }
}

impl StreamOptions {
    /// Create options optimized for large files
    pub fn large_file() -> Self {
        Self {
            chunk_size: 1024 * 1024,
        }
    }

    /// Create options optimized for memory-constrained environments
    pub fn low_memory() -> Self {
        Self {
            chunk_size: 16 * 1024,
        }
    }
}

/// Decompress everything from `reader` into `writer`
pub async fn explode_async<R, W>(
    reader: R,
    writer: W,
    options: StreamOptions,
) -> Result<CompressionStats>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    drive(Exploder::new(), reader, writer, &options).await
}

/// Compress everything from `reader` into `writer`
pub async fn implode_async<R, W>(
    reader: R,
    writer: W,
    mode: CompressionMode,
    dict_size: DictionarySize,
    options: StreamOptions,
) -> Result<CompressionStats>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    drive(Imploder::new(mode, dict_size), reader, writer, &options).await
}

async fn drive<C, R, W>(
    mut engine: C,
    mut reader: R,
    mut writer: W,
    options: &StreamOptions,
) -> Result<CompressionStats>
where
    C: ChunkCodec,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; options.chunk_size.max(1)];
    let mut chunks_processed = 0usize;

    loop {
        let bytes_read = reader.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }

        let output = engine.feed(&buffer[..bytes_read])?;
        writer.write_all(&output).await?;
        chunks_processed += 1;

        // Periodic yielding for fairness
        if chunks_processed % 16 == 0 {
            tokio::task::yield_now().await;
        }
    }

    let output = engine.finish()?;
    writer.write_all(&output).await?;
    writer.flush().await?;

    debug!("Async stream finished after {} chunks", chunks_processed);
    Ok(engine.stats().clone())
}
