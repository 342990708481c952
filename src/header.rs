//! Stream header codec
//!
//! Every DCL stream starts with two bytes: the compression type and the
//! number of low distance bits, which implies the dictionary size.

use crate::common::{CompressionMode, DictionarySize, HEADER_SIZE, MIN_STREAM_SIZE};
use crate::error::{DclError, Result};

/// The two semantic fields of a stream header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionHeader {
    /// Compression mode (Binary/ASCII)
    pub mode: CompressionMode,
    /// Dictionary size
    pub dict_size: DictionarySize,
}

impl CompressionHeader {
    /// Create a header from its fields
    pub fn new(mode: CompressionMode, dict_size: DictionarySize) -> Self {
        Self { mode, dict_size }
    }

    /// Parse the header at the start of `data`
    ///
    /// At least four bytes are required: the two header bytes plus enough of
    /// the bitstream to hold the shortest valid stream.
    pub fn read(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_STREAM_SIZE {
            return Err(DclError::InvalidData(format!(
                "need at least {} bytes for a stream header, got {}",
                MIN_STREAM_SIZE,
                data.len()
            )));
        }

        let mode = CompressionMode::from_u8(data[0])?;
        let dict_size = DictionarySize::from_bits(data[1])?;
        Ok(Self { mode, dict_size })
    }

    /// Serialized header bytes
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        [self.mode as u8, self.dict_size.bits()]
    }

    /// Append the header bytes to `out`
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_bytes());
    }

    /// Number of low distance bits (4, 5 or 6)
    pub fn dictionary_size_bits(&self) -> u8 {
        self.dict_size.bits()
    }
}
