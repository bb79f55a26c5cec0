//! Compression algorithms implementation.
//!
//! This module provides implementations of lossless compression codecs:
//! - Entropy coding (Huffman)
//! - Dictionary/match-based coding (LZ77)
//! - Run-length encoding (RLE)
//!
//! Every codec transforms an arbitrary byte buffer into a compact
//! self-describing byte buffer and back, exactly. The whole input is held
//! in memory; there is no streaming API. Decoders never panic on malformed
//! input: they return the longest prefix of the original data they could
//! reconstruct, and callers that need strict integrity must verify the
//! output length themselves.
//!
//! # Examples
//!
//! ```rust
//! use bytepress::compression::{Compression, RleCompression};
//!
//! let codec = RleCompression;
//! let compressed = codec.compress(b"aaaabbb").unwrap();
//! let restored = codec.decompress(&compressed).unwrap();
//! assert_eq!(restored, b"aaaabbb");
//! ```

use crate::error::Error;

/// Result type for compression operations
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for compression algorithms
pub trait Compression {
    /// Compress the input data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress the compressed data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub mod huffman;
pub mod lz77;
pub mod rle;

pub use huffman::HuffmanCompression;
pub use lz77::Lz77Compression;
pub use rle::RleCompression;

// Bounds-checked cursor reads for the binary container parsers. Decoders
// fail soft on truncated input, so these return Option rather than Err.

pub(crate) fn read_u8(buf: &[u8], pos: &mut usize) -> Option<u8> {
    let byte = *buf.get(*pos)?;
    *pos += 1;
    Some(byte)
}

pub(crate) fn read_u16_le(buf: &[u8], pos: &mut usize) -> Option<u16> {
    let bytes = buf.get(*pos..*pos + 2)?;
    *pos += 2;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_u16_be(buf: &[u8], pos: &mut usize) -> Option<u16> {
    let bytes = buf.get(*pos..*pos + 2)?;
    *pos += 2;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_u64_le(buf: &[u8], pos: &mut usize) -> Option<u64> {
    let bytes = buf.get(*pos..*pos + 8)?;
    *pos += 8;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    Some(u64::from_le_bytes(raw))
}
