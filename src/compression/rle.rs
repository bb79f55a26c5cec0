//! Run-length encoding implementation.
//!
//! The simplest of the codecs: consecutive runs of an identical byte are
//! stored as `(value, count)` pairs. It only pays off on inputs with long
//! runs, but its format is trivially seekable and the encoder is a single
//! pass.
//!
//! # Stream Format
//!
//! A sequence of `[u8 value][u8 count]` pairs with no header, count in
//! 1..=255. A source run longer than 255 bytes is split across several
//! consecutive pairs carrying the same value.

use crate::compression::{Compression, Result};

/// Run-length codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct RleCompression;

impl Compression for RleCompression {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let Some((&first, rest)) = data.split_first() else {
            return Ok(out);
        };
        let mut value = first;
        let mut count: u8 = 1;
        for &byte in rest {
            if byte == value && count < u8::MAX {
                count += 1;
            } else {
                out.push(value);
                out.push(count);
                value = byte;
                count = 1;
            }
        }
        out.push(value);
        out.push(count);
        Ok(out)
    }

    /// Expand `(value, count)` pairs in order.
    ///
    /// An odd-length input leaves a trailing value byte with no count; the
    /// dangling byte is ignored rather than read past the buffer. A pair
    /// with count 0 expands to nothing (the encoder never emits one) and
    /// decoding continues.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for pair in data.chunks_exact(2) {
            let (value, count) = (pair[0], pair[1]);
            for _ in 0..count {
                out.push(value);
            }
        }
        Ok(out)
    }
}
