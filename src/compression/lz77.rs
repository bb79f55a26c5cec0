//! LZ77 sliding-window compression implementation.
//!
//! LZ77 replaces repeated byte sequences with back-references into a
//! bounded window of previously seen data. The encoder scans the input
//! left to right, looking backward up to the window size for the longest
//! prefix match, and emits either a literal byte or an (offset, length)
//! copy instruction.
//!
//! # Token Format
//!
//! ```text
//! literal: [0x00][byte]
//! match:   [0x01][u16 offset, big-endian][u8 length]
//! ```
//!
//! Tokens are concatenated with no delimiters or counts; the flag byte
//! makes the stream self-describing. Offsets count backward from the
//! current output position. A match may reach into bytes it is itself
//! producing (offset < length); the decoder copies byte-by-byte so every
//! copied byte becomes a valid source for the rest of the same match.

use crate::compression::{read_u16_be, read_u8, Compression, Result};
use crate::error::Error;
use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Flag byte introducing a literal token.
const FLAG_LITERAL: u8 = 0x00;
/// Flag byte introducing a match token.
const FLAG_MATCH: u8 = 0x01;
/// Matches shorter than this cost more than the literals they replace.
const MIN_MATCH_LEN: usize = 3;
/// A match length must fit the token's single length byte.
const MAX_MATCH_LEN: usize = 255;

/// LZ77 codec with a fixed window and lookahead configuration.
///
/// The configuration is set at construction and never changes; each
/// compress/decompress call is otherwise pure and stateless.
#[derive(Debug, Clone)]
pub struct Lz77Compression {
    /// How far back a match may reach
    window: usize,
    /// Maximum number of bytes a single match may cover
    lookahead: usize,
}

impl Lz77Compression {
    /// Create a codec with the given window and lookahead sizes.
    ///
    /// The effective match length is additionally capped at 255 so it fits
    /// the token format.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if either size is zero, or if the
    /// window is too large for the token's 16-bit offset.
    pub fn new(window: usize, lookahead: usize) -> Result<Self> {
        if window == 0 {
            return Err(Error::InvalidInput(
                "window size must be positive".to_string(),
            ));
        }
        if window > u16::MAX as usize {
            return Err(Error::InvalidInput(format!(
                "window size {} exceeds the 16-bit offset limit",
                window
            )));
        }
        if lookahead == 0 {
            return Err(Error::InvalidInput(
                "lookahead size must be positive".to_string(),
            ));
        }
        Ok(Lz77Compression { window, lookahead })
    }

    /// Find the longest match for `data[pos..]` within the window.
    ///
    /// The window is scanned in increasing start-position order and only a
    /// strictly longer candidate replaces the current best, so among
    /// equal-length matches the oldest position wins. Returns
    /// `(offset, length)`; length 0 means no match at all.
    #[cfg(not(feature = "parallel"))]
    fn find_longest_match(&self, data: &[u8], pos: usize) -> (usize, usize) {
        let start = pos.saturating_sub(self.window);
        let max_len = self.lookahead.min(MAX_MATCH_LEN).min(data.len() - pos);
        let mut best_len = 0;
        let mut best_offset = 0;
        for candidate in start..pos {
            let len = match_length(data, candidate, pos, max_len);
            if len > best_len {
                best_len = len;
                best_offset = pos - candidate;
                if best_len == max_len {
                    break;
                }
            }
        }
        (best_offset, best_len)
    }

    /// Parallel variant of the window scan. Candidates are evaluated
    /// independently and reduced by (length desc, start position asc),
    /// which reproduces the sequential first-seen-longest tie-break, so
    /// token output is bit-identical with the feature on or off.
    #[cfg(feature = "parallel")]
    fn find_longest_match(&self, data: &[u8], pos: usize) -> (usize, usize) {
        let start = pos.saturating_sub(self.window);
        let max_len = self.lookahead.min(MAX_MATCH_LEN).min(data.len() - pos);
        let best = (start..pos)
            .into_par_iter()
            .map(|candidate| (match_length(data, candidate, pos, max_len), candidate))
            .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
        match best {
            Some((len, candidate)) if len > 0 => (pos - candidate, len),
            _ => (0, 0),
        }
    }
}

impl Default for Lz77Compression {
    /// A 4 KiB window with an 18-byte lookahead.
    fn default() -> Self {
        Lz77Compression {
            window: 4096,
            lookahead: 18,
        }
    }
}

/// Length of the common prefix of `data[candidate..]` and `data[pos..]`,
/// capped at `max_len`.
///
/// The comparison may run past `pos` into bytes the match itself would
/// produce; that is what makes self-overlapping run matches possible.
fn match_length(data: &[u8], candidate: usize, pos: usize, max_len: usize) -> usize {
    let mut len = 0;
    while len < max_len && data[candidate + len] == data[pos + len] {
        len += 1;
    }
    len
}

impl Compression for Lz77Compression {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut pos = 0;
        let mut match_tokens = 0usize;
        while pos < data.len() {
            let (offset, len) = self.find_longest_match(data, pos);
            if len >= MIN_MATCH_LEN {
                out.push(FLAG_MATCH);
                out.extend_from_slice(&(offset as u16).to_be_bytes());
                out.push(len as u8);
                pos += len;
                match_tokens += 1;
            } else {
                out.push(FLAG_LITERAL);
                out.push(data[pos]);
                pos += 1;
            }
        }
        debug!(
            "lz77 compress: {} bytes in, {} bytes out, {} match tokens",
            data.len(),
            out.len(),
            match_tokens
        );
        Ok(out)
    }

    /// Decode a token stream.
    ///
    /// Decoding stops at the first invalid token and returns everything
    /// produced up to that point: a zero offset, an offset reaching past
    /// the bytes produced so far, an unrecognized flag byte, or a token
    /// cut off by the end of the input all terminate the loop.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut pos = 0;
        while pos < data.len() {
            let flag = data[pos];
            pos += 1;
            match flag {
                FLAG_LITERAL => {
                    let Some(byte) = read_u8(data, &mut pos) else {
                        break;
                    };
                    out.push(byte);
                }
                FLAG_MATCH => {
                    let Some(offset) = read_u16_be(data, &mut pos) else {
                        break;
                    };
                    let Some(len) = read_u8(data, &mut pos) else {
                        break;
                    };
                    let offset = offset as usize;
                    if offset == 0 || offset > out.len() {
                        break;
                    }
                    let from = out.len() - offset;
                    // Byte-by-byte: when offset < length the match reads
                    // bytes appended earlier in this same loop.
                    for i in 0..len as usize {
                        let byte = out[from + i];
                        out.push(byte);
                    }
                }
                _ => break,
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    /// Split a token stream into (flag, offset, length) triples, with
    /// offset/length zero for literals.
    fn parse_tokens(stream: &[u8]) -> Vec<(u8, u16, u8)> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < stream.len() {
            let flag = stream[pos];
            pos += 1;
            match flag {
                FLAG_LITERAL => {
                    pos += 1;
                    tokens.push((flag, 0, 0));
                }
                FLAG_MATCH => {
                    let offset = u16::from_be_bytes([stream[pos], stream[pos + 1]]);
                    let len = stream[pos + 2];
                    pos += 3;
                    tokens.push((flag, offset, len));
                }
                _ => panic!("unknown flag byte {:#04x}", flag),
            }
        }
        tokens
    }

    #[test]
    fn test_new_rejects_bad_configuration() {
        assert!(Lz77Compression::new(0, 18).is_err());
        assert!(Lz77Compression::new(4096, 0).is_err());
        assert!(Lz77Compression::new(1 << 17, 18).is_err());
        assert!(Lz77Compression::new(4096, 18).is_ok());
    }

    #[test]
    fn test_round_trip_empty() {
        let codec = Lz77Compression::default();
        let compressed = codec.compress(&[]).unwrap();
        assert!(compressed.is_empty());
        assert_eq!(codec.decompress(&compressed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_round_trip_single_byte() {
        let codec = Lz77Compression::default();
        let input = vec![0x42];
        let compressed = codec.compress(&input).unwrap();
        assert_eq!(compressed, vec![FLAG_LITERAL, 0x42]);
        assert_eq!(codec.decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_round_trip_all_byte_values() {
        let codec = Lz77Compression::default();
        let input: Vec<u8> = (0..=255u8).collect();
        let compressed = codec.compress(&input).unwrap();
        assert_eq!(codec.decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_repetition_produces_match_tokens() {
        let codec = Lz77Compression::new(8, 8).unwrap();
        let input = b"ABABABAB".to_vec();
        let compressed = codec.compress(&input).unwrap();
        let tokens = parse_tokens(&compressed);
        assert!(
            tokens.iter().any(|&(flag, _, _)| flag == FLAG_MATCH),
            "periodic input must compress to at least one match token"
        );
        assert_eq!(codec.decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_self_overlapping_match() {
        let codec = Lz77Compression::default();
        let input = vec![0x42; 10];
        let compressed = codec.compress(&input).unwrap();
        let tokens = parse_tokens(&compressed);
        assert!(
            tokens
                .iter()
                .any(|&(flag, offset, len)| flag == FLAG_MATCH && (offset as usize) < len as usize),
            "a run must produce a match that overlaps its own output"
        );
        assert_eq!(codec.decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_ties_prefer_oldest_window_position() {
        // "abcXabcYabc": the final "abc" matches at both offsets 8 and 4;
        // the scan must keep the first (oldest) candidate it saw.
        let codec = Lz77Compression::default();
        let compressed = codec.compress(b"abcXabcYabc").unwrap();
        let tokens = parse_tokens(&compressed);
        let matches: Vec<_> = tokens
            .iter()
            .filter(|&&(flag, _, _)| flag == FLAG_MATCH)
            .collect();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0], &(FLAG_MATCH, 4, 3));
        assert_eq!(matches[1], &(FLAG_MATCH, 8, 3));
    }

    #[test]
    fn test_match_length_respects_lookahead_cap() {
        let codec = Lz77Compression::new(4096, 4).unwrap();
        let input = vec![0x7F; 64];
        let compressed = codec.compress(&input).unwrap();
        let tokens = parse_tokens(&compressed);
        assert!(tokens
            .iter()
            .all(|&(flag, _, len)| flag == FLAG_LITERAL || len <= 4));
        assert_eq!(codec.decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_round_trip_random_small_alphabet() {
        // A small alphabet forces plenty of matches.
        let codec = Lz77Compression::default();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let input: Vec<u8> = (0..8192).map(|_| rng.gen_range(0..4u8)).collect();
        let compressed = codec.compress(&input).unwrap();
        assert_eq!(codec.decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_window_bound_is_respected() {
        // With a 4-byte window the repeat at distance 8 is out of reach.
        let codec = Lz77Compression::new(4, 8).unwrap();
        let input = b"abcdefghabcdefgh".to_vec();
        let compressed = codec.compress(&input).unwrap();
        assert!(parse_tokens(&compressed)
            .iter()
            .all(|&(flag, offset, _)| flag == FLAG_LITERAL || offset <= 4));
        assert_eq!(codec.decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_decompress_stops_on_zero_offset() {
        let codec = Lz77Compression::default();
        let stream = [
            FLAG_LITERAL, b'x', // good token
            FLAG_MATCH, 0x00, 0x00, 0x03, // offset 0 is invalid
            FLAG_LITERAL, b'y', // never reached
        ];
        assert_eq!(codec.decompress(&stream).unwrap(), b"x");
    }

    #[test]
    fn test_decompress_stops_on_offset_past_output() {
        let codec = Lz77Compression::default();
        let stream = [FLAG_LITERAL, b'x', FLAG_MATCH, 0x00, 0x05, 0x03];
        assert_eq!(codec.decompress(&stream).unwrap(), b"x");
    }

    #[test]
    fn test_decompress_stops_on_unknown_flag() {
        let codec = Lz77Compression::default();
        let stream = [FLAG_LITERAL, b'x', 0x7F, b'y'];
        assert_eq!(codec.decompress(&stream).unwrap(), b"x");
    }

    #[test]
    fn test_decompress_stops_on_truncated_token() {
        let codec = Lz77Compression::default();
        // Match token missing its length byte.
        let stream = [FLAG_LITERAL, b'x', FLAG_MATCH, 0x00, 0x01];
        assert_eq!(codec.decompress(&stream).unwrap(), b"x");
        // Literal token missing its data byte.
        let stream = [FLAG_LITERAL, b'x', FLAG_LITERAL];
        assert_eq!(codec.decompress(&stream).unwrap(), b"x");
    }
}
