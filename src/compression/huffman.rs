//! Huffman coding implementation.
//!
//! Huffman coding is an entropy coding method that assigns short bit
//! sequences to frequent symbols and longer ones to rare symbols. This
//! implementation works on raw bytes and produces a self-describing
//! container: the per-symbol frequency table travels with the payload, and
//! both sides rebuild the same tree from it.
//!
//! This implementation provides:
//! - Deterministic tree construction, reproducible from the frequency
//!   table alone
//! - MSB-first bit packing with an explicit trailing pad-bit count
//! - Soft-failing decoding that returns a partial buffer on truncated or
//!   corrupted input instead of erroring
//!
//! # Container Layout
//!
//! ```text
//! [u16 symbol count]
//! [symbol count x (u8 symbol, u64 frequency)]
//! [u64 original length]
//! [u8 pad bit count]
//! [packed code bits, MSB-first]
//! ```
//!
//! Multi-byte integers are little-endian. The tree itself is never
//! serialized: encoder and decoder both merge nodes smallest-first by
//! (frequency, representative symbol), so they arrive at identical trees
//! and therefore identical codes.

use crate::compression::{read_u16_le, read_u64_le, read_u8, Compression, Result};
use bitvec::prelude::*;
use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Huffman codec over single-byte symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCompression;

/// A bit sequence assigned to one symbol.
type Code = BitVec<u8, Msb0>;

/// A node in the Huffman tree arena.
///
/// The tree lives in a flat vector; `Internal` children are indices into
/// that vector. Internal nodes carry the minimum symbol of their subtree
/// as a representative so that nodes still order deterministically when
/// frequencies tie.
#[derive(Debug, Clone)]
enum Node {
    /// A leaf holds a symbol and its frequency.
    Leaf { symbol: u8, freq: u64 },
    /// An internal node aggregates the frequency of its two children.
    Internal { freq: u64, left: usize, right: usize },
}

impl Node {
    /// Returns the frequency of the node.
    fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }
}

/// Huffman tree built bottom-up into an arena, discarded with the call
/// that built it.
#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
    root: usize,
}

/// A helper wrapper for heap ordering during tree construction.
/// We want the node with the smallest (frequency, symbol) key to have
/// highest priority.
#[derive(Debug, Clone, Eq, PartialEq)]
struct HeapEntry {
    freq: u64,
    symbol: u8,
    node: usize,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse: lower frequency should come first, ties broken by the
        // lower representative symbol.
        other
            .freq
            .cmp(&self.freq)
            .then_with(|| other.symbol.cmp(&self.symbol))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build a frequency table counting each byte value in `input`.
fn build_frequency_table(input: &[u8]) -> [u64; 256] {
    let mut freq = [0u64; 256];
    for &byte in input {
        freq[byte as usize] += 1;
    }
    freq
}

/// Build the Huffman tree for a frequency table.
///
/// Leaves are seeded in ascending symbol order, then the two
/// smallest-keyed nodes are repeatedly merged until one root remains. The
/// first node popped becomes the left child. Live nodes own disjoint
/// symbol sets, so their representative symbols are pairwise distinct and
/// the (frequency, symbol) key is a total order: construction is fully
/// deterministic.
///
/// Returns `None` if no symbol has a non-zero frequency. A table with one
/// distinct symbol produces a tree that is a single leaf.
fn build_tree(freq: &[u64; 256]) -> Option<Tree> {
    let mut nodes = Vec::new();
    let mut heap = BinaryHeap::new();
    for (symbol, &count) in freq.iter().enumerate() {
        if count > 0 {
            nodes.push(Node::Leaf {
                symbol: symbol as u8,
                freq: count,
            });
            heap.push(HeapEntry {
                freq: count,
                symbol: symbol as u8,
                node: nodes.len() - 1,
            });
        }
    }
    if heap.is_empty() {
        return None;
    }
    while heap.len() > 1 {
        let first = heap.pop()?;
        let second = heap.pop()?;
        // Saturating: frequencies from a hostile header must not overflow.
        let merged_freq = first.freq.saturating_add(second.freq);
        nodes.push(Node::Internal {
            freq: merged_freq,
            left: first.node,
            right: second.node,
        });
        heap.push(HeapEntry {
            freq: merged_freq,
            symbol: first.symbol.min(second.symbol),
            node: nodes.len() - 1,
        });
    }
    let root = heap.pop()?.node;
    Some(Tree { nodes, root })
}

/// Build the code table mapping each symbol to its bit sequence via
/// root-to-leaf traversal (left edge = 0, right edge = 1).
///
/// If the tree is a single leaf (one distinct symbol), that symbol gets
/// the one-bit code `0`.
fn build_code_table(tree: &Tree) -> Vec<Code> {
    let mut table = vec![Code::new(); 256];
    let mut prefix = Code::new();
    assign_codes(&tree.nodes, tree.root, &mut prefix, &mut table);
    table
}

fn assign_codes(nodes: &[Node], index: usize, prefix: &mut Code, table: &mut [Code]) {
    match &nodes[index] {
        Node::Leaf { symbol, .. } => {
            table[*symbol as usize] = if prefix.is_empty() {
                bitvec![u8, Msb0; 0]
            } else {
                prefix.clone()
            };
        }
        Node::Internal { left, right, .. } => {
            let (left, right) = (*left, *right);
            prefix.push(false);
            assign_codes(nodes, left, prefix, table);
            prefix.pop();
            prefix.push(true);
            assign_codes(nodes, right, prefix, table);
            prefix.pop();
        }
    }
}

impl Compression for HuffmanCompression {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();

        // Empty input still gets a parseable header: zero symbols, zero
        // original length, no pad byte, no payload.
        if data.is_empty() {
            out.extend_from_slice(&0u16.to_le_bytes());
            out.extend_from_slice(&0u64.to_le_bytes());
            return Ok(out);
        }

        let freq = build_frequency_table(data);
        let Some(tree) = build_tree(&freq) else {
            // Non-empty input always yields at least one leaf.
            return Ok(out);
        };
        // The root aggregates every leaf, so its frequency is the input length.
        debug_assert_eq!(tree.nodes[tree.root].freq(), data.len() as u64);
        let codes = build_code_table(&tree);

        let symbol_count = freq.iter().filter(|&&count| count > 0).count();
        out.extend_from_slice(&(symbol_count as u16).to_le_bytes());
        for (symbol, &count) in freq.iter().enumerate() {
            if count > 0 {
                out.push(symbol as u8);
                out.extend_from_slice(&count.to_le_bytes());
            }
        }
        out.extend_from_slice(&(data.len() as u64).to_le_bytes());

        let mut bits: Code = BitVec::with_capacity(data.len() * 4);
        for &byte in data {
            bits.extend_from_bitslice(&codes[byte as usize]);
        }
        let pad_bits = (8 - bits.len() % 8) % 8;
        for _ in 0..pad_bits {
            bits.push(false);
        }
        out.push(pad_bits as u8);
        out.extend_from_slice(bits.as_raw_slice());

        debug!(
            "huffman compress: {} distinct symbols, {} bytes in, {} bytes out",
            symbol_count,
            data.len(),
            out.len()
        );
        Ok(out)
    }

    /// Decode a Huffman container.
    ///
    /// Parsing fails soft: any truncation returns the bytes decoded so
    /// far (possibly none) rather than an error. A well-formed container
    /// decodes to exactly the recorded original length; a shorter result
    /// signals a corrupted payload and is left for the caller to detect.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut pos = 0usize;

        let Some(symbol_count) = read_u16_le(data, &mut pos) else {
            return Ok(out);
        };

        let mut freq = [0u64; 256];
        for _ in 0..symbol_count {
            let Some(symbol) = read_u8(data, &mut pos) else {
                return Ok(out);
            };
            let Some(count) = read_u64_le(data, &mut pos) else {
                return Ok(out);
            };
            freq[symbol as usize] = count;
        }

        let Some(original_len) = read_u64_le(data, &mut pos) else {
            return Ok(out);
        };
        if symbol_count == 0 && original_len == 0 {
            return Ok(out);
        }

        // Rebuild with the identical merge procedure the encoder used;
        // the resulting tree must match it exactly for the codes to agree.
        let Some(tree) = build_tree(&freq) else {
            return Ok(out);
        };

        let Some(pad_bits) = read_u8(data, &mut pos) else {
            return Ok(out);
        };

        let bits = data[pos..].view_bits::<Msb0>();
        let data_bits = if (pad_bits as usize) <= bits.len() {
            &bits[..bits.len() - pad_bits as usize]
        } else {
            bits
        };

        if let Node::Leaf { symbol, .. } = &tree.nodes[tree.root] {
            // Single distinct symbol: every bit is its one-bit code.
            let count = (data_bits.len() as u64).min(original_len);
            for _ in 0..count {
                out.push(*symbol);
            }
            return Ok(out);
        }

        let mut produced: u64 = 0;
        let mut node = tree.root;
        for bit in data_bits.iter().by_vals() {
            if let Node::Internal { left, right, .. } = &tree.nodes[node] {
                node = if bit { *right } else { *left };
            }
            if let Node::Leaf { symbol, .. } = &tree.nodes[node] {
                out.push(*symbol);
                produced += 1;
                if produced == original_len {
                    break;
                }
                node = tree.root;
            }
        }

        if produced < original_len {
            debug!(
                "huffman decompress: produced {} of {} recorded bytes",
                produced, original_len
            );
        }
        Ok(out)
    }
}
