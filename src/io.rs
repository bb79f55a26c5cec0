//! Whole-file I/O helpers.
//!
//! The codecs operate purely on in-memory buffers; these helpers load a
//! file fully into memory and write a buffer fully back out.

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Read an entire file into a byte buffer.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    Ok(fs::read(path)?)
}

/// Write a byte buffer to a file, replacing any existing content.
pub fn write_file<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    Ok(fs::write(path, data)?)
}
