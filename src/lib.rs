pub mod compression;
pub mod error;
pub mod io;

pub use compression::{huffman, lz77, rle, Compression};
pub use error::{Error, Result};
