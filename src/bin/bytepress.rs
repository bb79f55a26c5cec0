//! Command-line front end: picks a codec and mode, wires file I/O to the
//! compression contract.
//!
//! ```text
//! bytepress <algorithm: huffman|lz77|rle> <mode: c|d> <input> <output>
//! ```
//!
//! Exits 0 on success, 1 on a usage error, unknown algorithm or mode, or
//! an I/O failure.

use bytepress::compression::{Compression, HuffmanCompression, Lz77Compression, RleCompression};
use bytepress::io::{read_file, write_file};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        let name = args.first().map(String::as_str).unwrap_or("bytepress");
        eprintln!(
            "Usage: {} <algorithm: huffman|lz77|rle> <mode: c|d> <input> <output>",
            name
        );
        return ExitCode::FAILURE;
    }

    let codec: Box<dyn Compression> = match args[1].as_str() {
        "huffman" => Box::new(HuffmanCompression),
        "lz77" => Box::new(Lz77Compression::default()),
        "rle" => Box::new(RleCompression),
        other => {
            eprintln!("Unknown algorithm: {}", other);
            return ExitCode::FAILURE;
        }
    };

    let mode = args[2].as_str();
    if mode != "c" && mode != "d" {
        eprintln!("Unknown mode: {} (use c to compress, d to decompress)", mode);
        return ExitCode::FAILURE;
    }

    let input = match read_file(&args[3]) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Error reading {}: {}", args[3], err);
            return ExitCode::FAILURE;
        }
    };

    let result = if mode == "c" {
        codec.compress(&input)
    } else {
        codec.decompress(&input)
    };
    let output = match result {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Error processing {}: {}", args[3], err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = write_file(&args[4], &output) {
        eprintln!("Error writing {}: {}", args[4], err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
