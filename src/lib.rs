//! # huffrle
//!
//! A pure Rust lossless compression library combining canonical Huffman
//! coding with a run-length encoding specialized for runs of the zero
//! byte.
//!
//! The codec targets sparse and low-entropy buffers — vertex and index
//! arrays, depth buffers, serialized game state — where a single-pass,
//! allocation-light format decodes faster than general-purpose deflate
//! at comparable ratios.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffrle::{decode, encode, max_compressed_size, verify};
//!
//! let input = b"aaaaaaaa\0\0\0\0\0\0\0\0bbbbbbbb";
//!
//! let mut compressed = vec![0u8; max_compressed_size(input.len())];
//! let size = encode(input, &mut compressed)?;
//! compressed.truncate(size);
//!
//! let decoded_size = verify(&compressed)?;
//! let mut output = vec![0u8; decoded_size];
//! decode(&compressed, &mut output)?;
//! assert_eq!(&output, input);
//! # Ok::<(), huffrle::HzError>(())
//! ```
//!
//! ## Format
//!
//! A compressed artifact is a 4-byte master header (the decoded length)
//! followed by independently framed blocks of at most 65536 decoded
//! bytes. Every block carries its own CRC32C and one of three body
//! modes: Huffman + RLE, plain copy (the fallback when entropy coding
//! does not pay off), or a one-byte fill. [`verify`] checks the frame
//! structure and checksums without decompressing.
//!
//! ## Performance
//!
//! - One pass over the input per direction, no heap allocation inside
//!   the codec; all working state lives on the stack
//! - Code words of eight bits or less resolve through a 256-entry
//!   lookup table in a single step
//! - Block checksums use the SSE 4.2 / ARMv8 CRC instructions when the
//!   CPU has them

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bitstream;
pub mod crc;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod huffman;

// Re-export the one-shot API
pub use decode::{decode, verify};
pub use encode::{encode, max_compressed_size};
pub use error::{HzError, Result};
pub use format::{BlockMode, BLOCK_HEADER_SIZE, MASTER_HEADER_SIZE, MAX_BLOCK_SIZE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_public_api_round_trip() {
        let input = vec![0u8; 500];
        let mut compressed = vec![0u8; max_compressed_size(input.len())];
        let size = encode(&input, &mut compressed).unwrap();
        compressed.truncate(size);
        assert!(size < 20);

        let decoded_size = verify(&compressed).unwrap();
        assert_eq!(decoded_size, input.len());
        let mut output = vec![0u8; decoded_size];
        decode(&compressed, &mut output).unwrap();
        assert_eq!(output, input);
    }
}
