//! One-shot verification and decoding.
//!
//! [`verify`] walks the block headers and checks each body's CRC32C
//! without touching the compressed payload semantically; it is the
//! cheap way to size the output buffer and reject corrupt artifacts.
//! [`decode`] reconstructs the original bytes, never trusting a length
//! field without bounds-checking it against the input first.

use crate::bitstream::BitReader;
use crate::crc::crc32c;
use crate::error::{HzError, Result};
use crate::format::{
    tier_for_symbol, BlockMode, MASTER_HEADER_SIZE, MAX_BLOCK_SIZE,
};
use crate::huffman::{DecodeTree, LUT_NO_NODE};

/// The fast decode loop runs while at least this many bytes remain in
/// the block: the worst-case symbol is a 32-bit code plus 14 extra bits
/// (6 bytes), and the bit cache looks four bytes ahead.
const FAST_LOOP_MARGIN: usize = 10;

/// Check that `input` is a structurally valid artifact and return its
/// decoded length.
///
/// Headers are parsed, modes validated, and every block body's CRC32C
/// compared against its header field. Compressed bodies are not
/// otherwise inspected, so a later [`decode`] can still fail on inputs
/// that never came from a conforming encoder.
pub fn verify(input: &[u8]) -> Result<usize> {
    let mut reader = BitReader::new(input);

    let decoded_size = reader.read_bits_checked(32) as usize;
    if reader.failed() {
        return Err(HzError::TruncatedInput("master header"));
    }

    let mut remaining = decoded_size;
    while remaining > 0 {
        let encoded_size = reader.read_bits_checked(16) as usize + 1;
        let expected_crc = reader.read_bits_checked(32);
        let mode = reader.read_bits_checked(8) as u8;
        if reader.failed() {
            return Err(HzError::TruncatedInput("block header"));
        }
        BlockMode::from_u8(mode)?;

        let body = reader.remaining_slice();
        if encoded_size > body.len() {
            return Err(HzError::TruncatedInput("block body"));
        }
        let actual_crc = crc32c(&body[..encoded_size]);
        if actual_crc != expected_crc {
            return Err(HzError::ChecksumMismatch {
                expected: expected_crc,
                actual: actual_crc,
            });
        }

        reader.advance_bytes_checked(encoded_size);
        if reader.failed() {
            return Err(HzError::TruncatedInput("block body"));
        }

        remaining -= remaining.min(MAX_BLOCK_SIZE);
    }

    Ok(decoded_size)
}

/// Decode `input` into `output`.
///
/// `output` must be at least as large as the decoded length reported by
/// [`verify`]; bytes beyond that length are left untouched.
pub fn decode(input: &[u8], output: &mut [u8]) -> Result<()> {
    if input.len() < MASTER_HEADER_SIZE {
        return Err(HzError::TruncatedInput("master header"));
    }

    let mut reader = BitReader::new(input);
    let decoded_size = reader.read_bits_checked(32) as usize;
    if reader.failed() {
        return Err(HzError::TruncatedInput("master header"));
    }
    if output.len() < decoded_size {
        return Err(HzError::OutputTooSmall {
            needed: decoded_size,
            available: output.len(),
        });
    }

    let mut offset = 0usize;
    while offset < decoded_size {
        let block_size = (decoded_size - offset).min(MAX_BLOCK_SIZE);
        decode_block(&mut reader, &mut output[offset..offset + block_size])?;
        offset += block_size;
    }

    if !reader.at_end() {
        return Err(HzError::SizeMismatch("trailing data after final block"));
    }

    Ok(())
}

/// Decode one block into its output span.
fn decode_block(reader: &mut BitReader, out: &mut [u8]) -> Result<()> {
    let encoded_size = reader.read_bits_checked(16) as usize + 1;
    let _crc = reader.read_bits_checked(32);
    let mode = reader.read_bits_checked(8) as u8;
    if reader.failed() {
        return Err(HzError::TruncatedInput("block header"));
    }

    match BlockMode::from_u8(mode)? {
        BlockMode::Copy => {
            if encoded_size != out.len() {
                return Err(HzError::SizeMismatch("copy block length"));
            }
            let body = reader.remaining_slice();
            if out.len() > body.len() {
                return Err(HzError::TruncatedInput("copy block body"));
            }
            out.copy_from_slice(&body[..out.len()]);
            reader.advance_bytes_checked(out.len());
            debug_assert!(!reader.failed());
            Ok(())
        }
        BlockMode::Fill => {
            let fill_value = reader.read_bits_checked(8) as u8;
            if reader.failed() {
                return Err(HzError::TruncatedInput("fill block body"));
            }
            out.fill(fill_value);
            Ok(())
        }
        BlockMode::HuffRle => {
            let body = reader.remaining_slice();
            if encoded_size > body.len() {
                return Err(HzError::TruncatedInput("block body"));
            }

            let mut block = BitReader::new(&body[..encoded_size]);
            let tree = DecodeTree::recover(&mut block)?;
            decode_body(&tree, &mut block, out)?;

            reader.advance_bytes_checked(encoded_size);
            debug_assert!(!reader.failed());
            Ok(())
        }
    }
}

/// Decode the symbol stream of one HUFF_RLE block.
fn decode_body(tree: &DecodeTree, block: &mut BitReader, out: &mut [u8]) -> Result<()> {
    let mut out_pos = 0usize;

    // Fast loop: plenty of input margin, so code and extra-bit reads
    // skip their bounds checks and the LUT resolves short codes in one
    // step.
    let fast_end = block.len().saturating_sub(FAST_LOOP_MARGIN);
    while block.byte_pos() < fast_end {
        let entry = tree.lut[block.peek8() as usize];
        block.advance(entry.bits as u32);

        let symbol = if entry.node == LUT_NO_NODE {
            entry.symbol
        } else {
            // Code longer than 8 bits: walk the tree from the branch
            // the prefix landed on.
            let mut idx = entry.node;
            loop {
                let node = tree.node(idx);
                if node.symbol >= 0 {
                    break node.symbol as u16;
                }
                if block.byte_pos() >= block.len() {
                    return Err(HzError::TruncatedInput("code stream"));
                }
                idx = if block.read_bit() != 0 {
                    node.child_b
                } else {
                    node.child_a
                };
            }
        };

        if symbol <= 255 {
            if out_pos >= out.len() {
                return Err(HzError::OutputOverflow("literal past block end"));
            }
            out[out_pos] = symbol as u8;
            out_pos += 1;
        } else {
            let tier = tier_for_symbol(symbol).ok_or(HzError::InvalidSymbol(symbol))?;
            let mut zeros = tier.base;
            if tier.extra_bits > 0 {
                zeros += block.read_bits(tier.extra_bits) as usize;
            }
            if out_pos + zeros > out.len() {
                return Err(HzError::OutputOverflow("zero run past block end"));
            }
            out[out_pos..out_pos + zeros].fill(0);
            out_pos += zeros;
        }
    }

    // Tail loop: every read and every output store is checked.
    while out_pos < out.len() {
        let mut idx = tree.root;

        // A lone-leaf tree still consumes one bit per symbol.
        if tree.node(idx).symbol >= 0 {
            block.advance_checked(1);
            if block.failed() {
                return Err(HzError::TruncatedInput("code stream"));
            }
        }
        while tree.node(idx).symbol < 0 {
            let bit = block.read_bit_checked();
            if block.failed() {
                return Err(HzError::TruncatedInput("code stream"));
            }
            let node = tree.node(idx);
            idx = if bit != 0 { node.child_b } else { node.child_a };
        }
        let symbol = tree.node(idx).symbol as u16;

        if symbol <= 255 {
            out[out_pos] = symbol as u8;
            out_pos += 1;
        } else {
            let tier = tier_for_symbol(symbol).ok_or(HzError::InvalidSymbol(symbol))?;
            let mut zeros = tier.base;
            if tier.extra_bits > 0 {
                zeros += block.read_bits_checked(tier.extra_bits) as usize;
            }
            if block.failed() {
                return Err(HzError::TruncatedInput("zero run length"));
            }
            if out_pos + zeros > out.len() {
                return Err(HzError::OutputOverflow("zero run past block end"));
            }
            out[out_pos..out_pos + zeros].fill(0);
            out_pos += zeros;
        }
    }

    Ok(())
}
