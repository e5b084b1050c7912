//! One-shot encoder: block splitting, mode selection, and emission.
//!
//! Each 65536-byte input chunk becomes one block. The encoder tries
//! Huffman + RLE first inside a write limit sized to the block's COPY
//! footprint; if the attempt overruns, it rewinds to the block start
//! and emits a plain copy instead. Blocks whose histogram collapses to
//! a single code are emitted as one-byte fills.

use byteorder::{ByteOrder, LittleEndian};

use crate::bitstream::BitWriter;
use crate::crc::crc32c;
use crate::error::{HzError, Result};
use crate::format::{
    run_tier, scan_zero_run, BlockMode, BLOCK_HEADER_SIZE, MASTER_HEADER_SIZE, MAX_BLOCK_SIZE,
};
use crate::huffman::{build_tree, SymbolTable};

/// Upper bound on the encoded size of any input of `uncompressed_size`
/// bytes: master header, one block header per 65536-byte chunk, and the
/// input itself (the COPY fallback never exceeds the chunk size).
pub fn max_compressed_size(uncompressed_size: usize) -> usize {
    let mut size = MASTER_HEADER_SIZE;
    if uncompressed_size > 0 {
        let num_blocks = (uncompressed_size + MAX_BLOCK_SIZE - 1) / MAX_BLOCK_SIZE;
        size += num_blocks * BLOCK_HEADER_SIZE + uncompressed_size;
    }
    size
}

/// Compress `input` into `output`, returning the encoded length.
///
/// `output` should be sized with [`max_compressed_size`]; smaller
/// buffers are accepted as long as the encoded data happens to fit.
pub fn encode(input: &[u8], output: &mut [u8]) -> Result<usize> {
    if input.len() > u32::MAX as usize {
        return Err(HzError::InvalidArgument("input exceeds 2^32 - 1 bytes"));
    }
    if output.len() < MASTER_HEADER_SIZE {
        return Err(HzError::OutputTooSmall {
            needed: MASTER_HEADER_SIZE,
            available: output.len(),
        });
    }

    let mut writer = BitWriter::new(output);
    writer.write_bits(input.len() as u32, 32);
    writer.force_flush();

    for block in input.chunks(MAX_BLOCK_SIZE) {
        encode_block(&mut writer, block)?;
    }

    Ok(writer.byte_pos())
}

/// Encode one block, choosing FILL, HUFF_RLE, or the COPY fallback.
fn encode_block(writer: &mut BitWriter, block: &[u8]) -> Result<()> {
    let mut symbols = SymbolTable::histogram(block);

    if symbols.single_code() {
        return encode_fill(writer, block);
    }

    // Optimistic Huffman attempt, confined to the space a COPY block
    // would use so an unprofitable encoding fails fast.
    let saved = writer.state();
    let block_start = writer.byte_pos();
    writer.set_end(block_start + BLOCK_HEADER_SIZE + block.len());

    if block_start + BLOCK_HEADER_SIZE > writer.end() {
        writer.restore(saved);
        return Err(HzError::OutputTooSmall {
            needed: block_start + BLOCK_HEADER_SIZE,
            available: writer.end(),
        });
    }

    // Header placeholder, back-patched once the body size is known.
    writer.write_bits(0, 16);
    writer.write_bits(0, 32);
    writer.write_bits(0, 8);

    build_tree(&mut symbols, writer);
    if writer.failed() {
        writer.restore(saved);
        return plain_copy(writer, block);
    }

    let mut k = 0;
    while k < block.len() {
        let byte = block[k];
        if byte == 0 {
            let zeros = scan_zero_run(block, k);
            if zeros == 1 {
                let info = symbols.entry(0);
                writer.write_bits(info.code, info.bits);
            } else {
                let tier = run_tier(zeros);
                let info = symbols.entry(tier.symbol);
                writer.write_bits(info.code, info.bits);
                if tier.extra_bits > 0 {
                    writer.write_bits((zeros - tier.base) as u32, tier.extra_bits);
                }
            }
            k += zeros;
        } else {
            let info = symbols.entry(byte as u16);
            writer.write_bits(info.code, info.bits);
            k += 1;
        }

        if writer.failed() {
            writer.restore(saved);
            return plain_copy(writer, block);
        }
    }

    writer.force_flush();

    let body_size = writer.byte_pos() - block_start - BLOCK_HEADER_SIZE;
    if writer.failed() || body_size >= MAX_BLOCK_SIZE {
        writer.restore(saved);
        return plain_copy(writer, block);
    }

    let body_start = block_start + BLOCK_HEADER_SIZE;
    let crc = crc32c(&writer.written()[body_start..body_start + body_size]);

    let mut header = [0u8; BLOCK_HEADER_SIZE];
    LittleEndian::write_u16(&mut header[0..2], (body_size - 1) as u16);
    LittleEndian::write_u32(&mut header[2..6], crc);
    header[6] = BlockMode::HuffRle as u8;
    writer.patch_bytes(block_start, &header);

    writer.clear_end();
    Ok(())
}

/// Emit a block as a raw copy of its input bytes.
fn plain_copy(writer: &mut BitWriter, block: &[u8]) -> Result<()> {
    let needed = writer.byte_pos() + BLOCK_HEADER_SIZE + block.len();
    if needed > writer.end() {
        return Err(HzError::OutputTooSmall {
            needed,
            available: writer.end(),
        });
    }

    let crc = crc32c(block);

    writer.write_bits((block.len() - 1) as u32, 16);
    writer.write_bits(crc, 32);
    writer.write_bits(BlockMode::Copy as u32, 8);
    writer.force_flush();
    writer.write_bytes(block);

    debug_assert!(!writer.failed());
    Ok(())
}

/// Emit a block as a single replicated byte.
fn encode_fill(writer: &mut BitWriter, block: &[u8]) -> Result<()> {
    let needed = writer.byte_pos() + BLOCK_HEADER_SIZE + 1;
    if needed > writer.end() {
        return Err(HzError::OutputTooSmall {
            needed,
            available: writer.end(),
        });
    }

    // The encoded body is the fill byte itself.
    let crc = crc32c(&block[..1]);

    writer.write_bits(0, 16);
    writer.write_bits(crc, 32);
    writer.write_bits(BlockMode::Fill as u32, 8);
    writer.write_bits(block[0] as u32, 8);
    writer.force_flush();

    debug_assert!(!writer.failed());
    Ok(())
}
