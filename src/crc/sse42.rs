//! SSE 4.2 CRC32C backend (x86-64 `crc32` instruction).

use core::arch::x86_64::{_mm_crc32_u64, _mm_crc32_u8};

/// Compute CRC32C using the hardware instruction.
///
/// # Safety
///
/// The caller must have verified that the CPU supports SSE 4.2.
#[target_feature(enable = "sse4.2")]
pub unsafe fn crc32c(data: &[u8]) -> u32 {
    let mut crc = !0u64;

    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        // chunks_exact guarantees 8 bytes.
        let word = u64::from_le(core::ptr::read_unaligned(chunk.as_ptr() as *const u64));
        crc = _mm_crc32_u64(crc, word);
    }
    let mut crc = crc as u32;
    for &byte in chunks.remainder() {
        crc = _mm_crc32_u8(crc, byte);
    }

    !crc
}
