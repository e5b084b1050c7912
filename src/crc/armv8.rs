//! AArch64 CRC extension backend (`crc32cb`/`crc32cx` instructions).

use core::arch::aarch64::{__crc32cb, __crc32cd};

/// Compute CRC32C using the hardware instructions.
///
/// # Safety
///
/// The caller must have verified that the CPU supports the CRC
/// extension.
#[target_feature(enable = "crc")]
pub unsafe fn crc32c(data: &[u8]) -> u32 {
    let mut crc = !0u32;

    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        // chunks_exact guarantees 8 bytes.
        let word = u64::from_le(core::ptr::read_unaligned(chunk.as_ptr() as *const u64));
        crc = __crc32cd(crc, word);
    }
    for &byte in chunks.remainder() {
        crc = __crc32cb(crc, byte);
    }

    !crc
}
