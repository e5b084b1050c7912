//! CRC32C (Castagnoli) computation for block integrity.
//!
//! The wire format checksums every encoded block body with CRC32C
//! (polynomial 0x1EDC6F41, reflected, init and xor-out `0xFFFFFFFF`).
//!
//! A table-driven scalar implementation is always available. On x86-64
//! the SSE 4.2 `crc32` instruction is used when the CPU supports it; on
//! AArch64 the CRC extension is used. Hardware support is probed once
//! and cached; all backends are bit-exact with the scalar baseline.

#[cfg(target_arch = "aarch64")]
mod armv8;
#[cfg(target_arch = "x86_64")]
mod sse42;

use bitflags::bitflags;
use once_cell::sync::Lazy;

/// Reflected form of the Castagnoli polynomial 0x1EDC6F41.
const POLYNOMIAL: u32 = 0x82F63B78;

/// Buffers shorter than this always take the scalar path; below one
/// word-sized chunk the hardware variants have nothing to accelerate.
const MIN_HW_LEN: usize = 16;

/// CRC32C lookup table (256 x u32), one entry per byte value.
static CRC32C_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

bitflags! {
    /// CPU features relevant to checksum acceleration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CpuFeatures: u32 {
        /// x86-64 SSE 4.2 (`crc32` instruction).
        const SSE4_2 = 1 << 0;
        /// AArch64 CRC32 extension.
        const ARMV8_CRC = 1 << 1;
    }
}

/// Detected CPU features, probed once on first use. Concurrent first
/// accesses all compute the same value, so the race is benign.
static CPU_FEATURES: Lazy<CpuFeatures> = Lazy::new(detect_features);

fn detect_features() -> CpuFeatures {
    let mut features = CpuFeatures::empty();
    #[cfg(target_arch = "x86_64")]
    if std::arch::is_x86_feature_detected!("sse4.2") {
        features |= CpuFeatures::SSE4_2;
    }
    #[cfg(target_arch = "aarch64")]
    if std::arch::is_aarch64_feature_detected!("crc") {
        features |= CpuFeatures::ARMV8_CRC;
    }
    features
}

/// The CPU features the checksum dispatcher will use.
pub fn cpu_features() -> CpuFeatures {
    *CPU_FEATURES
}

/// Compute the CRC32C of a byte slice.
pub fn crc32c(data: &[u8]) -> u32 {
    if data.len() >= MIN_HW_LEN {
        #[cfg(target_arch = "x86_64")]
        if CPU_FEATURES.contains(CpuFeatures::SSE4_2) {
            // Safety: the SSE 4.2 feature was verified at runtime.
            return unsafe { sse42::crc32c(data) };
        }
        #[cfg(target_arch = "aarch64")]
        if CPU_FEATURES.contains(CpuFeatures::ARMV8_CRC) {
            // Safety: the CRC feature was verified at runtime.
            return unsafe { armv8::crc32c(data) };
        }
    }
    crc32c_scalar(data)
}

/// Table-driven scalar CRC32C, the portable baseline.
pub fn crc32c_scalar(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in data {
        let index = ((crc as u8) ^ byte) as usize;
        crc = (crc >> 8) ^ CRC32C_TABLE[index];
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32c_empty() {
        assert_eq!(crc32c_scalar(&[]), 0);
        assert_eq!(crc32c(&[]), 0);
    }

    #[test]
    fn test_crc32c_check_vector() {
        // The standard CRC32C check value.
        assert_eq!(crc32c_scalar(b"123456789"), 0xE3069283);
    }

    #[test]
    fn test_crc32c_all_zeros() {
        assert_eq!(crc32c_scalar(&[0u8; 32]), crc32c(&[0u8; 32]));
        assert_ne!(crc32c_scalar(&[0u8; 32]), 0);
    }

    #[test]
    fn test_crc32c_single_bit_sensitivity() {
        let mut data = vec![0u8; 64];
        let base = crc32c_scalar(&data);
        data[40] ^= 0x10;
        assert_ne!(crc32c_scalar(&data), base);
    }

    #[test]
    fn test_hardware_matches_scalar() {
        // Exercises whichever backend the dispatcher picks on this
        // machine, across alignment offsets and the short-buffer cutoff.
        let data: Vec<u8> = (0..1024u32).map(|i| (i * 31 + 7) as u8).collect();
        for start in 0..8 {
            for len in [0, 1, 7, 8, 15, 16, 17, 63, 255, 1000] {
                let slice = &data[start..start + len];
                assert_eq!(crc32c(slice), crc32c_scalar(slice));
            }
        }
    }
}
