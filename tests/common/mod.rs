//! Shared helpers for the integration tests: canonical datasets and a
//! small deterministic PRNG so failures reproduce exactly.

#![allow(dead_code)]

/// A 32-bit permuted congruential generator (PCG-RXS-M-XS). Tiny,
/// seedable, and plenty random for test data.
pub struct Pcg32 {
    state: u32,
    inc: u32,
}

impl Pcg32 {
    pub fn seed(seed: u32) -> Self {
        let mut rng = Self {
            state: seed.wrapping_add(0x9E37_79B9),
            inc: 0x2545_F491,
        };
        rng.next_u32();
        rng
    }

    pub fn next_u32(&mut self) -> u32 {
        let state = self.state;
        self.state = state.wrapping_mul(0xF132_83AD).wrapping_add(self.inc);
        let word = (state >> ((state >> 28) + 4)) ^ state;
        word.wrapping_mul(0x2770_92E5) ^ (word >> 22)
    }

    pub fn next_u8(&mut self) -> u8 {
        (self.next_u32() >> 24) as u8
    }
}

/// Uniform random bytes from a fixed seed.
pub fn random_bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut rng = Pcg32::seed(seed);
    (0..len).map(|_| rng.next_u8()).collect()
}

/// All zero bytes.
pub fn all_zeros(len: usize) -> Vec<u8> {
    vec![0u8; len]
}

/// All 0x01 bytes.
pub fn all_ones(len: usize) -> Vec<u8> {
    vec![1u8; len]
}

/// Sawtooth covering every byte value; nearly incompressible for this
/// codec once the blocks are full.
pub fn sawtooth(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i & 255) as u8).collect()
}

/// First half zeros, second half sawtooth.
pub fn half_zeros(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    for (i, byte) in data.iter_mut().enumerate().skip(len / 2) {
        *byte = (i & 255) as u8;
    }
    data
}

/// Sixteen-symbol low-entropy data.
pub fn low_entropy(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i & 15) as u8).collect()
}

/// Compress with a bound-sized buffer and truncate to the actual size.
pub fn encode_to_vec(input: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; huffrle::max_compressed_size(input.len())];
    let size = huffrle::encode(input, &mut out).expect("encode failed");
    assert!(
        size <= huffrle::max_compressed_size(input.len()),
        "encoded size exceeds the declared bound"
    );
    out.truncate(size);
    out
}

/// Full verify + decode, checking the reported size on the way.
pub fn decode_to_vec(compressed: &[u8]) -> Vec<u8> {
    let decoded_size = huffrle::verify(compressed).expect("verify failed");
    let mut out = vec![0u8; decoded_size];
    huffrle::decode(compressed, &mut out).expect("decode failed");
    out
}
