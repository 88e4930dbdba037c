//! Deterministic seed derivation.
//!
//! Independent random streams inside a block are derived from the block seed
//! with a SplitMix64 finalizer so that nearby seeds do not produce correlated
//! streams.

/// Stream used by the opportunity generator.
pub const STREAM_AUDIENCE: u64 = 0xA0D1_E4CE;
/// Stream used by per-seller policy randomness.
pub const STREAM_POLICY: u64 = 0x90_11C7;

/// Mix `base` and `stream` into a new seed.
#[inline]
pub fn derive_seed(base: u64, stream: u64) -> u64 {
    let mut z = base ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
