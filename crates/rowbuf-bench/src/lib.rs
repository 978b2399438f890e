//! Benchmark utilities for the rowbuf buffer engine.
//!
//! Provides deterministic input generators shared by the criterion targets,
//! so benches compare like for like across runs.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rowbuf::RawBuf;

/// Deterministic pseudo-random bytes (xorshift64) for benchmark inputs.
///
/// Not cryptographic; stable for a given seed.
pub fn pseudo_random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed | 1;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        out.push(state as u8);
    }
    out
}

/// Build a buffer by appending `count` chunks of `chunk_len` seeded bytes.
pub fn build_chunked(seed: u64, chunk_len: usize, count: usize) -> RawBuf {
    let chunk = pseudo_random_bytes(seed, chunk_len);
    let mut buf = RawBuf::new();
    for _ in 0..count {
        buf = buf.append(&chunk);
    }
    buf
}
