//! # Hashing
//!
//! [`Hasher`] implementations used for header hashes and slashing proof
//! digests.
//!
//! - `Blake3Hasher`: default, SIMD-accelerated BLAKE3.
//! - `Sha256Hasher`: for deployments that must match SHA-256 digests.

use sha2::{Digest, Sha256};
use shared_types::Hasher;

/// BLAKE3 output length.
pub const BLAKE3_LEN: usize = 32;

/// BLAKE3 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl Hasher for Blake3Hasher {
    fn compute(&self, data: &[u8]) -> Vec<u8> {
        blake3::hash(data).as_bytes().to_vec()
    }

    fn size(&self) -> usize {
        BLAKE3_LEN
    }
}

/// SHA-256 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn compute(&self, data: &[u8]) -> Vec<u8> {
        Sha256::digest(data).to_vec()
    }

    fn size(&self) -> usize {
        32
    }
}

/// Hash several inputs as one stream.
pub fn blake3_hash_many(inputs: &[&[u8]]) -> Vec<u8> {
    let mut hasher = blake3::Hasher::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize().as_bytes().to_vec()
}
