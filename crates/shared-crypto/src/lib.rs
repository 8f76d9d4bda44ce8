//! # Shared Crypto
//!
//! Concrete hashing and signing behind the `shared-types` ports.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | BLAKE3, SHA-256 | Header hashes, proof digests |
//! | `signatures` | Ed25519 | Commitment and transaction signing |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency
//! - **BLAKE3**: SIMD-accelerated, 5-10x faster than SHA-256
//! - Secret key bytes are zeroized when dropped

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{blake3_hash_many, Blake3Hasher, Sha256Hasher};
pub use signatures::Ed25519Signer;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
