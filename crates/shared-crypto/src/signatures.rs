//! # Ed25519 Signatures
//!
//! [`SingleSigner`] over Ed25519. Deterministic nonces, so signing needs no
//! RNG and the same key signs the same message identically.

use crate::CryptoError;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use shared_types::{PrivateKey, SignerError, SingleSigner};
use zeroize::Zeroize;

/// Ed25519 public key length.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 signature length.
pub const SIGNATURE_LEN: usize = 64;

/// Ed25519 signer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signer;

impl Ed25519Signer {
    /// Generate a random key.
    pub fn generate_key() -> PrivateKey {
        Self::key_from_signing_key(SigningKey::generate(&mut rand::thread_rng()))
    }

    /// Key from a 32-byte secret seed.
    pub fn key_from_seed(seed: [u8; 32]) -> PrivateKey {
        Self::key_from_signing_key(SigningKey::from_bytes(&seed))
    }

    fn key_from_signing_key(signing_key: SigningKey) -> PrivateKey {
        let mut secret = signing_key.to_bytes();
        let key = PrivateKey::new(
            secret.to_vec(),
            signing_key.verifying_key().to_bytes().to_vec(),
        );
        secret.zeroize();
        key
    }

    fn signing_key(private_key: &PrivateKey) -> Result<SigningKey, CryptoError> {
        let seed: [u8; 32] = private_key
            .secret_bytes()
            .try_into()
            .map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(SigningKey::from_bytes(&seed))
    }

    fn verifying_key(public_key: &[u8]) -> Result<VerifyingKey, CryptoError> {
        let bytes: [u8; PUBLIC_KEY_LEN] = public_key
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)
    }
}

impl SingleSigner for Ed25519Signer {
    fn sign(&self, private_key: &PrivateKey, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        let signing_key = Self::signing_key(private_key)?;
        Ok(signing_key.sign(message).to_bytes().to_vec())
    }

    fn verify(
        &self,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), SignerError> {
        let verifying_key = Self::verifying_key(public_key)?;
        let bytes: [u8; SIGNATURE_LEN] = signature
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureFormat)?;
        verifying_key
            .verify(message, &Signature::from_bytes(&bytes))
            .map_err(|_| CryptoError::SignatureVerificationFailed.into())
    }
}
