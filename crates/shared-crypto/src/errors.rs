//! Crypto error types.

use shared_types::SignerError;
use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid signature format
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,
}

impl From<CryptoError> for SignerError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::SignatureVerificationFailed => SignerError::VerificationFailed,
            CryptoError::InvalidSignatureFormat => SignerError::InvalidSignatureFormat,
            CryptoError::InvalidPublicKey => SignerError::InvalidPublicKey,
            CryptoError::InvalidPrivateKey => SignerError::InvalidPrivateKey,
        }
    }
}
