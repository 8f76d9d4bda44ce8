//! # Error Types
//!
//! Errors raised by the collaborator ports, shared by every subsystem.

use thiserror::Error;

/// Marshalling and address-encoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Marshal failed: {0}")]
    Marshal(String),

    #[error("Unmarshal failed: {0}")]
    Unmarshal(String),

    /// Address text could not be decoded.
    #[error("Invalid address encoding: {0}")]
    InvalidAddress(String),
}

/// Signing and verification failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("Invalid private key")]
    InvalidPrivateKey,

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    #[error("Signature verification failed")]
    VerificationFailed,

    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

/// Account storage failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountsError {
    #[error("Account not found: {address}")]
    AccountNotFound { address: String },

    #[error("Account storage error: {0}")]
    Storage(String),
}

/// Consensus group selection failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodesCoordinatorError {
    #[error("No validators for shard {shard_id} in epoch {epoch}")]
    EmptyValidatorSet { shard_id: u32, epoch: u32 },

    #[error("Invalid randomness source")]
    InvalidRandomness,
}

/// Validity failures of intercepted network data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterceptedDataError {
    #[error("Property too long: {property}")]
    PropertyTooLong { property: String },

    #[error("Property too short: {property}")]
    PropertyTooShort { property: String },

    #[error("Invalid intercepted data: {0}")]
    Invalid(String),
}

impl InterceptedDataError {
    pub fn too_long(property: &str) -> Self {
        Self::PropertyTooLong {
            property: property.to_string(),
        }
    }

    pub fn too_short(property: &str) -> Self {
        Self::PropertyTooShort {
            property: property.to_string(),
        }
    }
}
