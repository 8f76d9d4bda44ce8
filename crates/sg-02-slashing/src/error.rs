//! Error types for the slashing pipeline.

use shared_types::{AccountsError, CodecError, NodesCoordinatorError, SignerError};
use thiserror::Error;

/// Slashing errors.
///
/// Collaborator failures are wrapped verbatim so callers can match on the
/// original cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlashingError {
    /// The proof's slash type has no proof id.
    #[error("Invalid proof")]
    InvalidProof,

    #[error("Malformed proof: {reason}")]
    MalformedProof { reason: String },

    /// Expected outcome for honest traffic.
    #[error("No slashing event detected")]
    NoSlashingEventDetected,

    #[error("Invalid intercepted data: expected {expected}")]
    InvalidInterceptedData { expected: &'static str },

    #[error("Header round {round} not relevant at current round {current}")]
    HeaderRoundNotRelevant { round: u64, current: i64 },

    #[error("Headers do not have different hashes")]
    HeadersNotDifferentHashes,

    #[error("Hash too short for checksum: {len} bytes")]
    HashTooShort { len: usize },

    #[error("Malformed slashing transaction data: {reason}")]
    MalformedTxData { reason: String },

    #[error("Proof id {id} mapped more than once")]
    DuplicateProofId { id: u8 },

    #[error("Empty consensus group for round {round}")]
    EmptyConsensusGroup { round: u64 },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error(transparent)]
    Accounts(#[from] AccountsError),

    #[error(transparent)]
    NodesCoordinator(#[from] NodesCoordinatorError),
}

impl SlashingError {
    pub(crate) fn malformed_proof(reason: impl Into<String>) -> Self {
        Self::MalformedProof {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_tx_data(reason: impl Into<String>) -> Self {
        Self::MalformedTxData {
            reason: reason.into(),
        }
    }
}

/// Result type for slashing operations
pub type SlashingResult<T> = Result<T, SlashingError>;
