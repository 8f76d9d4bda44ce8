//! Error types for the interceptors.

use shared_types::{CodecError, InterceptedDataError, SignerError};
use thiserror::Error;

/// Interceptor errors.
///
/// [`InterceptorError::is_ignored`] separates messages that were merely not
/// processed from failures that damage the sender's reputation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterceptorError {
    /// Message carried no payload.
    #[error("Empty buffer")]
    EmptyBuffer,

    /// Per-topic throttler has no free slot.
    #[error("System busy")]
    SystemBusy,

    #[error("Peer {peer} is blacklisted")]
    PeerBlacklisted { peer: String },

    #[error("Message rejected by antiflood: {reason}")]
    Flooded { reason: String },

    #[error("Intercepted data is not of type {expected}")]
    WrongDataType { expected: &'static str },

    /// Some payloads were ignored (observer throttle full, or not addressed
    /// to this node and not whitelisted).
    #[error("Peer authentication for observers ignored")]
    PeerAuthenticationForObservers,

    #[error("Processing failed: {0}")]
    Processing(String),

    #[error("Not a validator")]
    NotAValidator,

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    InvalidData(#[from] InterceptedDataError),

    #[error(transparent)]
    Signer(#[from] SignerError),
}

impl InterceptorError {
    /// True when the message was skipped without blame.
    pub fn is_ignored(&self) -> bool {
        matches!(
            self,
            InterceptorError::PeerAuthenticationForObservers | InterceptorError::SystemBusy
        )
    }
}

/// Result type for interceptor operations
pub type InterceptorResult<T> = Result<T, InterceptorError>;
