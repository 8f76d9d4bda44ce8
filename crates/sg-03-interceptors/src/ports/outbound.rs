//! Driven ports: what the interceptors call.

use crate::domain::{InterceptedPeerAuthentication, P2pMessage};
use crate::error::InterceptorResult;
use shared_types::{InterceptedData, PeerId, ShardId, SignerError};

/// Eligible validator lookup.
pub trait ValidatorChecker: Send + Sync {
    /// Shard of the validator with `pubkey`. Any error means the key
    /// belongs to an observer.
    fn get_validator_shard(&self, pubkey: &[u8]) -> InterceptorResult<ShardId>;
}

/// Consumer of admitted peer authentications.
pub trait PeerAuthenticationProcessor: Send + Sync {
    fn process_received(
        &self,
        data: &InterceptedPeerAuthentication,
        from: &PeerId,
    ) -> InterceptorResult<()>;
}

/// Decodes one buffer of a message batch.
pub trait InterceptedDataFactory: Send + Sync {
    fn create(&self, buffer: &[u8]) -> InterceptorResult<Box<dyn InterceptedData>>;
}

/// Per-peer flood protection.
pub trait AntifloodHandler: Send + Sync {
    fn can_process_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> InterceptorResult<()>;
}

/// Verifies that `pubkey` signed `pid`.
pub trait PeerSignatureHandler: Send + Sync {
    fn verify_peer_signature(
        &self,
        pubkey: &[u8],
        pid: &PeerId,
        signature: &[u8],
    ) -> Result<(), SignerError>;
}
