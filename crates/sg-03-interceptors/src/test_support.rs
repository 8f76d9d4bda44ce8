//! Collaborator stubs shared by the unit tests.

use crate::domain::P2pMessage;
use crate::error::InterceptorResult;
use crate::ports::{AntifloodHandler, Hasher, PeerSignatureHandler};
use shared_types::{PeerId, SignerError};

/// Accepts the signature "sig:<pid>".
pub struct PidSignatureHandler;

impl PeerSignatureHandler for PidSignatureHandler {
    fn verify_peer_signature(
        &self,
        _pubkey: &[u8],
        pid: &PeerId,
        signature: &[u8],
    ) -> Result<(), SignerError> {
        if signature == [b"sig:".as_slice(), pid.as_bytes()].concat().as_slice() {
            Ok(())
        } else {
            Err(SignerError::VerificationFailed)
        }
    }
}

/// Hash is the input length.
pub struct LenHasher;

impl Hasher for LenHasher {
    fn compute(&self, data: &[u8]) -> Vec<u8> {
        (data.len() as u64).to_be_bytes().to_vec()
    }

    fn size(&self) -> usize {
        8
    }
}

pub struct AllowAll;

impl AntifloodHandler for AllowAll {
    fn can_process_message(
        &self,
        _message: &P2pMessage,
        _from_connected_peer: &PeerId,
    ) -> InterceptorResult<()> {
        Ok(())
    }
}
