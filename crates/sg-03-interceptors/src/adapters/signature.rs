use crate::ports::{PeerSignatureHandler, SingleSigner};
use shared_types::{PeerId, SignerError};
use std::sync::Arc;

/// Verifies the peer id signature with a single-signature scheme.
pub struct SignerPeerSignatureHandler {
    signer: Arc<dyn SingleSigner>,
}

impl SignerPeerSignatureHandler {
    pub fn new(signer: Arc<dyn SingleSigner>) -> Self {
        Self { signer }
    }
}

impl PeerSignatureHandler for SignerPeerSignatureHandler {
    fn verify_peer_signature(
        &self,
        pubkey: &[u8],
        pid: &PeerId,
        signature: &[u8],
    ) -> Result<(), SignerError> {
        if pubkey.is_empty() || pid.as_bytes().is_empty() {
            return Err(SignerError::InvalidPublicKey);
        }
        self.signer.verify(pubkey, pid.as_bytes(), signature)
    }
}
