//! # Peer Authentication
//!
//! A node's signed claim that `pid` belongs to the holder of `pubkey`.
//!
//! Field bounds are checked against the configured property lengths; the
//! hardfork payload may be empty.

use crate::ports::PeerSignatureHandler;
use serde::{Deserialize, Serialize};
use shared_types::{InterceptedData, InterceptedDataError, PeerId, ShardId};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

pub const PEER_AUTHENTICATION_TYPE: &str = "intercepted peer authentication";

/// Wire form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerAuthentication {
    pub pubkey: Vec<u8>,
    /// Signature of `pid` by `pubkey`.
    pub signature: Vec<u8>,
    pub pid: Vec<u8>,
    pub payload: Vec<u8>,
    pub payload_signature: Vec<u8>,
    pub hardfork_payload: Vec<u8>,
}

/// Decoded and hashed peer authentication.
pub struct InterceptedPeerAuthentication {
    peer_auth: PeerAuthentication,
    pid: PeerId,
    hash: Vec<u8>,
    min_property_len: usize,
    max_property_len: usize,
    signature_handler: Arc<dyn PeerSignatureHandler>,
    computed_shard_id: OnceLock<ShardId>,
}

impl InterceptedPeerAuthentication {
    pub fn new(
        peer_auth: PeerAuthentication,
        hash: Vec<u8>,
        min_property_len: usize,
        max_property_len: usize,
        signature_handler: Arc<dyn PeerSignatureHandler>,
    ) -> Self {
        Self {
            pid: PeerId(peer_auth.pid.clone()),
            peer_auth,
            hash,
            min_property_len,
            max_property_len,
            signature_handler,
            computed_shard_id: OnceLock::new(),
        }
    }

    pub fn peer_authentication(&self) -> &PeerAuthentication {
        &self.peer_auth
    }

    pub fn pubkey(&self) -> &[u8] {
        &self.peer_auth.pubkey
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.pid
    }

    /// Shard of the validator owning `pubkey`; set once by the interceptor.
    pub fn set_computed_shard_id(&self, shard_id: ShardId) {
        let _ = self.computed_shard_id.set(shard_id);
    }

    pub fn computed_shard_id(&self) -> Option<ShardId> {
        self.computed_shard_id.get().copied()
    }

    fn check_property(
        &self,
        name: &str,
        value: &[u8],
        min_len: usize,
    ) -> Result<(), InterceptedDataError> {
        if value.len() < min_len {
            return Err(InterceptedDataError::too_short(name));
        }
        if value.len() > self.max_property_len {
            return Err(InterceptedDataError::too_long(name));
        }
        Ok(())
    }
}

impl InterceptedData for InterceptedPeerAuthentication {
    fn check_validity(&self) -> Result<(), InterceptedDataError> {
        let min = self.min_property_len;
        let auth = &self.peer_auth;
        self.check_property("public key", &auth.pubkey, min)?;
        self.check_property("signature", &auth.signature, min)?;
        self.check_property("peer id", &auth.pid, min)?;
        self.check_property("payload", &auth.payload, min)?;
        self.check_property("payload signature", &auth.payload_signature, min)?;
        self.check_property("hardfork payload", &auth.hardfork_payload, 0)?;

        self.signature_handler
            .verify_peer_signature(&auth.pubkey, &self.pid, &auth.signature)
            .map_err(|err| InterceptedDataError::Invalid(format!("peer signature: {err}")))
    }

    fn is_for_current_shard(&self) -> bool {
        true
    }

    fn hash(&self) -> &[u8] {
        &self.hash
    }

    fn type_name(&self) -> &'static str {
        PEER_AUTHENTICATION_TYPE
    }

    fn identifiers(&self) -> Vec<Vec<u8>> {
        vec![self.peer_auth.pubkey.clone(), self.peer_auth.pid.clone()]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for InterceptedPeerAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pk={}, pid={}, sig={}, computed shardID={}",
            hex::encode(&self.peer_auth.pubkey),
            self.pid.pretty(),
            hex::encode(&self.peer_auth.signature),
            self.computed_shard_id()
                .map(|shard| shard.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        )
    }
}

impl fmt::Debug for InterceptedPeerAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InterceptedPeerAuthentication({})", self)
    }
}
