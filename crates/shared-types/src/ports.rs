//! # Collaborator Ports
//!
//! Narrow interfaces through which the safety layer consumes hashing,
//! signing, serialization, account storage, round timing, reputation
//! bookkeeping and consensus group selection.
//!
//! Reference adapters live in [`crate::adapters`]; production nodes plug
//! in their own.

use crate::entities::{Epoch, ShardId, ValidatorAccount};
use crate::errors::{AccountsError, CodecError, NodesCoordinatorError, SignerError};
use crate::intercepted::InterceptedData;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use zeroize::Zeroize;

/// Cryptographic hash function.
pub trait Hasher: Send + Sync {
    fn compute(&self, data: &[u8]) -> Vec<u8>;

    /// Output length in bytes.
    fn size(&self) -> usize;
}

/// Secret key material together with its public counterpart.
///
/// The secret bytes are wiped on drop.
#[derive(Clone)]
pub struct PrivateKey {
    secret: Vec<u8>,
    public: Vec<u8>,
}

impl PrivateKey {
    pub fn new(secret: Vec<u8>, public: Vec<u8>) -> Self {
        Self { secret, public }
    }

    pub fn secret_bytes(&self) -> &[u8] {
        &self.secret
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &hex::encode(&self.public))
            .finish_non_exhaustive()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

/// Single-signature scheme.
pub trait SingleSigner: Send + Sync {
    fn sign(&self, private_key: &PrivateKey, message: &[u8]) -> Result<Vec<u8>, SignerError>;

    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8])
        -> Result<(), SignerError>;
}

/// Object serialization.
pub trait Marshalizer: Send + Sync {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// Converts raw public keys/addresses to and from their text form.
pub trait PubkeyConverter: Send + Sync {
    fn encode(&self, pub_key: &[u8]) -> String;

    fn decode(&self, text: &str) -> Result<Vec<u8>, CodecError>;

    /// Expected raw length of a key.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Account storage.
pub trait AccountsAdapter: Send + Sync {
    /// Fails when the account does not exist.
    fn get_existing_account(&self, address: &[u8]) -> Result<ValidatorAccount, AccountsError>;

    fn save_account(&self, account: ValidatorAccount) -> Result<(), AccountsError>;
}

/// Consensus round clock.
pub trait Rounder: Send + Sync {
    /// Current round index.
    fn index(&self) -> i64;

    fn time_duration(&self) -> Duration;
}

/// Reputation list of hashes or peers that must be refused.
pub trait BlackListHandler: Send + Sync {
    fn add(&self, key: &[u8], cause: &str);

    fn has(&self, key: &[u8]) -> bool;

    /// Drops expired entries.
    fn sweep(&self);
}

/// Data explicitly requested by this node, admitted even when it would
/// otherwise be ignored.
pub trait WhiteListHandler: Send + Sync {
    fn is_white_listed(&self, data: &dyn InterceptedData) -> bool;
}

/// Consensus group selection.
pub trait NodesCoordinator: Send + Sync {
    /// Public keys of the consensus group, proposer first.
    fn compute_consensus_group(
        &self,
        randomness: &[u8],
        round: u64,
        shard_id: ShardId,
        epoch: Epoch,
    ) -> Result<Vec<Vec<u8>>, NodesCoordinatorError>;
}
