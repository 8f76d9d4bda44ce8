//! # Core Domain Entities
//!
//! Defines the chain entities the safety layer reasons about.
//!
//! ## Clusters
//!
//! - **Chain**: `BlockHeader`, `Transaction`, `SmartContractResult`
//! - **State**: `ValidatorAccount`
//! - **Networking**: `PeerId`

use crate::errors::CodecError;
use crate::ports::{Marshalizer, PubkeyConverter};
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// Shard identifier.
pub type ShardId = u32;

/// Epoch number.
pub type Epoch = u32;

/// Shard id reserved for the coordinating (meta) chain.
pub const METACHAIN_SHARD_ID: ShardId = u32::MAX;

/// Header fields the safety layer needs.
///
/// Hashes, seeds, bitmaps and signatures are opaque byte strings; their
/// length is decided by the hasher and signer in use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Shard that produced the block.
    pub shard_id: ShardId,
    /// Epoch the block belongs to.
    pub epoch: Epoch,
    /// Block height.
    pub nonce: u64,
    /// Consensus round in which the block was proposed.
    pub round: u64,
    /// Unix timestamp (seconds).
    pub timestamp: u64,
    /// Hash of the previous block.
    pub prev_hash: Vec<u8>,
    /// Randomness of the previous block, seeds consensus group selection.
    pub prev_rand_seed: Vec<u8>,
    /// Randomness produced by this block's proposer.
    pub rand_seed: Vec<u8>,
    /// One bit per consensus group member that signed the block.
    pub pub_keys_bitmap: Vec<u8>,
    /// Aggregated consensus signature.
    pub signature: Vec<u8>,
    /// Proposer's signature.
    pub leader_signature: Vec<u8>,
}

impl BlockHeader {
    /// Both randomness fields are present.
    pub fn has_valid_rand_seed(&self) -> bool {
        !self.prev_rand_seed.is_empty() && !self.rand_seed.is_empty()
    }

    /// At least one consensus member signed the header.
    pub fn is_signed(&self) -> bool {
        self.pub_keys_bitmap.iter().any(|byte| *byte != 0)
    }

    /// Whether the consensus member at `index` is marked in the bitmap.
    pub fn is_signer(&self, index: usize) -> bool {
        self.pub_keys_bitmap
            .get(index / 8)
            .map(|byte| byte & (1 << (index % 8)) != 0)
            .unwrap_or(false)
    }
}

/// Transaction as it travels between shards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Transaction {
    pub nonce: u64,
    pub value: U256,
    /// `None` for system transactions with no receiver.
    pub rcv_addr: Option<Vec<u8>>,
    pub snd_addr: Vec<u8>,
    pub gas_price: u64,
    pub gas_limit: u64,
    pub data: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Canonical view of a transaction that gets signed.
///
/// Addresses are rendered through the pubkey converter so a signature does
/// not depend on the binary address layout.
#[derive(Serialize)]
struct SigningView<'a> {
    nonce: u64,
    value: String,
    receiver: String,
    sender: String,
    gas_price: u64,
    gas_limit: u64,
    data: &'a [u8],
}

impl Transaction {
    /// Bytes covered by the transaction signature.
    pub fn data_for_signing<M: Marshalizer>(
        &self,
        converter: &dyn PubkeyConverter,
        marshalizer: &M,
    ) -> Result<Vec<u8>, CodecError> {
        let view = SigningView {
            nonce: self.nonce,
            value: self.value.to_string(),
            receiver: self
                .rcv_addr
                .as_deref()
                .map(|addr| converter.encode(addr))
                .unwrap_or_default(),
            sender: converter.encode(&self.snd_addr),
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            data: &self.data,
        };
        marshalizer.marshal(&view)
    }
}

/// Outcome code attached to a smart contract result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReturnCode {
    #[default]
    Ok,
    /// Nothing was done; `return_message` says why.
    NoOp,
}

/// Result produced by processing a transaction, routed to its destination
/// shard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SmartContractResult {
    pub nonce: u64,
    pub value: U256,
    pub rcv_addr: Vec<u8>,
    pub snd_addr: Vec<u8>,
    pub original_sender: Vec<u8>,
    pub destination_shard: ShardId,
    pub data: Vec<u8>,
    pub return_code: ReturnCode,
    pub return_message: String,
}

impl SmartContractResult {
    /// A result that carries no effect.
    pub fn no_op(reason: impl Into<String>) -> Self {
        Self {
            return_code: ReturnCode::NoOp,
            return_message: reason.into(),
            ..Self::default()
        }
    }

    pub fn is_no_op(&self) -> bool {
        self.return_code == ReturnCode::NoOp
    }
}

// =============================================================================
// CLUSTER B: STATE
// =============================================================================

/// Validator account as exposed by the accounts adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidatorAccount {
    pub address: Vec<u8>,
    pub nonce: u64,
    pub balance: U256,
    pub is_jailed: bool,
    pub is_active: bool,
}

impl ValidatorAccount {
    pub fn new(address: Vec<u8>, nonce: u64, balance: U256) -> Self {
        Self {
            address,
            nonce,
            balance,
            is_jailed: false,
            is_active: true,
        }
    }
}

// =============================================================================
// CLUSTER C: NETWORKING
// =============================================================================

/// Transport-level peer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PeerId(pub Vec<u8>);

impl PeerId {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Human readable form used in logs.
    pub fn pretty(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

impl From<&[u8]> for PeerId {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}
