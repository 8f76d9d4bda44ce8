//! Header records and per-nonce outcomes.

use serde::{Deserialize, Serialize};
use shared_types::Epoch;

/// How this node came to know about a header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockHeaderState {
    /// Received from the network.
    Received,
    /// Received from the network after its round had passed.
    ReceivedTooLate,
    /// Proposed in the current consensus round, not yet agreed.
    Proposed,
    /// Executed and committed by this node.
    Processed,
    /// Notarized by the coordinating chain.
    Notarized,
}

impl BlockHeaderState {
    /// Processed or notarized: the node has evidence this header is on chain.
    pub fn is_confirmed(self) -> bool {
        matches!(self, Self::Processed | Self::Notarized)
    }
}

/// One observation of a header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub epoch: Epoch,
    pub nonce: u64,
    pub round: u64,
    pub hash: Vec<u8>,
    pub state: BlockHeaderState,
}

/// Outcome of a nonce slot.
///
/// ```text
/// Unseen ──► Candidate ──┬──► Final
///                        ├──► Superseded
///                        └──► Forked
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonceState {
    /// No record at this nonce.
    Unseen,
    /// Records share a single hash, not finalized yet.
    Candidate,
    /// The final checkpoint reached this nonce through a processed header.
    Final,
    /// The final checkpoint moved past this nonce without finalizing it.
    Superseded,
    /// Records with differing hashes coexist and none is final.
    Forked,
}

/// Result of [`check_fork`](crate::ForkDetector::check_fork).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkInfo {
    pub is_detected: bool,
    pub nonce: u64,
    pub round: u64,
    /// Hash of the competing header, `None` when the fork is a stuck
    /// consensus.
    pub hash: Option<Vec<u8>>,
}

impl ForkInfo {
    pub fn none() -> Self {
        Self {
            is_detected: false,
            nonce: u64::MAX,
            round: u64::MAX,
            hash: None,
        }
    }

    /// Consensus has not committed for too long.
    pub fn stuck() -> Self {
        Self {
            is_detected: true,
            ..Self::none()
        }
    }
}

impl Default for ForkInfo {
    fn default() -> Self {
        Self::none()
    }
}
