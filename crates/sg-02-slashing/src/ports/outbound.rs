//! Driven port used by the notifier.

use crate::domain::{ProofTxData, SlashingProof};
use crate::error::SlashingResult;

/// Turns a proof into the round, shard, type and bytes that go on chain.
pub trait ProofTxDataExtractor: Send + Sync {
    fn extract(&self, proof: &SlashingProof) -> SlashingResult<ProofTxData>;
}
