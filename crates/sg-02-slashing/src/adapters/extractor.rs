use crate::domain::{ProofTxData, SlashingProof};
use crate::error::SlashingResult;
use crate::ports::{Marshalizer, ProofTxDataExtractor};
use std::sync::Arc;

/// Serializes the whole proof with the node's marshalizer.
///
/// The slasher must decode reveals with the same marshalizer.
pub struct MarshalProofTxDataExtractor<M: Marshalizer> {
    marshalizer: Arc<M>,
}

impl<M: Marshalizer> MarshalProofTxDataExtractor<M> {
    pub fn new(marshalizer: Arc<M>) -> Self {
        Self { marshalizer }
    }
}

impl<M: Marshalizer> ProofTxDataExtractor for MarshalProofTxDataExtractor<M> {
    fn extract(&self, proof: &SlashingProof) -> SlashingResult<ProofTxData> {
        Ok(ProofTxData {
            round: proof.round(),
            shard_id: proof.shard_id(),
            slash_type: proof.slash_type(),
            bytes: self.marshalizer.marshal(proof)?,
        })
    }
}
