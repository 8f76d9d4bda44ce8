use super::{as_header, check_round_relevant, MemberKey};
use crate::config::DetectorConfig;
use crate::domain::{
    HeaderInfo, MultipleSigningProof, RoundHeadersCache, SignerEvidence, SlashingProof,
    SlashingType,
};
use crate::error::{SlashingError, SlashingResult};
use crate::metrics;
use crate::ports::{NodesCoordinator, Rounder, SlashingDetector};
use parking_lot::Mutex;
use shared_types::{BlockHeader, InterceptedData};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Detects consensus members that signed more than one header in a round.
///
/// Signers are the consensus group members whose bit is set in the
/// header's public key bitmap.
pub struct MultipleHeaderSigningDetector<N: NodesCoordinator, R: Rounder> {
    nodes_coordinator: Arc<N>,
    rounder: Arc<R>,
    max_delta_to_current_round: u64,
    cache: Mutex<RoundHeadersCache<MemberKey>>,
}

impl<N: NodesCoordinator, R: Rounder> MultipleHeaderSigningDetector<N, R> {
    pub fn new(
        config: &DetectorConfig,
        nodes_coordinator: Arc<N>,
        rounder: Arc<R>,
    ) -> SlashingResult<Self> {
        config.validate()?;
        Ok(Self {
            nodes_coordinator,
            rounder,
            max_delta_to_current_round: config.max_delta_to_current_round,
            cache: Mutex::new(RoundHeadersCache::new(config.round_cache_size)?),
        })
    }

    fn signers_of(&self, header: &BlockHeader) -> SlashingResult<Vec<Vec<u8>>> {
        let group = self.nodes_coordinator.compute_consensus_group(
            &header.prev_rand_seed,
            header.round,
            header.shard_id,
            header.epoch,
        )?;
        Ok(group
            .into_iter()
            .enumerate()
            .filter(|(index, _)| header.is_signer(*index))
            .map(|(_, pub_key)| pub_key)
            .collect())
    }
}

impl<N: NodesCoordinator, R: Rounder> SlashingDetector for MultipleHeaderSigningDetector<N, R> {
    fn slash_type(&self) -> SlashingType {
        SlashingType::MultipleSigning
    }

    fn verify_data(&self, data: &dyn InterceptedData) -> SlashingResult<SlashingProof> {
        let intercepted = as_header(data)?;
        let header = intercepted.header();
        let hash = intercepted.hash();
        check_round_relevant(
            self.rounder.as_ref(),
            self.max_delta_to_current_round,
            header.round,
        )?;

        let signers = self.signers_of(header)?;
        if signers.is_empty() {
            return Err(SlashingError::NoSlashingEventDetected);
        }

        let mut offenders = BTreeMap::new();
        {
            let mut cache = self.cache.lock();
            // A header is recorded for all its signers or for none.
            if signers
                .iter()
                .any(|signer| cache.contains(header.round, &(header.shard_id, signer.clone()), hash))
            {
                return Err(SlashingError::HeadersNotDifferentHashes);
            }
            for signer in signers {
                let info = HeaderInfo::new(header.clone(), hash.to_vec());
                let headers = cache.add(header.round, (header.shard_id, signer.clone()), info)?;
                if headers.len() >= 2 {
                    offenders.insert(signer, SignerEvidence::new(headers));
                }
            }
        }

        if offenders.is_empty() {
            return Err(SlashingError::NoSlashingEventDetected);
        }

        let proof = MultipleSigningProof::new(header.round, header.shard_id, offenders);
        warn!(
            "[sg-02] {} validator(s) signed multiple headers in round {} (shard {})",
            proof.signers.len(),
            proof.round,
            proof.shard_id
        );
        metrics::record_proof_detected("multiple_signing");
        Ok(SlashingProof::MultipleSigning(proof))
    }

    fn validate_proof(&self, proof: &SlashingProof) -> SlashingResult<()> {
        let SlashingProof::MultipleSigning(proof) = proof else {
            return Err(SlashingError::InvalidProof);
        };
        proof.validate()?;
        for (signer, evidence) in &proof.signers {
            for info in &evidence.headers {
                if !self.signers_of(&info.header)?.contains(signer) {
                    return Err(SlashingError::malformed_proof("offender did not sign every header"));
                }
            }
        }
        Ok(())
    }
}
