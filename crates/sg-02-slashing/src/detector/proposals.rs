use super::{as_header, check_round_relevant, MemberKey};
use crate::config::DetectorConfig;
use crate::domain::{
    HeaderInfo, MultipleProposalProof, RoundHeadersCache, SlashingProof, SlashingType,
};
use crate::error::{SlashingError, SlashingResult};
use crate::metrics;
use crate::ports::{NodesCoordinator, Rounder, SlashingDetector};
use parking_lot::Mutex;
use shared_types::{BlockHeader, InterceptedData};
use std::sync::Arc;
use tracing::{debug, warn};

/// Detects a proposer that produced more than one header in a round.
pub struct MultipleHeaderProposalsDetector<N: NodesCoordinator, R: Rounder> {
    nodes_coordinator: Arc<N>,
    rounder: Arc<R>,
    max_delta_to_current_round: u64,
    cache: Mutex<RoundHeadersCache<MemberKey>>,
}

impl<N: NodesCoordinator, R: Rounder> MultipleHeaderProposalsDetector<N, R> {
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

    fn proposer_of(&self, header: &BlockHeader) -> SlashingResult<Vec<u8>> {
        let group = self.nodes_coordinator.compute_consensus_group(
            &header.prev_rand_seed,
            header.round,
            header.shard_id,
            header.epoch,
        )?;
        group
            .into_iter()
            .next()
            .ok_or(SlashingError::EmptyConsensusGroup {
                round: header.round,
            })
    }
}

impl<N: NodesCoordinator, R: Rounder> SlashingDetector for MultipleHeaderProposalsDetector<N, R> {
    fn slash_type(&self) -> SlashingType {
        SlashingType::MultipleProposal
    }

    fn verify_data(&self, data: &dyn InterceptedData) -> SlashingResult<SlashingProof> {
        let intercepted = as_header(data)?;
        let header = intercepted.header();
        check_round_relevant(
            self.rounder.as_ref(),
            self.max_delta_to_current_round,
            header.round,
        )?;

        let proposer = self.proposer_of(header)?;
        let info = HeaderInfo::new(header.clone(), intercepted.hash().to_vec());
        let headers = self
            .cache
            .lock()
            .add(header.round, (header.shard_id, proposer.clone()), info)?;

        if headers.len() < 2 {
            return Err(SlashingError::NoSlashingEventDetected);
        }

        let proof = MultipleProposalProof::new(header.round, header.shard_id, proposer, headers);
        warn!(
            "[sg-02] Multiple proposals by {} in round {} (shard {}, {} headers)",
            hex::encode(&proof.proposer),
            proof.round,
            proof.shard_id,
            proof.headers.len()
        );
        metrics::record_proof_detected("multiple_proposal");
        Ok(SlashingProof::MultipleProposal(proof))
    }

    fn validate_proof(&self, proof: &SlashingProof) -> SlashingResult<()> {
        let SlashingProof::MultipleProposal(proof) = proof else {
            return Err(SlashingError::InvalidProof);
        };
        proof.validate()?;
        for info in &proof.headers {
            if self.proposer_of(&info.header)? != proof.proposer {
                debug!("[sg-02] Proof header {} not proposed by offender", hex::encode(&info.hash));
                return Err(SlashingError::malformed_proof("offender did not propose every header"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::test_support::{header, FixedGroup, NotAHeader};
    use crate::domain::ThreatLevel;
    use shared_types::adapters::ManualRounder;
    use shared_types::InterceptedHeader;
    use std::time::Duration;

    fn detector(current_round: i64) -> MultipleHeaderProposalsDetector<FixedGroup, ManualRounder> {
        let config = DetectorConfig {
            round_cache_size: 3,
            max_delta_to_current_round: 3,
        };
        MultipleHeaderProposalsDetector::new(
            &config,
            Arc::new(FixedGroup(vec![b"leader".to_vec(), b"member".to_vec()])),
            Arc::new(ManualRounder::new(current_round, Duration::from_secs(4))),
        )
        .unwrap()
    }

    fn verify(
        d: &MultipleHeaderProposalsDetector<FixedGroup, ManualRounder>,
        h: &InterceptedHeader,
    ) -> SlashingResult<SlashingProof> {
        d.verify_data(h)
    }

    #[test]
    fn test_single_header_is_honest() {
        let d = detector(10);
        assert_eq!(
            verify(&d, &header(10, 0, b"h1", &[])),
            Err(SlashingError::NoSlashingEventDetected)
        );
    }

    #[test]
    fn test_two_headers_medium_three_high() {
        let d = detector(10);
        verify(&d, &header(10, 0, b"h1", &[])).unwrap_err();

        let proof = verify(&d, &header(10, 0, b"h2", &[])).unwrap();
        let SlashingProof::MultipleProposal(p) = &proof else {
            panic!("wrong proof type");
        };
        assert_eq!(p.level, ThreatLevel::Medium);
        assert_eq!(p.proposer, b"leader".to_vec());
        assert!(d.validate_proof(&proof).is_ok());

        let proof = verify(&d, &header(10, 0, b"h3", &[])).unwrap();
        let SlashingProof::MultipleProposal(p) = &proof else {
            panic!("wrong proof type");
        };
        assert_eq!(p.level, ThreatLevel::High);
        assert_eq!(p.headers.len(), 3);
    }

    #[test]
    fn test_same_header_twice() {
        let d = detector(10);
        verify(&d, &header(10, 0, b"h1", &[])).unwrap_err();
        assert_eq!(
            verify(&d, &header(10, 0, b"h1", &[])),
            Err(SlashingError::HeadersNotDifferentHashes)
        );
    }

    #[test]
    fn test_different_shards_do_not_conflict() {
        let d = detector(10);
        verify(&d, &header(10, 0, b"h1", &[])).unwrap_err();
        assert_eq!(
            verify(&d, &header(10, 1, b"h2", &[])),
            Err(SlashingError::NoSlashingEventDetected)
        );
    }

    #[test]
    fn test_irrelevant_round() {
        let d = detector(10);
        assert_eq!(
            verify(&d, &header(3, 0, b"h1", &[])),
            Err(SlashingError::HeaderRoundNotRelevant {
                round: 3,
                current: 10
            })
        );
    }

    #[test]
    fn test_wrong_data_type() {
        let d = detector(10);
        assert!(matches!(
            d.verify_data(&NotAHeader),
            Err(SlashingError::InvalidInterceptedData { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_other_proposer() {
        let d = detector(10);
        verify(&d, &header(10, 0, b"h1", &[])).unwrap_err();
        let mut proof = verify(&d, &header(10, 0, b"h2", &[])).unwrap();
        if let SlashingProof::MultipleProposal(p) = &mut proof {
            p.proposer = b"member".to_vec();
        }
        assert!(matches!(
            d.validate_proof(&proof),
            Err(SlashingError::MalformedProof { .. })
        ));
    }

    #[test]
    fn test_zero_cache_rejected() {
        let config = DetectorConfig {
            round_cache_size: 0,
            max_delta_to_current_round: 3,
        };
        let result = MultipleHeaderProposalsDetector::new(
            &config,
            Arc::new(FixedGroup(vec![b"leader".to_vec()])),
            Arc::new(ManualRounder::new(0, Duration::from_secs(4))),
        );
        assert!(matches!(result, Err(SlashingError::InvalidConfig { .. })));
    }
}
