//! # Fork Detection Flows
//!
//! Drives a shard-chain fork detector with headers hashed the way a node
//! hashes them (bincode + BLAKE3) and checks finality, fork reporting and
//! blacklist propagation end to end.

#[cfg(test)]
mod tests {
    use sg_01_fork_detection::{
        BlockHeaderState, ChainKind, CheckpointInfo, ForkDetector, ForkDetectorApi,
        ForkDetectorConfig, ForkDetectorError, NonceState,
    };
    use shared_crypto::Blake3Hasher;
    use shared_types::adapters::{BincodeMarshalizer, ManualRounder, TimeCacheBlacklist};
    use shared_types::{BlackListHandler, BlockHeader, Hasher, Marshalizer};
    use std::sync::Arc;
    use std::time::Duration;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Node {
        detector: Arc<ForkDetector<ManualRounder, TimeCacheBlacklist>>,
        rounder: Arc<ManualRounder>,
        blacklist: Arc<TimeCacheBlacklist>,
    }

    impl Node {
        fn shard() -> Self {
            sg_telemetry::init_test_logging();
            let rounder = Arc::new(ManualRounder::new(0, Duration::from_secs(6)));
            let blacklist = Arc::new(TimeCacheBlacklist::new(Duration::from_secs(300)));
            let detector = ForkDetector::new(
                ForkDetectorConfig::for_testing(ChainKind::Shard),
                rounder.clone(),
                blacklist.clone(),
            )
            .unwrap();
            Self {
                detector: Arc::new(detector),
                rounder,
                blacklist,
            }
        }

        fn api(&self) -> Arc<dyn ForkDetectorApi> {
            self.detector.clone()
        }
    }

    fn header(nonce: u64, round: u64, prev_hash: &[u8], proposer: u8) -> BlockHeader {
        BlockHeader {
            nonce,
            round,
            prev_hash: prev_hash.to_vec(),
            prev_rand_seed: vec![proposer; 4],
            rand_seed: vec![proposer.wrapping_add(1); 4],
            pub_keys_bitmap: vec![0b0000_0111],
            ..Default::default()
        }
    }

    fn hash_of(header: &BlockHeader) -> Vec<u8> {
        let bytes = BincodeMarshalizer.marshal(header).unwrap();
        Blake3Hasher.compute(&bytes)
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    #[test]
    fn test_shard_chain_finalizes_through_notarization() {
        let node = Node::shard();
        let api = node.api();

        let h1 = header(1, 1, b"genesis", 1);
        let h1_hash = hash_of(&h1);
        node.rounder.set_index(1);
        api.add_header(&h1, &h1_hash, BlockHeaderState::Processed, &[], &[], false)
            .unwrap();

        let h2 = header(2, 2, &h1_hash, 2);
        let h2_hash = hash_of(&h2);
        node.rounder.set_index(2);
        api.add_header(
            &h2,
            &h2_hash,
            BlockHeaderState::Processed,
            &[h1.clone()],
            &[h1_hash.clone()],
            false,
        )
        .unwrap();

        assert_eq!(node.detector.final_checkpoint(), CheckpointInfo::new(1, 1));
        assert_eq!(api.get_highest_final_block_nonce(), 1);
        assert_eq!(api.get_notarized_header_hash(1), Some(h1_hash));
        assert_eq!(api.nonce_state(1), NonceState::Final);
        assert_eq!(api.nonce_state(2), NonceState::Candidate);
        assert_eq!(api.probable_highest_nonce(), 2);
        assert!(!api.check_fork().is_detected);
    }

    #[test]
    fn test_competing_header_from_earlier_round_is_reported() {
        let node = Node::shard();
        let api = node.api();

        let h1 = header(1, 1, b"genesis", 1);
        let h1_hash = hash_of(&h1);
        node.rounder.set_index(1);
        api.add_header(&h1, &h1_hash, BlockHeaderState::Processed, &[], &[], false)
            .unwrap();

        // This node committed nonce 2 in round 3, the network agreed on a
        // header proposed in round 2.
        let own = header(2, 3, &h1_hash, 3);
        let own_hash = hash_of(&own);
        node.rounder.set_index(3);
        api.add_header(&own, &own_hash, BlockHeaderState::Processed, &[], &[], false)
            .unwrap();

        let competitor = header(2, 2, &h1_hash, 2);
        let competitor_hash = hash_of(&competitor);
        api.add_header(
            &competitor,
            &competitor_hash,
            BlockHeaderState::Received,
            &[],
            &[],
            false,
        )
        .unwrap();

        let fork = api.check_fork();
        assert!(fork.is_detected);
        assert_eq!(fork.nonce, 2);
        assert_eq!(fork.round, 2);
        assert_eq!(fork.hash, Some(competitor_hash));
        assert_eq!(api.nonce_state(2), NonceState::Forked);

        // The node drops its own block and follows the network.
        api.remove_header(2, &own_hash);
        assert_eq!(node.detector.last_checkpoint(), CheckpointInfo::new(1, 1));
        assert!(!api.check_fork().is_detected);
    }

    #[test]
    fn test_blacklisted_parent_poisons_descendants() {
        let node = Node::shard();
        let api = node.api();
        node.rounder.set_index(2);

        let bad = header(1, 1, b"genesis", 9);
        let bad_hash = hash_of(&bad);
        node.blacklist.add(&bad_hash, "invalid block body");

        let child = header(2, 2, &bad_hash, 4);
        let child_hash = hash_of(&child);
        let err = api
            .add_header(&child, &child_hash, BlockHeaderState::Received, &[], &[], false)
            .unwrap_err();

        assert_eq!(err, ForkDetectorError::HeaderIsBlackListed);
        assert!(node.blacklist.has(&child_hash));

        let grandchild = header(3, 3, &child_hash, 5);
        node.rounder.set_index(3);
        assert_eq!(
            api.add_header(
                &grandchild,
                &hash_of(&grandchild),
                BlockHeaderState::Received,
                &[],
                &[],
                false
            ),
            Err(ForkDetectorError::HeaderIsBlackListed)
        );
        assert_eq!(api.nonce_state(2), NonceState::Unseen);
    }

    #[test]
    fn test_syncing_node_rolls_back_received_headers() {
        let node = Node::shard();
        let api = node.api();

        let mut prev_hash = b"genesis".to_vec();
        for nonce in 1..=4u64 {
            let h = header(nonce, nonce, &prev_hash, nonce as u8);
            let hash = hash_of(&h);
            node.rounder.set_index(nonce as i64);
            api.add_header(&h, &hash, BlockHeaderState::Received, &[], &[], false)
                .unwrap();
            prev_hash = hash;
        }
        assert_eq!(api.probable_highest_nonce(), 4);

        api.set_roll_back_nonce(2);
        api.reset_fork();

        assert_eq!(api.probable_highest_nonce(), 2);
        assert_eq!(api.nonce_state(3), NonceState::Unseen);
        assert_eq!(node.detector.roll_back_nonce(), None);

        api.restore_to_genesis();
        assert_eq!(api.probable_highest_nonce(), 0);
        assert_eq!(api.nonce_state(1), NonceState::Unseen);
    }
}
