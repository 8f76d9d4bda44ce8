//! # Slashing Flow
//!
//! The full commit-reveal pipeline with real cryptography:
//!
//! ```text
//! InterceptedHeader ─► detector ─► proof
//!                                   │
//!            notifier ◄─────────────┘
//!               │ commitment tx            reveal tx
//!               ▼                             ▼
//!         tx processor ─► SCR ─► slasher ◄─ SCR ◄─ tx processor
//!                                   │
//!                           jail + balance cut
//! ```

#[cfg(test)]
mod tests {
    use sg_02_slashing::{
        CommitmentTxConfig, MarshalProofTxDataExtractor,
        MultipleHeaderProposalsDetector, MultipleHeaderSigningDetector, PenaltyPolicy,
        ProofIdTable, Slasher, SlasherArgs, SlashingConfig, SlashingDetector, SlashingError,
        SlashingNotifier, SlashingNotifierArgs, SlashingProof, SlashingTxProcessor,
        SlashingType,
    };
    use shared_crypto::{Blake3Hasher, Ed25519Signer};
    use shared_types::adapters::{
        BincodeMarshalizer, HexPubkeyConverter, InMemoryAccounts, ManualRounder,
        StaticNodesCoordinator,
    };
    use shared_types::{
        BlockHeader, Hasher, InterceptedHeader, Marshalizer, PrivateKey, ShardId,
        SmartContractResult, ValidatorAccount, METACHAIN_SHARD_ID, U256,
    };
    use std::sync::Arc;
    use std::time::Duration;

    const ROUND: u64 = 10;
    const SHARD: ShardId = 0;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Eligible list of shard `SHARD`, built from validator key seeds.
    fn group(seeds: &[u8], group_size: usize) -> Arc<StaticNodesCoordinator> {
        let keys = seeds
            .iter()
            .map(|seed| Ed25519Signer::key_from_seed([*seed; 32]).public_key().to_vec())
            .collect();
        Arc::new(StaticNodesCoordinator::new(group_size).with_shard(SHARD, keys))
    }

    /// One reporting node, the coordinating chain's slasher and the shared
    /// account state. Shard nodes and the slasher see the same consensus
    /// groups.
    struct Network {
        accounts: Arc<InMemoryAccounts>,
        marshalizer: Arc<BincodeMarshalizer>,
        processor: SlashingTxProcessor<BincodeMarshalizer>,
        slasher: Slasher<BincodeMarshalizer>,
        coordinator: Arc<StaticNodesCoordinator>,
        rounder: Arc<ManualRounder>,
        config: SlashingConfig,
    }

    impl Network {
        fn new(coordinator: Arc<StaticNodesCoordinator>) -> Self {
            sg_telemetry::init_test_logging();
            let config = SlashingConfig::for_testing();
            config.validate().unwrap();

            let accounts = Arc::new(InMemoryAccounts::new());
            let marshalizer = Arc::new(BincodeMarshalizer);
            let rounder = Arc::new(ManualRounder::new(ROUND as i64, Duration::from_secs(6)));
            let processor = SlashingTxProcessor::new(
                Arc::new(Ed25519Signer),
                marshalizer.clone(),
                Arc::new(HexPubkeyConverter::new(32)),
                config.slashing_sc_address.clone(),
            )
            .unwrap();
            let proposals = MultipleHeaderProposalsDetector::new(
                &config.detector,
                coordinator.clone(),
                rounder.clone(),
            )
            .unwrap();
            let signing =
                MultipleHeaderSigningDetector::new(&config.detector, coordinator.clone(), rounder.clone())
                    .unwrap();
            let validators: Vec<Arc<dyn SlashingDetector>> =
                vec![Arc::new(proposals), Arc::new(signing)];
            let slasher = Slasher::new(SlasherArgs {
                accounts: accounts.clone(),
                hasher: Arc::new(Blake3Hasher),
                signer: Arc::new(Ed25519Signer),
                marshalizer: marshalizer.clone(),
                proof_ids: ProofIdTable::default(),
                penalty: config.penalty,
                validators,
            })
            .unwrap();
            Self {
                accounts,
                marshalizer,
                processor,
                slasher,
                coordinator,
                rounder,
                config,
            }
        }

        fn proposals(
            &self,
        ) -> MultipleHeaderProposalsDetector<StaticNodesCoordinator, ManualRounder> {
            MultipleHeaderProposalsDetector::new(
                &self.config.detector,
                self.coordinator.clone(),
                self.rounder.clone(),
            )
            .unwrap()
        }

        fn signing(&self) -> MultipleHeaderSigningDetector<StaticNodesCoordinator, ManualRounder> {
            MultipleHeaderSigningDetector::new(
                &self.config.detector,
                self.coordinator.clone(),
                self.rounder.clone(),
            )
            .unwrap()
        }

        /// A node whose account pays for its slashing transactions.
        fn reporter(&self, seed: u8, nonce: u64) -> SlashingNotifier<BincodeMarshalizer> {
            let key = Ed25519Signer::key_from_seed([seed; 32]);
            self.accounts.insert(ValidatorAccount::new(
                key.public_key().to_vec(),
                nonce,
                U256::from(100u64),
            ));
            SlashingNotifier::new(SlashingNotifierArgs {
                private_key: key,
                signer: Arc::new(Ed25519Signer),
                accounts: self.accounts.clone(),
                hasher: Arc::new(Blake3Hasher),
                marshalizer: self.marshalizer.clone(),
                pubkey_converter: Arc::new(HexPubkeyConverter::new(32)),
                extractor: Arc::new(MarshalProofTxDataExtractor::new(self.marshalizer.clone())),
                proof_ids: ProofIdTable::default(),
                tx_config: self.config.commitment,
            })
            .unwrap()
        }

        fn validator(&self, seed: u8, balance: u64) -> PrivateKey {
            let key = Ed25519Signer::key_from_seed([seed; 32]);
            self.accounts.insert(ValidatorAccount::new(
                key.public_key().to_vec(),
                0,
                U256::from(balance),
            ));
            key
        }

        fn account(&self, key: &PrivateKey) -> ValidatorAccount {
            self.accounts.get(key.public_key()).unwrap()
        }

        /// Commitment then reveal, each forwarded and adjudicated.
        fn commit_and_reveal(
            &self,
            notifier: &SlashingNotifier<BincodeMarshalizer>,
            proof: &SlashingProof,
        ) -> SmartContractResult {
            let commitment = notifier.create_shard_slashing_transaction(proof).unwrap();
            let forwarded = self.processor.process_tx(&commitment);
            assert!(!forwarded.is_no_op(), "{}", forwarded.return_message);
            let registered = self.slasher.execute_slash(&forwarded);
            assert!(!registered.is_no_op(), "{}", registered.return_message);

            let reveal = notifier.create_reveal_transaction(proof).unwrap();
            let forwarded = self.processor.process_tx(&reveal);
            assert!(!forwarded.is_no_op(), "{}", forwarded.return_message);
            self.slasher.execute_slash(&forwarded)
        }
    }

    fn intercepted(header: BlockHeader) -> InterceptedHeader {
        let bytes = BincodeMarshalizer.marshal(&header).unwrap();
        let hash = Blake3Hasher.compute(&bytes);
        InterceptedHeader::new(header, hash)
    }

    fn header(rand_seed: u8, bitmap: u8) -> BlockHeader {
        BlockHeader {
            shard_id: SHARD,
            round: ROUND,
            nonce: 7,
            prev_rand_seed: b"previous randomness".to_vec(),
            rand_seed: vec![rand_seed; 8],
            pub_keys_bitmap: vec![bitmap],
            ..Default::default()
        }
    }

    // =============================================================================
    // MULTIPLE PROPOSALS
    // =============================================================================

    #[test]
    fn test_double_proposal_is_slashed_end_to_end() {
        let net = Network::new(group(&[1], 1));
        let offender = net.validator(1, 1000);
        let detector = net.proposals();

        assert!(matches!(
            detector.verify_data(&intercepted(header(1, 1))),
            Err(SlashingError::NoSlashingEventDetected)
        ));
        let proof = detector.verify_data(&intercepted(header(2, 1))).unwrap();
        assert_eq!(proof.slash_type(), SlashingType::MultipleProposal);
        detector.validate_proof(&proof).unwrap();

        let notifier = net.reporter(9, 5);
        let result = net.commit_and_reveal(&notifier, &proof);

        assert!(!result.is_no_op(), "{}", result.return_message);
        let punished = net.account(&offender);
        assert!(punished.is_jailed);
        assert!(!punished.is_active);
        assert_eq!(punished.balance, U256::from(900u64));
        assert!(net.slasher.is_slashed(offender.public_key(), ROUND, SHARD));
        assert_eq!(net.slasher.pending_commitments(), 0);
    }

    #[test]
    fn test_commitment_transaction_layout() {
        let net = Network::new(group(&[1], 1));
        net.validator(1, 1000);
        let proof = detected_proof(&net);

        let notifier = net.reporter(9, 5);
        let tx = notifier.create_shard_slashing_transaction(&proof).unwrap();

        assert!(tx.data.starts_with(b"SlashCommitment@\x01@0@10@"));
        // Only the hash's signature and checksum travel; the evidence stays
        // private until the reveal.
        let proof_bytes = net.marshalizer.marshal(&proof).unwrap();
        assert!(!tx
            .data
            .windows(proof_bytes.len())
            .any(|window| window == proof_bytes.as_slice()));
        assert!(tx.data.len() < proof_bytes.len());
        assert_eq!(tx.rcv_addr, None);
        assert_eq!(tx.snd_addr, notifier.public_key());
        assert_eq!(tx.nonce, 5);
        assert_eq!(tx.value, U256::from(CommitmentTxConfig::default().value));
        assert_eq!(tx.gas_limit, 70_000);
        assert!(notifier
            .create_meta_slashing_escalated_transaction(&proof)
            .is_none());

        let scr = net.processor.process_tx(&tx);
        assert_eq!(scr.destination_shard, METACHAIN_SHARD_ID);
        assert_eq!(scr.original_sender, notifier.public_key());
        assert_eq!(scr.rcv_addr, net.config.slashing_sc_address);
        assert_eq!(scr.data, tx.data);
    }

    // =============================================================================
    // MULTIPLE SIGNING
    // =============================================================================

    #[test]
    fn test_double_signing_slashes_every_signer() {
        let net = Network::new(group(&[1, 2, 3, 4], 4));
        let validators: Vec<PrivateKey> = (1..=4).map(|seed| net.validator(seed, 1000)).collect();
        let detector = net.signing();

        let _ = detector.verify_data(&intercepted(header(1, 0b1111)));
        let proof = detector.verify_data(&intercepted(header(2, 0b1111))).unwrap();
        assert_eq!(proof.offenders().len(), 4);
        detector.validate_proof(&proof).unwrap();

        let result = net.commit_and_reveal(&net.reporter(9, 0), &proof);

        assert!(!result.is_no_op(), "{}", result.return_message);
        for key in &validators {
            let account = net.account(key);
            assert!(account.is_jailed);
            assert_eq!(account.balance, U256::from(900u64));
        }
    }

    #[test]
    fn test_proof_from_other_detector_rejected() {
        let net = Network::new(group(&[1], 1));
        net.validator(1, 1000);
        let proof = detected_proof(&net);

        assert!(matches!(
            net.signing().validate_proof(&proof),
            Err(SlashingError::InvalidProof)
        ));
    }

    // =============================================================================
    // ADVERSARIAL REPORTERS
    // =============================================================================

    /// Double proposal by the leader of round `ROUND`, as a fresh detector
    /// sees it.
    fn detected_proof(net: &Network) -> SlashingProof {
        let detector = net.proposals();
        let _ = detector.verify_data(&intercepted(header(1, 1)));
        detector.verify_data(&intercepted(header(2, 1))).unwrap()
    }

    #[test]
    fn test_proof_naming_innocent_validator_is_no_op() {
        let net = Network::new(group(&[1], 1));
        net.validator(1, 1000);
        let victim = net.validator(2, 1000);

        // Real headers, but the proof blames a validator that proposed
        // neither of them.
        let mut forged = detected_proof(&net);
        if let SlashingProof::MultipleProposal(inner) = &mut forged {
            inner.proposer = victim.public_key().to_vec();
        }

        let result = net.commit_and_reveal(&net.reporter(9, 0), &forged);

        assert!(result.is_no_op());
        let account = net.account(&victim);
        assert!(!account.is_jailed);
        assert!(account.is_active);
        assert_eq!(account.balance, U256::from(1000u64));
        assert!(!net.slasher.is_slashed(victim.public_key(), ROUND, SHARD));
    }

    #[test]
    fn test_reveal_without_own_commitment_is_no_op() {
        let net = Network::new(group(&[1], 1));
        let offender = net.validator(1, 1000);
        let proof = detected_proof(&net);

        let honest = net.reporter(9, 0);
        let commitment = honest.create_shard_slashing_transaction(&proof).unwrap();
        net.slasher
            .execute_slash(&net.processor.process_tx(&commitment));

        // Another node saw the proof and races to reveal it first.
        let copycat = net.reporter(8, 0);
        let reveal = copycat.create_reveal_transaction(&proof).unwrap();
        let result = net.slasher.execute_slash(&net.processor.process_tx(&reveal));

        assert!(result.is_no_op());
        assert_eq!(net.account(&offender).balance, U256::from(1000u64));
        assert_eq!(net.slasher.pending_commitments(), 1);

        let reveal = honest.create_reveal_transaction(&proof).unwrap();
        let result = net.slasher.execute_slash(&net.processor.process_tx(&reveal));
        assert!(!result.is_no_op(), "{}", result.return_message);
    }

    #[test]
    fn test_tampered_transaction_is_no_op() {
        let net = Network::new(group(&[1], 1));
        net.validator(1, 1000);
        let proof = detected_proof(&net);
        let notifier = net.reporter(9, 0);

        let mut tx = notifier.create_shard_slashing_transaction(&proof).unwrap();
        tx.nonce += 1;
        assert!(net.processor.process_tx(&tx).is_no_op());

        let mut tx = notifier.create_shard_slashing_transaction(&proof).unwrap();
        tx.rcv_addr = Some(vec![1; 32]);
        assert!(net.processor.process_tx(&tx).is_no_op());
    }

    #[test]
    fn test_offender_slashed_once_per_round() {
        let net = Network::new(group(&[1], 1));
        let offender = net.validator(1, 1000);
        let proof = detected_proof(&net);

        let first = net.commit_and_reveal(&net.reporter(9, 0), &proof);
        assert!(!first.is_no_op());

        let second = net.commit_and_reveal(&net.reporter(8, 0), &proof);
        assert!(second.is_no_op());
        assert_eq!(net.account(&offender).balance, U256::from(900u64));
    }

    #[test]
    fn test_stale_commitments_pruned() {
        let net = Network::new(group(&[1], 1));
        net.validator(1, 1000);
        let proof = detected_proof(&net);

        let commitment = net
            .reporter(9, 0)
            .create_shard_slashing_transaction(&proof)
            .unwrap();
        net.slasher
            .execute_slash(&net.processor.process_tx(&commitment));
        assert_eq!(net.slasher.pending_commitments(), 1);

        assert_eq!(net.slasher.prune_commitments_before(ROUND), 0);
        assert_eq!(net.slasher.prune_commitments_before(ROUND + 1), 1);
        assert_eq!(net.slasher.pending_commitments(), 0);
    }

    #[test]
    fn test_custom_penalty_policy() {
        let policy = PenaltyPolicy {
            medium_percent: 25,
            ..PenaltyPolicy::default()
        };
        assert_eq!(policy.percent(sg_02_slashing::ThreatLevel::Medium), 25);
        assert_eq!(policy.percent(sg_02_slashing::ThreatLevel::Low), 0);
    }
}
