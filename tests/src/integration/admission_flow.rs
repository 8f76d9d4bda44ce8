//! # Admission Flow
//!
//! Peer authentications signed with Ed25519, batched, serialized with
//! bincode and pushed through the full interceptor stack: antiflood,
//! throttling, decoding, signature checks and the observer budget.

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use sg_03_interceptors::adapters::{
        PeerAuthenticationDataFactory, SignerPeerSignatureHandler, TokenBucketAntiflood,
        ValidatorSetChecker,
    };
    use sg_03_interceptors::ports::PeerAuthenticationProcessor;
    use sg_03_interceptors::{
        ConcurrencyThrottler, InterceptedPeerAuthentication, InterceptorConfig, InterceptorError,
        InterceptorResult, InterceptorThrottler, MessageAdmission, MessageBatch, P2pMessage,
        PeerAuthentication, PeerAuthenticationInterceptor, PeerAuthenticationInterceptorArgs,
    };
    use shared_crypto::{Blake3Hasher, Ed25519Signer};
    use shared_types::adapters::{BincodeMarshalizer, TimeCacheBlacklist};
    use shared_types::{
        InterceptedData, Marshalizer, PeerId, PrivateKey, ShardId, SingleSigner,
        WhiteListHandler,
    };
    use std::sync::Arc;
    use std::time::Duration;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Heartbeat store stand-in: remembers who authenticated.
    #[derive(Default)]
    struct HeartbeatRecorder {
        seen: Mutex<Vec<(Vec<u8>, Option<ShardId>)>>,
    }

    impl PeerAuthenticationProcessor for HeartbeatRecorder {
        fn process_received(
            &self,
            data: &InterceptedPeerAuthentication,
            _from: &PeerId,
        ) -> InterceptorResult<()> {
            self.seen
                .lock()
                .push((data.pubkey().to_vec(), data.computed_shard_id()));
            Ok(())
        }
    }

    struct NothingRequested;

    impl WhiteListHandler for NothingRequested {
        fn is_white_listed(&self, _data: &dyn InterceptedData) -> bool {
            false
        }
    }

    struct Node {
        interceptor: Arc<PeerAuthenticationInterceptor<BincodeMarshalizer>>,
        recorder: Arc<HeartbeatRecorder>,
        validators: Arc<ValidatorSetChecker>,
        blacklist: Arc<TimeCacheBlacklist>,
        throttler: Arc<ConcurrencyThrottler>,
        topic: String,
    }

    impl Node {
        fn new(flood_capacity: u64) -> Self {
            sg_telemetry::init_test_logging();
            let config = InterceptorConfig::default();
            let marshalizer = Arc::new(BincodeMarshalizer);
            let blacklist = Arc::new(TimeCacheBlacklist::new(Duration::from_secs(300)));
            let throttler = Arc::new(ConcurrencyThrottler::new(config.max_concurrent_messages));
            let recorder = Arc::new(HeartbeatRecorder::default());
            let validators = Arc::new(ValidatorSetChecker::new());

            let admission = MessageAdmission::new(
                config.topic.clone(),
                marshalizer.clone(),
                Arc::new(TokenBucketAntiflood::new(flood_capacity, 0)),
                throttler.clone(),
                blacklist.clone(),
            );
            let factory = PeerAuthenticationDataFactory::new(
                marshalizer,
                Arc::new(Blake3Hasher),
                Arc::new(SignerPeerSignatureHandler::new(Arc::new(Ed25519Signer))),
                config.min_property_len,
                config.max_property_len,
            );
            let topic = config.topic.clone();
            let observers = config.max_concurrent_observer_messages;
            let interceptor = PeerAuthenticationInterceptor::new(PeerAuthenticationInterceptorArgs {
                config,
                admission,
                factory: Arc::new(factory),
                processor: recorder.clone(),
                validator_checker: validators.clone(),
                whitelist: Arc::new(NothingRequested),
                observers_throttler: Arc::new(ConcurrencyThrottler::new(observers)),
            })
            .unwrap();

            Self {
                interceptor: Arc::new(interceptor),
                recorder,
                validators,
                blacklist,
                throttler,
                topic,
            }
        }

        fn message(&self, from: &PeerId, auths: &[PeerAuthentication]) -> P2pMessage {
            let batch = MessageBatch {
                data: auths
                    .iter()
                    .map(|auth| BincodeMarshalizer.marshal(auth).unwrap())
                    .collect(),
            };
            P2pMessage::new(
                from.clone(),
                self.topic.clone(),
                BincodeMarshalizer.marshal(&batch).unwrap(),
            )
        }
    }

    /// A peer authentication whose signature binds `key` to `pid`.
    fn authenticate(key: &PrivateKey, pid: &PeerId) -> PeerAuthentication {
        let signer = Ed25519Signer;
        let payload = b"timestamp=1700000000".to_vec();
        PeerAuthentication {
            pubkey: key.public_key().to_vec(),
            signature: signer.sign(key, pid.as_bytes()).unwrap(),
            pid: pid.as_bytes().to_vec(),
            payload_signature: signer.sign(key, &payload).unwrap(),
            payload,
            hardfork_payload: Vec::new(),
        }
    }

    fn peer(tag: u8) -> PeerId {
        PeerId(vec![0x12, 0x20, tag, tag])
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    #[test]
    fn test_validator_authentication_accepted() {
        let node = Node::new(10);
        let key = Ed25519Signer::key_from_seed([1; 32]);
        node.validators.insert(key.public_key().to_vec(), 2);
        let pid = peer(1);

        node.interceptor
            .process_received_message(&node.message(&pid, &[authenticate(&key, &pid)]), &pid)
            .unwrap();

        assert_eq!(
            node.recorder.seen.lock().as_slice(),
            &[(key.public_key().to_vec(), Some(2))]
        );
        assert_eq!(node.throttler.in_flight(), 0);
    }

    #[test]
    fn test_observer_authentication_accepted_without_shard() {
        let node = Node::new(10);
        let key = Ed25519Signer::key_from_seed([2; 32]);
        let pid = peer(2);

        node.interceptor
            .process_received_message(&node.message(&pid, &[authenticate(&key, &pid)]), &pid)
            .unwrap();

        assert_eq!(
            node.recorder.seen.lock().as_slice(),
            &[(key.public_key().to_vec(), None)]
        );
    }

    #[test]
    fn test_stolen_identity_blacklists_sender() {
        let node = Node::new(10);
        let victim = Ed25519Signer::key_from_seed([3; 32]);
        let attacker = peer(0xee);

        // Signature binds the victim's key to the victim's peer id; the
        // attacker rewrites the pid to its own.
        let mut forged = authenticate(&victim, &peer(3));
        forged.pid = attacker.as_bytes().to_vec();

        let err = node
            .interceptor
            .process_received_message(&node.message(&attacker, &[forged]), &attacker)
            .unwrap_err();

        assert!(matches!(err, InterceptorError::InvalidData(_)));
        assert!(node.blacklist.cause(attacker.as_bytes()).is_some());
        assert!(node.recorder.seen.lock().is_empty());

        // Further traffic from the peer is refused before decoding.
        let key = Ed25519Signer::key_from_seed([4; 32]);
        let honest_looking = node.message(&attacker, &[authenticate(&key, &attacker)]);
        assert!(matches!(
            node.interceptor
                .process_received_message(&honest_looking, &attacker),
            Err(InterceptorError::PeerBlacklisted { .. })
        ));
    }

    #[test]
    fn test_relayed_authentication_ignored_without_blame() {
        let node = Node::new(10);
        let key = Ed25519Signer::key_from_seed([5; 32]);
        let origin = peer(5);
        let relay = peer(6);

        let err = node
            .interceptor
            .process_received_message(&node.message(&relay, &[authenticate(&key, &origin)]), &relay)
            .unwrap_err();

        assert!(err.is_ignored());
        assert!(node.blacklist.is_empty());
        assert!(node.recorder.seen.lock().is_empty());
    }

    #[test]
    fn test_flooding_peer_rejected() {
        let node = Node::new(2);
        let key = Ed25519Signer::key_from_seed([7; 32]);
        node.validators.insert(key.public_key().to_vec(), 0);
        let pid = peer(7);
        let message = node.message(&pid, &[authenticate(&key, &pid)]);

        node.interceptor
            .process_received_message(&message, &pid)
            .unwrap();
        node.interceptor
            .process_received_message(&message, &pid)
            .unwrap();
        assert!(matches!(
            node.interceptor.process_received_message(&message, &pid),
            Err(InterceptorError::Flooded { .. })
        ));
        assert_eq!(node.recorder.seen.lock().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_validators_all_processed() {
        let node = Node::new(10);
        let mut handles = Vec::new();

        for seed in 10u8..30 {
            let key = Ed25519Signer::key_from_seed([seed; 32]);
            node.validators.insert(key.public_key().to_vec(), u32::from(seed % 3));
            let pid = peer(seed);
            let message = node.message(&pid, &[authenticate(&key, &pid)]);
            let interceptor = node.interceptor.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                interceptor.process_received_message(&message, &pid)
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(node.recorder.seen.lock().len(), 20);
        assert!(node.throttler.can_process());
        assert_eq!(node.throttler.in_flight(), 0);
    }
}
