//! # Fork Detector Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | `add_header` (received, linear chain) | < 10µs |
//! | `check_fork` over a forked window | < 50µs |
//! | Proposal detector, second header of a round | < 20µs |

use criterion::{black_box, BatchSize, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use sg_01_fork_detection::{
    BlockHeaderState, ChainKind, ForkDetector, ForkDetectorApi, ForkDetectorConfig,
};
use sg_02_slashing::{DetectorConfig, MultipleHeaderProposalsDetector, SlashingDetector};
use shared_types::adapters::{ManualRounder, StaticNodesCoordinator, TimeCacheBlacklist};
use shared_types::{BlockHeader, InterceptedHeader};
use std::sync::Arc;
use std::time::Duration;

fn header(nonce: u64, round: u64) -> BlockHeader {
    BlockHeader {
        nonce,
        round,
        prev_rand_seed: vec![1; 32],
        rand_seed: vec![2; 32],
        pub_keys_bitmap: vec![0xff],
        ..Default::default()
    }
}

fn detector(rounder: Arc<ManualRounder>) -> ForkDetector<ManualRounder, TimeCacheBlacklist> {
    ForkDetector::new(
        ForkDetectorConfig::for_testing(ChainKind::Meta),
        rounder,
        Arc::new(TimeCacheBlacklist::new(Duration::from_secs(60))),
    )
    .expect("valid config")
}

// ============================================================================
// SG-01: Fork Detection
// ============================================================================

fn bench_add_header(c: &mut Criterion) {
    let mut group = c.benchmark_group("sg-01-add-header");

    for chain_len in [16u64, 128, 1024] {
        group.throughput(Throughput::Elements(chain_len));
        group.bench_with_input(
            BenchmarkId::new("received_chain", chain_len),
            &chain_len,
            |b, &len| {
                b.iter(|| {
                    let rounder = Arc::new(ManualRounder::new(0, Duration::from_secs(6)));
                    let fd = detector(rounder.clone());
                    for nonce in 1..=len {
                        rounder.set_index(nonce as i64);
                        let _ = fd.add_header(
                            &header(nonce, nonce),
                            &nonce.to_be_bytes(),
                            BlockHeaderState::Received,
                            &[],
                            &[],
                            false,
                        );
                    }
                    black_box(fd.probable_highest_nonce())
                })
            },
        );
    }
    group.finish();
}

fn bench_check_fork(c: &mut Criterion) {
    let mut group = c.benchmark_group("sg-01-check-fork");
    let mut rng = rand::thread_rng();

    let rounder = Arc::new(ManualRounder::new(8, Duration::from_secs(6)));
    let fd = detector(rounder);
    for nonce in 1..=8u64 {
        for _ in 0..4 {
            let hash: [u8; 32] = rng.gen();
            let _ = fd.add_header(
                &header(nonce, 8),
                &hash,
                BlockHeaderState::Received,
                &[],
                &[],
                false,
            );
        }
    }

    group.bench_function("forked_window", |b| b.iter(|| black_box(fd.check_fork())));
    group.finish();
}

// ============================================================================
// SG-02: Slashing Detection
// ============================================================================

fn bench_proposal_detector(c: &mut Criterion) {
    let mut group = c.benchmark_group("sg-02-detector");
    let validators: Vec<Vec<u8>> = (0u8..16).map(|i| vec![i; 32]).collect();
    let coordinator = Arc::new(StaticNodesCoordinator::new(8).with_shard(0, validators));
    let rounder = Arc::new(ManualRounder::new(10, Duration::from_secs(6)));
    let first = InterceptedHeader::new(header(1, 10), vec![0xaa; 32]);
    let second = InterceptedHeader::new(header(1, 10), vec![0xbb; 32]);

    group.bench_function("detect_double_proposal", |b| {
        b.iter_batched(
            || {
                let detector = MultipleHeaderProposalsDetector::new(
                    &DetectorConfig::default(),
                    coordinator.clone(),
                    rounder.clone(),
                )
                .expect("valid detector config");
                let _ = detector.verify_data(&first);
                detector
            },
            |detector| black_box(detector.verify_data(&second).is_ok()),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_add_header, bench_check_fork, bench_proposal_detector);
criterion_main!(benches);
