//! # Fork Detector Service
//!
//! Owns the header tracker and checkpoint ledger of one chain context and
//! serializes every mutation behind a single write lock.
//!
//! ## `add_header` pipeline
//!
//! ```text
//! basic validity ─► should add? ─► duplicate? ─► checkpoint monotonic?
//!        │               │              │                │
//!        └───────────────┴──── Err ─────┴────────────────┘ (no mutation)
//!                                                          │ Ok
//!                                                          ▼
//!  forced fork ─► append record ─► [Processed] checkpoint + final + prune
//!                                                          │
//!                                                          ▼
//!                                  probable highest nonce, last block round
//! ```

use crate::config::{ChainKind, ForkDetectorConfig};
use crate::domain::{
    BlockHeaderState, CheckpointInfo, CheckpointLedger, ForkInfo, HeaderRecord, HeaderTracker,
    NonceState,
};
use crate::error::{ForkDetectorError, ForkDetectorResult};
use crate::metrics;
use crate::ports::{BlackListHandler, ForkDetectorApi, Rounder};
use parking_lot::RwLock;
use shared_types::BlockHeader;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Round attributed to notarized records when choosing a fork candidate.
const MIN_FORK_ROUND: u64 = 0;

/// Scalar view of the detector taken under one read guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForkDetectorSnapshot {
    pub final_checkpoint: CheckpointInfo,
    pub last_checkpoint: CheckpointInfo,
    pub last_block_round: u64,
    pub probable_highest_nonce: u64,
    pub is_notarized_shard_stuck: bool,
    pub last_round_with_forced_fork: i64,
}

#[derive(Clone, Debug)]
struct ForkDetectorState {
    headers: HeaderTracker,
    checkpoints: CheckpointLedger,
    last_block_round: u64,
    probable_highest_nonce: u64,
    is_notarized_shard_stuck: bool,
    roll_back_nonce: Option<u64>,
    last_round_with_forced_fork: i64,
    /// Final or superseded outcomes of nonces already behind the final
    /// checkpoint.
    settled: BTreeMap<u64, NonceState>,
}

impl ForkDetectorState {
    fn new(config: &ForkDetectorConfig) -> Self {
        let genesis = CheckpointInfo::new(config.genesis_nonce, config.genesis_round);
        Self {
            headers: HeaderTracker::new(),
            checkpoints: CheckpointLedger::new(genesis),
            last_block_round: config.genesis_round,
            probable_highest_nonce: config.genesis_nonce,
            is_notarized_shard_stuck: false,
            roll_back_nonce: None,
            last_round_with_forced_fork: 0,
            settled: BTreeMap::new(),
        }
    }

    fn is_syncing(&self, config: &ForkDetectorConfig) -> bool {
        let difference =
            self.probable_highest_nonce as i64 - self.checkpoints.last().nonce as i64;
        difference > config.nonce_difference_when_synced
    }

    /// Highest nonce reachable from the final checkpoint through consecutive
    /// accepted records with strictly increasing rounds. A slot holding
    /// competing hashes and no confirmed record can be reached but not
    /// passed.
    fn compute_probable_highest_nonce(&self, current_round: i64) -> u64 {
        let final_checkpoint = self.checkpoints.final_checkpoint();
        let mut highest = final_checkpoint.nonce;
        let mut prev_round = final_checkpoint.round;
        let mut nonce = final_checkpoint.nonce.saturating_add(1);

        loop {
            let records: Vec<&HeaderRecord> = self
                .headers
                .at(nonce)
                .iter()
                .filter(|r| r.state != BlockHeaderState::Proposed)
                .collect();
            if records.is_empty() {
                break;
            }

            let confirmed = records.iter().find(|r| r.state.is_confirmed());
            let chosen = match confirmed {
                Some(record) => *record,
                None if self.headers.distinct_hashes(nonce) > 1 => {
                    if records.iter().any(|r| r.round > prev_round) {
                        highest = nonce;
                    }
                    break;
                }
                None => match records
                    .iter()
                    .min_by_key(|r| (r.round as i64 - current_round).unsigned_abs())
                {
                    Some(record) => *record,
                    None => break,
                },
            };

            if chosen.round <= prev_round {
                break;
            }
            highest = nonce;
            prev_round = chosen.round;
            nonce = nonce.saturating_add(1);
        }

        highest.max(final_checkpoint.nonce)
    }

    /// Marks nonces in `(from, to]` as final or superseded.
    fn settle(&mut self, from: u64, to: u64, history_len: usize) {
        for nonce in from.saturating_add(1)..=to {
            let outcome = if self.headers.at(nonce).iter().any(|r| r.state.is_confirmed()) {
                NonceState::Final
            } else {
                NonceState::Superseded
            };
            self.settled.insert(nonce, outcome);
        }
        while self.settled.len() > history_len {
            self.settled.pop_first();
        }
    }

    fn remove_past_or_invalid_records(&mut self) {
        let final_checkpoint = self.checkpoints.final_checkpoint();
        self.headers.remove_below(final_checkpoint.nonce);
        self.headers
            .remove_invalid_received(final_checkpoint.nonce, final_checkpoint.round);
        self.checkpoints.remove_behind_final();
    }

    /// Highest nonce above the final checkpoint where a processed and a
    /// notarized record agree on the hash.
    fn highest_notarized_match(&self) -> Option<CheckpointInfo> {
        let final_nonce = self.checkpoints.final_checkpoint().nonce;
        let last_nonce = self.checkpoints.last().nonce;

        self.headers
            .iter()
            .filter(|(nonce, _)| *nonce > final_nonce && *nonce <= last_nonce)
            .filter_map(|(nonce, records)| {
                records
                    .iter()
                    .filter(|r| r.state == BlockHeaderState::Processed)
                    .find(|processed| {
                        records.iter().any(|r| {
                            r.state == BlockHeaderState::Notarized && r.hash == processed.hash
                        })
                    })
                    .map(|processed| CheckpointInfo::new(nonce, processed.round))
            })
            .last()
    }

    fn notarized_hash(&self, nonce: u64) -> Option<Vec<u8>> {
        self.headers
            .at(nonce)
            .iter()
            .find(|r| r.state == BlockHeaderState::Notarized)
            .map(|r| r.hash.clone())
    }
}

/// Fork detector for one shard or for the coordinating chain.
pub struct ForkDetector<R, B>
where
    R: Rounder,
    B: BlackListHandler,
{
    config: ForkDetectorConfig,
    rounder: Arc<R>,
    blacklist: Arc<B>,
    state: RwLock<ForkDetectorState>,
}

/// Header fields come off the wire; values past `i64::MAX` clamp instead of
/// wrapping negative.
fn saturating_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl<R, B> ForkDetector<R, B>
where
    R: Rounder,
    B: BlackListHandler,
{
    pub fn new(
        config: ForkDetectorConfig,
        rounder: Arc<R>,
        blacklist: Arc<B>,
    ) -> ForkDetectorResult<Self> {
        config.validate()?;
        let state = RwLock::new(ForkDetectorState::new(&config));
        Ok(Self {
            config,
            rounder,
            blacklist,
            state,
        })
    }

    pub fn config(&self) -> &ForkDetectorConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ForkDetectorSnapshot {
        let state = self.state.read();
        ForkDetectorSnapshot {
            final_checkpoint: state.checkpoints.final_checkpoint(),
            last_checkpoint: state.checkpoints.last(),
            last_block_round: state.last_block_round,
            probable_highest_nonce: state.probable_highest_nonce,
            is_notarized_shard_stuck: state.is_notarized_shard_stuck,
            last_round_with_forced_fork: state.last_round_with_forced_fork,
        }
    }

    pub fn final_checkpoint(&self) -> CheckpointInfo {
        self.state.read().checkpoints.final_checkpoint()
    }

    pub fn last_checkpoint(&self) -> CheckpointInfo {
        self.state.read().checkpoints.last()
    }

    pub fn last_block_round(&self) -> u64 {
        self.state.read().last_block_round
    }

    pub fn roll_back_nonce(&self) -> Option<u64> {
        self.state.read().roll_back_nonce
    }

    pub fn headers_at(&self, nonce: u64) -> Vec<HeaderRecord> {
        self.state.read().headers.at(nonce).to_vec()
    }

    /// Genesis time implied by the header's round and timestamp, `None` when
    /// the values do not fit the arithmetic.
    fn genesis_time_from_header(&self, header: &BlockHeader) -> Option<i64> {
        let round_duration = i64::try_from(self.rounder.time_duration().as_secs()).ok()?;
        let rounds = i64::try_from(header.round)
            .ok()?
            .checked_sub(i64::try_from(self.config.genesis_round).ok()?)?;
        i64::try_from(header.timestamp)
            .ok()?
            .checked_sub(rounds.checked_mul(round_duration)?)
    }

    fn check_block_basic_validity(
        &self,
        state: &ForkDetectorState,
        header: &BlockHeader,
        header_hash: &[u8],
        header_state: BlockHeaderState,
        current_round: i64,
    ) -> ForkDetectorResult<()> {
        let final_checkpoint = state.checkpoints.final_checkpoint();
        let round_dif = saturating_signed(header.round)
            .saturating_sub(saturating_signed(final_checkpoint.round));
        let nonce_dif = saturating_signed(header.nonce)
            .saturating_sub(saturating_signed(final_checkpoint.nonce));
        let next_round = current_round.saturating_add(1);

        self.blacklist.sweep();
        if self.blacklist.has(&header.prev_hash) {
            self.blacklist
                .add(header_hash, "previous header is blacklisted");
            warn!(
                "[sg-01] Header at nonce {} blacklisted, previous header is blacklisted",
                header.nonce
            );
            return Err(ForkDetectorError::HeaderIsBlackListed);
        }
        if header_state == BlockHeaderState::Received {
            if let Some(expected) = self.config.genesis_time {
                let actual = self.genesis_time_from_header(header);
                if actual != Some(expected) {
                    return Err(ForkDetectorError::GenesisTimeMismatch { expected, actual });
                }
            }
        }
        if round_dif < 0 {
            return Err(ForkDetectorError::LowerRoundInBlock {
                round: header.round,
                min: final_checkpoint.round as i64,
            });
        }
        if nonce_dif < 0 {
            return Err(ForkDetectorError::LowerNonceInBlock {
                nonce: header.nonce,
                final_nonce: final_checkpoint.nonce,
            });
        }
        if saturating_signed(header.round) > next_round {
            return Err(ForkDetectorError::HigherRoundInBlock {
                round: header.round,
                max: next_round,
            });
        }
        if round_dif < nonce_dif {
            return Err(ForkDetectorError::HigherNonceInBlock {
                nonce: header.nonce,
                round: header.round,
            });
        }
        if header_state == BlockHeaderState::Proposed && !header.has_valid_rand_seed() {
            return Err(ForkDetectorError::RandomSeedNotValid);
        }
        let needs_signature = matches!(
            header_state,
            BlockHeaderState::Received | BlockHeaderState::Processed
        );
        if needs_signature && !header.is_signed() {
            return Err(ForkDetectorError::BlockIsNotSigned);
        }
        Ok(())
    }

    fn should_add_block_in_fork_detector(
        &self,
        state: &ForkDetectorState,
        header: &BlockHeader,
        header_state: BlockHeaderState,
        current_round: i64,
    ) -> ForkDetectorResult<()> {
        let nonces_difference = state.probable_highest_nonce as i64 - header.nonce as i64;
        let is_syncing = header_state == BlockHeaderState::Received
            && nonces_difference > self.config.max_nonces_difference;
        if header_state == BlockHeaderState::Processed || is_syncing {
            return Ok(());
        }

        let min = current_round - self.config.block_finality;
        if (header.round as i64) < min {
            return Err(ForkDetectorError::LowerRoundInBlock {
                round: header.round,
                min,
            });
        }
        Ok(())
    }

    fn should_force_fork(
        &self,
        state: &ForkDetectorState,
        header: &BlockHeader,
        header_state: BlockHeaderState,
        current_round: i64,
    ) -> bool {
        if header_state != BlockHeaderState::Proposed || state.is_syncing(&self.config) {
            return false;
        }
        let last = state.checkpoints.last();
        let rounds_difference = header.round as i64 - last.round as i64;
        let nonces_difference = header.nonce as i64 - last.nonce as i64;
        let is_in_proper_round = current_round % self.config.round_modulus_trigger == 0;

        is_in_proper_round
            && rounds_difference > self.config.max_rounds_without_committed_block
            && nonces_difference <= 1
    }

    fn is_consensus_stuck(&self, state: &ForkDetectorState, current_round: i64) -> bool {
        if state.last_round_with_forced_fork == current_round {
            return false;
        }
        if state.is_syncing(&self.config) {
            return false;
        }
        current_round - state.last_block_round as i64
            > self.config.max_rounds_without_committed_block
    }

    fn try_add_header(
        &self,
        header: &BlockHeader,
        header_hash: &[u8],
        header_state: BlockHeaderState,
        final_headers: &[BlockHeader],
        final_headers_hashes: &[Vec<u8>],
        is_notarized_shard_stuck: bool,
    ) -> ForkDetectorResult<()> {
        if header_hash.is_empty() {
            return Err(ForkDetectorError::EmptyHash);
        }
        if final_headers.len() != final_headers_hashes.len() {
            return Err(ForkDetectorError::FinalHeadersMismatch {
                headers: final_headers.len(),
                hashes: final_headers_hashes.len(),
            });
        }

        let current_round = self.rounder.index();
        let mut state = self.state.write();

        self.check_block_basic_validity(&state, header, header_hash, header_state, current_round)?;
        if self.should_force_fork(&state, header, header_state, current_round) {
            state.last_round_with_forced_fork = current_round;
            info!("[sg-01] Forced fork activated in round {}", current_round);
        }
        self.should_add_block_in_fork_detector(&state, header, header_state, current_round)?;
        if state.headers.contains(header.nonce, header_hash, header_state) {
            return Err(ForkDetectorError::HeaderAlreadyProcessed {
                nonce: header.nonce,
            });
        }
        let is_processed = header_state == BlockHeaderState::Processed;
        let old_final = state.checkpoints.final_checkpoint();
        let previous_last = state.checkpoints.last();
        if is_processed {
            state
                .checkpoints
                .append(CheckpointInfo::new(header.nonce, header.round))?;
            metrics::record_checkpoint();
        }

        state.headers.append(HeaderRecord {
            epoch: header.epoch,
            nonce: header.nonce,
            round: header.round,
            hash: header_hash.to_vec(),
            state: header_state,
        });

        if is_processed {
            match self.config.chain {
                ChainKind::Meta => {
                    state.checkpoints.advance_final(previous_last);
                }
                ChainKind::Shard => {
                    for (final_header, hash) in final_headers.iter().zip(final_headers_hashes) {
                        if final_header.nonce < old_final.nonce {
                            continue;
                        }
                        state.headers.append(HeaderRecord {
                            epoch: final_header.epoch,
                            nonce: final_header.nonce,
                            round: final_header.round,
                            hash: hash.clone(),
                            state: BlockHeaderState::Notarized,
                        });
                    }
                    if let Some(notarized) = state.highest_notarized_match() {
                        state.checkpoints.advance_final(notarized);
                    }
                }
            }

            let new_final = state.checkpoints.final_checkpoint();
            if new_final != old_final {
                state.settle(old_final.nonce, new_final.nonce, self.config.settled_history_len);
                info!(
                    "[sg-01] Final checkpoint advanced from {} to {} (round {})",
                    old_final.nonce, new_final.nonce, new_final.round
                );
            }
            state.remove_past_or_invalid_records();
            state.is_notarized_shard_stuck = is_notarized_shard_stuck;
        }

        let probable_highest_nonce = state.compute_probable_highest_nonce(current_round);
        state.last_block_round = current_round.max(0) as u64;
        state.probable_highest_nonce = probable_highest_nonce;
        metrics::set_probable_highest_nonce(probable_highest_nonce);

        debug!(
            "[sg-01] Added header nonce={} round={} state={:?}, probable highest nonce {}",
            header.nonce, header.round, header_state, probable_highest_nonce
        );
        Ok(())
    }
}

impl<R, B> ForkDetectorApi for ForkDetector<R, B>
where
    R: Rounder,
    B: BlackListHandler,
{
    fn add_header(
        &self,
        header: &BlockHeader,
        header_hash: &[u8],
        state: BlockHeaderState,
        final_headers: &[BlockHeader],
        final_headers_hashes: &[Vec<u8>],
        is_notarized_shard_stuck: bool,
    ) -> ForkDetectorResult<()> {
        let result = self.try_add_header(
            header,
            header_hash,
            state,
            final_headers,
            final_headers_hashes,
            is_notarized_shard_stuck,
        );
        match &result {
            Ok(()) => metrics::record_header_added(),
            Err(err) => {
                metrics::record_header_rejected(err.label());
                debug!(
                    "[sg-01] Rejected header nonce={} round={}: {}",
                    header.nonce, header.round, err
                );
            }
        }
        result
    }

    fn check_fork(&self) -> ForkInfo {
        let current_round = self.rounder.index();
        let state = self.state.read();

        if self.is_consensus_stuck(&state, current_round) {
            metrics::record_fork_detected();
            warn!(
                "[sg-01] Consensus stuck: no committed block since round {}",
                state.last_block_round
            );
            return ForkInfo::stuck();
        }

        let mut fork = ForkInfo::none();
        for (nonce, records) in state.headers.iter() {
            if records.len() == 1 {
                continue;
            }
            let mut own: Option<&HeaderRecord> = None;
            let mut fork_hash: Option<&[u8]> = None;
            let mut fork_round = u64::MAX;

            for record in records {
                match record.state {
                    BlockHeaderState::Proposed => continue,
                    BlockHeaderState::Processed => {
                        own = Some(record);
                        continue;
                    }
                    _ => {}
                }
                let round = if record.state == BlockHeaderState::Notarized {
                    MIN_FORK_ROUND
                } else {
                    record.round
                };
                let lower_round = round < fork_round;
                let equal_round_lower_hash = round == fork_round
                    && fork_hash.map_or(true, |h| record.hash.as_slice() < h);
                if lower_round || equal_round_lower_hash {
                    fork_hash = Some(record.hash.as_slice());
                    fork_round = round;
                }
            }

            let (Some(own), Some(candidate)) = (own, fork_hash) else {
                continue;
            };
            let should_signal = own.hash.as_slice() != candidate
                && (own.round > fork_round
                    || (own.round == fork_round && own.hash.as_slice() > candidate));
            if should_signal && nonce < fork.nonce {
                fork = ForkInfo {
                    is_detected: true,
                    nonce,
                    round: fork_round,
                    hash: Some(candidate.to_vec()),
                };
            }
        }

        if fork.is_detected {
            metrics::record_fork_detected();
            warn!(
                "[sg-01] Fork detected at nonce {} (competing round {})",
                fork.nonce, fork.round
            );
        }
        fork
    }

    fn remove_header(&self, nonce: u64, hash: &[u8]) {
        let current_round = self.rounder.index();
        let mut state = self.state.write();
        if nonce <= state.checkpoints.final_checkpoint().nonce {
            return;
        }
        state.checkpoints.remove_at(nonce);
        state.headers.remove_hash(nonce, hash);
        state.probable_highest_nonce = state.compute_probable_highest_nonce(current_round);
        debug!("[sg-01] Removed header at nonce {}", nonce);
    }

    fn reset_fork(&self) {
        let current_round = self.rounder.index();
        let mut state = self.state.write();
        let final_nonce = state.checkpoints.final_checkpoint().nonce;
        let threshold = state.roll_back_nonce.take().unwrap_or(final_nonce).max(final_nonce);

        state.headers.remove_received_above(threshold);
        state.probable_highest_nonce = state.compute_probable_highest_nonce(current_round);
        state.last_round_with_forced_fork = current_round;
        info!(
            "[sg-01] Fork reset above nonce {}, probable highest nonce {}",
            threshold, state.probable_highest_nonce
        );
    }

    fn reset_probable_highest_nonce(&self) {
        let mut state = self.state.write();
        state.probable_highest_nonce = state.checkpoints.last().nonce;
    }

    fn restore_to_genesis(&self) {
        *self.state.write() = ForkDetectorState::new(&self.config);
        info!("[sg-01] Fork detector restored to genesis");
    }

    fn set_roll_back_nonce(&self, nonce: u64) {
        self.state.write().roll_back_nonce = Some(nonce);
    }

    fn get_notarized_header_hash(&self, nonce: u64) -> Option<Vec<u8>> {
        self.state.read().notarized_hash(nonce)
    }

    fn get_highest_final_block_nonce(&self) -> u64 {
        self.state.read().checkpoints.final_checkpoint().nonce
    }

    fn probable_highest_nonce(&self) -> u64 {
        self.state.read().probable_highest_nonce
    }

    fn is_notarized_shard_stuck(&self) -> bool {
        self.state.read().is_notarized_shard_stuck
    }

    fn nonce_state(&self, nonce: u64) -> NonceState {
        let state = self.state.read();
        if let Some(outcome) = state.settled.get(&nonce) {
            return *outcome;
        }
        if nonce <= state.checkpoints.final_checkpoint().nonce {
            return NonceState::Final;
        }
        match state.headers.distinct_hashes(nonce) {
            0 if state.headers.at(nonce).is_empty() => NonceState::Unseen,
            0 | 1 => NonceState::Candidate,
            _ => NonceState::Forked,
        }
    }
}
