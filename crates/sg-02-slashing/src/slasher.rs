//! # Slasher
//!
//! Adjudicates forwarded slashing results on the coordinating chain.
//!
//! ```text
//! commitment SCR ─► pending[(sender, round, shard)] = (proof id, crc, sig)
//!
//! reveal SCR ─► pending? ─► proof id matches? ─► hash(proof)[len-2..] == crc?
//!                  ─► verify(sender, hash, sig) ─► decode proof
//!                  ─► detector of the proof's type re-derives the offenders
//!                  ─► jail, deactivate, cut balance of each offender
//!                  ─► consume commitment
//! ```
//!
//! A reveal is only accepted from the node that committed, so copying a
//! commitment or a reveal gains nothing. Every failure is reported as a
//! `NoOp` result; the slasher never fails.

use crate::config::PenaltyPolicy;
use crate::domain::{
    CommitmentData, ProofIdTable, RevealData, SlashingProof, SlashingTxData, SlashingType,
    ThreatLevel, CRC_LEN,
};
use crate::error::{SlashingError, SlashingResult};
use crate::metrics;
use crate::ports::{AccountsAdapter, Hasher, Marshalizer, SingleSigner, SlashingDetector};
use parking_lot::Mutex;
use shared_types::{ReturnCode, ShardId, SmartContractResult, U256};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CommitmentKey {
    sender: Vec<u8>,
    round: u64,
    shard_id: ShardId,
}

#[derive(Clone, Debug)]
struct PendingCommitment {
    proof_id: u8,
    crc: [u8; CRC_LEN],
    signature: Vec<u8>,
}

/// Collaborators of the slasher.
pub struct SlasherArgs<M: Marshalizer> {
    pub accounts: Arc<dyn AccountsAdapter>,
    pub hasher: Arc<dyn Hasher>,
    pub signer: Arc<dyn SingleSigner>,
    pub marshalizer: Arc<M>,
    pub proof_ids: ProofIdTable,
    pub penalty: PenaltyPolicy,
    /// One per slash type in `proof_ids`; checks that the offenders a proof
    /// names really proposed or signed its headers.
    pub validators: Vec<Arc<dyn SlashingDetector>>,
}

pub struct Slasher<M: Marshalizer> {
    accounts: Arc<dyn AccountsAdapter>,
    hasher: Arc<dyn Hasher>,
    signer: Arc<dyn SingleSigner>,
    marshalizer: Arc<M>,
    proof_ids: ProofIdTable,
    penalty: PenaltyPolicy,
    validators: HashMap<SlashingType, Arc<dyn SlashingDetector>>,
    pending: Mutex<HashMap<CommitmentKey, PendingCommitment>>,
    /// (offender, round, shard) already punished.
    slashed: Mutex<HashSet<(Vec<u8>, u64, ShardId)>>,
}

impl<M: Marshalizer> Slasher<M> {
    pub fn new(args: SlasherArgs<M>) -> SlashingResult<Self> {
        args.penalty.validate()?;

        let mut validators = HashMap::new();
        for validator in args.validators {
            let slash_type = validator.slash_type();
            if validators.insert(slash_type, validator).is_some() {
                return Err(SlashingError::InvalidConfig {
                    reason: format!("more than one validator for {slash_type}"),
                });
            }
        }
        if let Some(missing) = args.proof_ids.types().find(|t| !validators.contains_key(t)) {
            return Err(SlashingError::InvalidConfig {
                reason: format!("no validator for {missing}"),
            });
        }

        Ok(Self {
            accounts: args.accounts,
            hasher: args.hasher,
            signer: args.signer,
            marshalizer: args.marshalizer,
            proof_ids: args.proof_ids,
            penalty: args.penalty,
            validators,
            pending: Mutex::new(HashMap::new()),
            slashed: Mutex::new(HashSet::new()),
        })
    }

    pub fn execute_slash(&self, scr: &SmartContractResult) -> SmartContractResult {
        let outcome = if scr.is_no_op() {
            Err(SlashingError::malformed_tx_data("no-op result"))
        } else {
            SlashingTxData::decode(&scr.data).and_then(|data| match data {
                SlashingTxData::Commitment(commitment) => {
                    self.register_commitment(&scr.original_sender, commitment)
                }
                SlashingTxData::Reveal(reveal) => self.reveal(&scr.original_sender, reveal),
            })
        };

        match outcome {
            Ok(message) => SmartContractResult {
                nonce: scr.nonce,
                rcv_addr: scr.original_sender.clone(),
                snd_addr: scr.rcv_addr.clone(),
                original_sender: scr.original_sender.clone(),
                destination_shard: scr.destination_shard,
                return_code: ReturnCode::Ok,
                return_message: message,
                ..SmartContractResult::default()
            },
            Err(err) => {
                debug!("[sg-02] Slashing result is a no-op: {}", err);
                metrics::record_no_op("slasher");
                SmartContractResult::no_op(err.to_string())
            }
        }
    }

    /// Drops commitments for rounds below `round` that were never revealed.
    pub fn prune_commitments_before(&self, round: u64) -> usize {
        let mut pending = self.pending.lock();
        let before = pending.len();
        pending.retain(|key, _| key.round >= round);
        before - pending.len()
    }

    pub fn pending_commitments(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_slashed(&self, offender: &[u8], round: u64, shard_id: ShardId) -> bool {
        self.slashed
            .lock()
            .contains(&(offender.to_vec(), round, shard_id))
    }

    fn register_commitment(&self, sender: &[u8], data: CommitmentData) -> SlashingResult<String> {
        if sender.is_empty() {
            return Err(SlashingError::malformed_tx_data("empty sender"));
        }
        if self.proof_ids.type_of(data.proof_id).is_none() {
            return Err(SlashingError::InvalidProof);
        }

        let key = CommitmentKey {
            sender: sender.to_vec(),
            round: data.round,
            shard_id: data.shard_id,
        };
        let mut pending = self.pending.lock();
        if pending.contains_key(&key) {
            return Err(SlashingError::malformed_tx_data("commitment already registered"));
        }
        pending.insert(
            key,
            PendingCommitment {
                proof_id: data.proof_id,
                crc: data.crc,
                signature: data.signature,
            },
        );
        debug!(
            "[sg-02] Registered commitment from {} for round {} (shard {})",
            hex::encode(sender),
            data.round,
            data.shard_id
        );
        Ok("commitment registered".to_string())
    }

    fn reveal(&self, sender: &[u8], data: RevealData) -> SlashingResult<String> {
        let key = CommitmentKey {
            sender: sender.to_vec(),
            round: data.round,
            shard_id: data.shard_id,
        };
        let pending = self
            .pending
            .lock()
            .get(&key)
            .cloned()
            .ok_or_else(|| SlashingError::malformed_tx_data("no pending commitment"))?;

        if pending.proof_id != data.proof_id {
            return Err(SlashingError::malformed_tx_data("proof id differs from commitment"));
        }
        let proof_hash = self.hasher.compute(&data.proof);
        if CommitmentData::crc_of(&proof_hash)? != pending.crc {
            return Err(SlashingError::malformed_tx_data("checksum differs from commitment"));
        }
        self.signer.verify(sender, &proof_hash, &pending.signature)?;

        let slash_type = self
            .proof_ids
            .type_of(data.proof_id)
            .ok_or(SlashingError::InvalidProof)?;
        let proof: SlashingProof = self.marshalizer.unmarshal(&data.proof)?;
        if proof.slash_type() != slash_type
            || proof.round() != data.round
            || proof.shard_id() != data.shard_id
        {
            return Err(SlashingError::malformed_proof("proof does not match reveal header"));
        }
        self.validators
            .get(&slash_type)
            .ok_or(SlashingError::InvalidProof)?
            .validate_proof(&proof)?;

        self.pending.lock().remove(&key);

        let mut punished = 0usize;
        for (offender, level) in proof.offenders() {
            let slash_key = (offender.clone(), data.round, data.shard_id);
            if !self.slashed.lock().insert(slash_key.clone()) {
                debug!("[sg-02] {} already slashed for round {}", hex::encode(&offender), data.round);
                continue;
            }
            match self.punish(&offender, level) {
                Ok(()) => punished += 1,
                Err(err) => {
                    self.slashed.lock().remove(&slash_key);
                    warn!("[sg-02] Failed to slash {}: {}", hex::encode(&offender), err);
                }
            }
        }

        if punished == 0 {
            return Err(SlashingError::malformed_proof("no offender could be slashed"));
        }
        info!(
            "[sg-02] Slashed {} offender(s) for {} in round {} (shard {})",
            punished, slash_type, data.round, data.shard_id
        );
        Ok(format!("slashed {punished} offender(s)"))
    }

    fn punish(&self, offender: &[u8], level: ThreatLevel) -> SlashingResult<()> {
        let mut account = self.accounts.get_existing_account(offender)?;
        let percent = U256::from(self.penalty.percent(level));
        let penalty = account.balance * percent / U256::from(100u64);
        account.balance = account.balance.saturating_sub(penalty);
        account.is_jailed = true;
        account.is_active = false;
        self.accounts.save_account(account)?;
        metrics::record_slash_executed();
        Ok(())
    }
}
