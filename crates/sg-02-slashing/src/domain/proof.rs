//! # Slashing Proofs
//!
//! Evidence of equivocation within a single round:
//!
//! - **Multiple proposal**: the round's proposer produced two or more
//!   headers with different hashes.
//! - **Multiple signing**: consensus members signed two or more headers with
//!   different hashes. One proof may cover several signers.
//!
//! Headers are kept sorted by hash so equal evidence always serializes to
//! the same bytes.

use crate::error::{SlashingError, SlashingResult};
use serde::{Deserialize, Serialize};
use shared_types::{BlockHeader, ShardId};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Kind of misbehaviour a proof demonstrates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlashingType {
    MultipleProposal,
    MultipleSigning,
}

impl SlashingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlashingType::MultipleProposal => "multiple_proposal",
            SlashingType::MultipleSigning => "multiple_signing",
        }
    }
}

impl fmt::Display for SlashingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity derived from how many conflicting headers were seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    /// Two headers are `Medium`, three or more `High`.
    pub fn from_header_count(count: usize) -> Self {
        match count {
            0 | 1 => ThreatLevel::Low,
            2 => ThreatLevel::Medium,
            _ => ThreatLevel::High,
        }
    }
}

/// A header together with its hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    pub header: BlockHeader,
    pub hash: Vec<u8>,
}

impl HeaderInfo {
    pub fn new(header: BlockHeader, hash: Vec<u8>) -> Self {
        Self { header, hash }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleProposalProof {
    pub round: u64,
    pub shard_id: ShardId,
    pub proposer: Vec<u8>,
    pub level: ThreatLevel,
    pub headers: Vec<HeaderInfo>,
}

impl MultipleProposalProof {
    pub fn new(round: u64, shard_id: ShardId, proposer: Vec<u8>, mut headers: Vec<HeaderInfo>) -> Self {
        headers.sort_by(|a, b| a.hash.cmp(&b.hash));
        Self {
            round,
            shard_id,
            proposer,
            level: ThreatLevel::from_header_count(headers.len()),
            headers,
        }
    }

    pub fn validate(&self) -> SlashingResult<()> {
        if self.proposer.is_empty() {
            return Err(SlashingError::malformed_proof("empty proposer"));
        }
        validate_evidence(self.round, self.shard_id, self.level, &self.headers)
    }
}

/// Conflicting headers signed by one consensus member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerEvidence {
    pub level: ThreatLevel,
    pub headers: Vec<HeaderInfo>,
}

impl SignerEvidence {
    pub fn new(mut headers: Vec<HeaderInfo>) -> Self {
        headers.sort_by(|a, b| a.hash.cmp(&b.hash));
        Self {
            level: ThreatLevel::from_header_count(headers.len()),
            headers,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleSigningProof {
    pub round: u64,
    pub shard_id: ShardId,
    /// Signer public key and evidence, sorted by key.
    pub signers: Vec<(Vec<u8>, SignerEvidence)>,
}

impl MultipleSigningProof {
    pub fn new(round: u64, shard_id: ShardId, signers: BTreeMap<Vec<u8>, SignerEvidence>) -> Self {
        Self {
            round,
            shard_id,
            signers: signers.into_iter().collect(),
        }
    }

    pub fn validate(&self) -> SlashingResult<()> {
        if self.signers.is_empty() {
            return Err(SlashingError::malformed_proof("no signers"));
        }
        if self.signers.windows(2).any(|pair| pair[0].0 >= pair[1].0) {
            return Err(SlashingError::malformed_proof("signers not sorted or repeated"));
        }
        for (signer, evidence) in &self.signers {
            if signer.is_empty() {
                return Err(SlashingError::malformed_proof("empty signer"));
            }
            validate_evidence(self.round, self.shard_id, evidence.level, &evidence.headers)?;
        }
        Ok(())
    }
}

/// Evidence handed from a detector to the notifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlashingProof {
    MultipleProposal(MultipleProposalProof),
    MultipleSigning(MultipleSigningProof),
}

impl SlashingProof {
    pub fn slash_type(&self) -> SlashingType {
        match self {
            SlashingProof::MultipleProposal(_) => SlashingType::MultipleProposal,
            SlashingProof::MultipleSigning(_) => SlashingType::MultipleSigning,
        }
    }

    pub fn round(&self) -> u64 {
        match self {
            SlashingProof::MultipleProposal(p) => p.round,
            SlashingProof::MultipleSigning(p) => p.round,
        }
    }

    pub fn shard_id(&self) -> ShardId {
        match self {
            SlashingProof::MultipleProposal(p) => p.shard_id,
            SlashingProof::MultipleSigning(p) => p.shard_id,
        }
    }

    /// Public keys to punish with their threat level.
    pub fn offenders(&self) -> Vec<(Vec<u8>, ThreatLevel)> {
        match self {
            SlashingProof::MultipleProposal(p) => vec![(p.proposer.clone(), p.level)],
            SlashingProof::MultipleSigning(p) => p
                .signers
                .iter()
                .map(|(signer, evidence)| (signer.clone(), evidence.level))
                .collect(),
        }
    }

    /// Structural checks that hold for any well-formed proof.
    pub fn validate(&self) -> SlashingResult<()> {
        match self {
            SlashingProof::MultipleProposal(p) => p.validate(),
            SlashingProof::MultipleSigning(p) => p.validate(),
        }
    }
}

/// Round, shard, type and serialized proof, as fed into commitment data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofTxData {
    pub round: u64,
    pub shard_id: ShardId,
    pub slash_type: SlashingType,
    pub bytes: Vec<u8>,
}

fn validate_evidence(
    round: u64,
    shard_id: ShardId,
    level: ThreatLevel,
    headers: &[HeaderInfo],
) -> SlashingResult<()> {
    if headers.len() < 2 {
        return Err(SlashingError::malformed_proof("fewer than two headers"));
    }
    if level != ThreatLevel::from_header_count(headers.len()) {
        return Err(SlashingError::malformed_proof("threat level does not match evidence"));
    }
    let mut hashes = HashSet::with_capacity(headers.len());
    for info in headers {
        if info.hash.is_empty() {
            return Err(SlashingError::malformed_proof("empty header hash"));
        }
        if info.header.round != round || info.header.shard_id != shard_id {
            return Err(SlashingError::malformed_proof("header from another round or shard"));
        }
        if !hashes.insert(info.hash.as_slice()) {
            return Err(SlashingError::HeadersNotDifferentHashes);
        }
    }
    Ok(())
}
