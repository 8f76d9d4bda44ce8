//! Slashing domain: proofs, proof ids and the on-chain data codec.

pub mod commitment;
pub mod proof;
pub mod proof_id;
pub mod round_cache;

pub use commitment::{CommitmentData, RevealData, SlashingTxData, CRC_LEN};
pub use proof::{
    HeaderInfo, MultipleProposalProof, MultipleSigningProof, ProofTxData, SignerEvidence,
    SlashingProof, SlashingType, ThreatLevel,
};
pub use proof_id::ProofIdTable;
pub use round_cache::RoundHeadersCache;
