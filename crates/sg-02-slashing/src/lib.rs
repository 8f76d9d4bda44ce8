//! # Slashing Subsystem
//!
//! Detects validators that equivocate within a round and punishes them
//! through a commit-reveal exchange, so that no other node can claim the
//! evidence first.
//!
//! ## Pipeline
//!
//! ```text
//!  intercepted header
//!         │
//!         ▼
//!  ┌──────────────────────┐   SlashingProof   ┌──────────────────┐
//!  │ SlashingDetector     │──────────────────►│ SlashingNotifier │
//!  │  proposals / signing │                   │ commitment tx    │
//!  └──────────────────────┘                   │ reveal tx        │
//!                                             └────────┬─────────┘
//!                                                      │ Transaction
//!                                                      ▼
//!  ┌──────────────────────┐   SmartContractResult ┌──────────────────┐
//!  │ Slasher (meta chain) │◄─────────────────────│ SlashingTxProc.  │
//!  │ jail, deactivate,    │                       │ forward or NoOp  │
//!  │ cut balance          │                       └──────────────────┘
//!  └──────────────────────┘
//! ```
//!
//! ## Invariants
//!
//! - A proof holds at least two headers of one round and shard with
//!   pairwise different hashes.
//! - Two headers are a `Medium` threat, three or more `High`.
//! - A commitment never contains the proof bytes, only a signature of their
//!   hash and the hash's last two bytes.
//! - An offender is punished at most once per round and shard.

pub mod adapters;
pub mod config;
pub mod detector;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod notifier;
pub mod ports;
pub mod slasher;
pub mod tx_processor;

pub use adapters::MarshalProofTxDataExtractor;
pub use config::{CommitmentTxConfig, DetectorConfig, PenaltyPolicy, SlashingConfig};
pub use detector::{MultipleHeaderProposalsDetector, MultipleHeaderSigningDetector};
pub use domain::{
    CommitmentData, HeaderInfo, MultipleProposalProof, MultipleSigningProof, ProofIdTable,
    ProofTxData, RevealData, SignerEvidence, SlashingProof, SlashingTxData, SlashingType,
    ThreatLevel,
};
pub use error::{SlashingError, SlashingResult};
pub use notifier::{SlashingNotifier, SlashingNotifierArgs};
pub use ports::{ProofTxDataExtractor, SlashingDetector};
pub use slasher::{Slasher, SlasherArgs};
pub use tx_processor::SlashingTxProcessor;

