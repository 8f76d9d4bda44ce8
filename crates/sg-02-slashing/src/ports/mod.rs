//! Ports for the slashing pipeline.

pub mod inbound;
pub mod outbound;

pub use inbound::SlashingDetector;
pub use outbound::ProofTxDataExtractor;
pub use shared_types::{
    AccountsAdapter, Hasher, Marshalizer, NodesCoordinator, PubkeyConverter, Rounder,
    SingleSigner,
};
