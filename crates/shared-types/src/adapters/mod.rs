//! Reference adapters for the collaborator ports.
//!
//! In-memory and ecosystem-crate implementations, enough to run the safety
//! layer in tests and single-node setups.

mod accounts;
mod blacklist;
mod marshal;
mod nodes;
mod pubkey;
mod rounder;

pub use accounts::InMemoryAccounts;
pub use blacklist::TimeCacheBlacklist;
pub use marshal::{BincodeMarshalizer, JsonMarshalizer};
pub use nodes::StaticNodesCoordinator;
pub use pubkey::HexPubkeyConverter;
pub use rounder::{ManualRounder, SystemRounder};
