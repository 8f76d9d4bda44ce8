//! # Fork Detection Subsystem
//!
//! Tracks candidate block headers per nonce, maintains finality checkpoints
//! and estimates how far the network has progressed.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ForkDetector (service)                   │
//! │  ┌───────────────┐  ┌──────────────────┐  ┌──────────────┐  │
//! │  │ HeaderTracker │  │ CheckpointLedger │  │ settled map  │  │
//! │  │ nonce → recs  │  │ last / final     │  │ nonce → out  │  │
//! │  └───────────────┘  └──────────────────┘  └──────────────┘  │
//! │             one parking_lot::RwLock per chain               │
//! └───────────────┬─────────────────────────────┬───────────────┘
//!                 │ Rounder                     │ BlackListHandler
//!                 ▼                             ▼
//!          current round index          refused header hashes
//! ```
//!
//! ## Chain flavours
//!
//! - [`ChainKind::Meta`]: each processed header makes the previous last
//!   checkpoint final.
//! - [`ChainKind::Shard`]: finality comes from headers the coordinating chain
//!   notarized, matched against the processed ones.
//!
//! ## Invariants
//!
//! - Checkpoints never move backwards.
//! - `probable_highest_nonce >= final_checkpoint.nonce`, and the estimate
//!   never passes a nonce gap or an unresolved fork.
//! - A rejected `add_header` leaves the detector unchanged.

pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use config::{ChainKind, ForkDetectorConfig};
pub use domain::{BlockHeaderState, CheckpointInfo, ForkInfo, HeaderRecord, NonceState};
pub use error::{ForkDetectorError, ForkDetectorResult};
pub use ports::ForkDetectorApi;
pub use service::{ForkDetector, ForkDetectorSnapshot};
