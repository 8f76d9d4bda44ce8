//! # Shared Types Crate
//!
//! Entities, collaborator ports and shared error types for the Shard-Guard
//! consensus-safety layer.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type crossing a subsystem boundary
//!   is defined here.
//! - **Ports, not implementations**: hashing, signing, serialization,
//!   accounts, round timing and reputation are consumed through the traits
//!   in [`ports`]. The [`adapters`] module only carries reference
//!   implementations.

pub mod adapters;
pub mod entities;
pub mod errors;
pub mod intercepted;
pub mod ports;

pub use entities::*;
pub use errors::*;
pub use intercepted::{InterceptedData, InterceptedHeader};
pub use ports::*;
