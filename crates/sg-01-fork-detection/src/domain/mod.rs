//! Domain layer for fork detection.
//!
//! Pure bookkeeping, no locks and no collaborators.

mod checkpoints;
mod header_state;
mod header_tracker;

pub use checkpoints::*;
pub use header_state::*;
pub use header_tracker::*;
