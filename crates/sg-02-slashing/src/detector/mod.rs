//! # Equivocation Detectors
//!
//! Both detectors share the same front half:
//!
//! ```text
//! intercepted data ─► header? ─► round relevant? ─► consensus group
//!                                                        │
//!              proposer (first member) ◄─────────────────┤
//!              bitmap signers          ◄─────────────────┘
//!                        │
//!                        ▼
//!          RoundHeadersCache[(round, shard, key)] ─► ≥ 2 hashes ⇒ proof
//! ```

mod proposals;
mod signing;

pub use proposals::MultipleHeaderProposalsDetector;
pub use signing::MultipleHeaderSigningDetector;

use crate::error::{SlashingError, SlashingResult};
use crate::ports::Rounder;
use shared_types::{InterceptedData, InterceptedHeader, ShardId};

/// Cache key: shard and public key.
pub(crate) type MemberKey = (ShardId, Vec<u8>);

pub(crate) fn as_header(data: &dyn InterceptedData) -> SlashingResult<&InterceptedHeader> {
    data.as_any()
        .downcast_ref::<InterceptedHeader>()
        .ok_or(SlashingError::InvalidInterceptedData {
            expected: "intercepted header",
        })
}

/// `|current - round| < max_delta`.
pub(crate) fn check_round_relevant<R: Rounder + ?Sized>(
    rounder: &R,
    max_delta: u64,
    round: u64,
) -> SlashingResult<()> {
    let current = rounder.index();
    let delta = (current as i128 - round as i128).unsigned_abs();
    if delta >= max_delta as u128 {
        return Err(SlashingError::HeaderRoundNotRelevant { round, current });
    }
    Ok(())
}
