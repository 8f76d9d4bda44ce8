//! Driving port: what header interception feeds the detectors.

use crate::domain::{SlashingProof, SlashingType};
use crate::error::SlashingResult;
use shared_types::InterceptedData;

/// Equivocation detector.
pub trait SlashingDetector: Send + Sync {
    /// Kind of proof this detector produces and checks.
    fn slash_type(&self) -> SlashingType;

    /// Inspect an intercepted header.
    ///
    /// Returns `NoSlashingEventDetected` for honest traffic.
    fn verify_data(&self, data: &dyn InterceptedData) -> SlashingResult<SlashingProof>;

    /// Check a proof produced by any node for this detector's slash type.
    fn validate_proof(&self, proof: &SlashingProof) -> SlashingResult<()>;
}
