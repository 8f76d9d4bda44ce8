//! # Slashing Configuration
//!
//! Detector windows, commitment transaction fields and penalty policy.

use crate::domain::ThreatLevel;
use crate::error::{SlashingError, SlashingResult};
use serde::{Deserialize, Serialize};

/// Detector windows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Rounds kept in the detectors' caches.
    pub round_cache_size: usize,
    /// Headers further than this from the current round are ignored.
    pub max_delta_to_current_round: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            round_cache_size: 3,
            max_delta_to_current_round: 3,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> SlashingResult<()> {
        if self.round_cache_size == 0 {
            return Err(invalid("round_cache_size must be positive"));
        }
        if self.max_delta_to_current_round == 0 {
            return Err(invalid("max_delta_to_current_round must be positive"));
        }
        Ok(())
    }
}

/// Fixed fields of commitment and reveal transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentTxConfig {
    pub value: u64,
    pub gas_price: u64,
    pub gas_limit: u64,
}

impl Default for CommitmentTxConfig {
    fn default() -> Self {
        Self {
            value: 1,
            gas_price: 1_000_000_000,
            gas_limit: 70_000,
        }
    }
}

impl CommitmentTxConfig {
    pub fn validate(&self) -> SlashingResult<()> {
        if self.gas_limit == 0 || self.gas_price == 0 {
            return Err(invalid("commitment gas limit and price must be positive"));
        }
        Ok(())
    }
}

/// Share of the offender's balance taken per threat level, in percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyPolicy {
    pub low_percent: u8,
    pub medium_percent: u8,
    pub high_percent: u8,
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        Self {
            low_percent: 0,
            medium_percent: 10,
            high_percent: 50,
        }
    }
}

impl PenaltyPolicy {
    pub fn percent(&self, level: ThreatLevel) -> u8 {
        match level {
            ThreatLevel::Low => self.low_percent,
            ThreatLevel::Medium => self.medium_percent,
            ThreatLevel::High => self.high_percent,
        }
    }

    pub fn validate(&self) -> SlashingResult<()> {
        if [self.low_percent, self.medium_percent, self.high_percent]
            .iter()
            .any(|percent| *percent > 100)
        {
            return Err(invalid("penalty percent above 100"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> SlashingError {
    SlashingError::InvalidConfig {
        reason: reason.to_string(),
    }
}

/// Slashing configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlashingConfig {
    pub detector: DetectorConfig,
    pub commitment: CommitmentTxConfig,
    pub penalty: PenaltyPolicy,
    /// Receiver of forwarded slashing results on the coordinating chain.
    pub slashing_sc_address: Vec<u8>,
}

impl Default for SlashingConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            commitment: CommitmentTxConfig::default(),
            penalty: PenaltyPolicy::default(),
            slashing_sc_address: vec![0u8; 32],
        }
    }
}

impl SlashingConfig {
    /// Create a config for testing (wider round window).
    pub fn for_testing() -> Self {
        Self {
            detector: DetectorConfig {
                round_cache_size: 4,
                max_delta_to_current_round: 5,
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SlashingResult<()> {
        self.detector.validate()?;
        self.commitment.validate()?;
        self.penalty.validate()?;
        if self.slashing_sc_address.is_empty() {
            return Err(invalid("empty slashing address"));
        }
        Ok(())
    }
}
