//! # Fork Detector Configuration
//!
//! Tunables of the fork detector. Loading is left to the embedding node;
//! the struct only needs to deserialize.

use crate::error::{ForkDetectorError, ForkDetectorResult};
use serde::{Deserialize, Serialize};

/// Which chain the detector watches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainKind {
    /// A shard chain; finality comes from metachain notarization.
    Shard,
    /// The coordinating chain; finality trails the last checkpoint.
    Meta,
}

/// Fork detector configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForkDetectorConfig {
    pub chain: ChainKind,

    pub genesis_nonce: u64,

    pub genesis_round: u64,

    /// Unix time (seconds) of round zero. `None` disables the genesis-time
    /// check on received headers.
    pub genesis_time: Option<i64>,

    /// Rounds a non-processed header may lag the current round.
    pub block_finality: i64,

    /// Rounds without a committed block before consensus counts as stuck.
    pub max_rounds_without_committed_block: i64,

    /// Nonces a received header may trail the probable highest nonce before
    /// it is accepted regardless of round (node is syncing).
    pub max_nonces_difference: i64,

    /// Nonce lead of the probable highest nonce over the last checkpoint
    /// beyond which the node counts as syncing.
    pub nonce_difference_when_synced: i64,

    /// Forced forks only trigger in rounds divisible by this.
    pub round_modulus_trigger: i64,

    /// Settled nonce outcomes kept for [`nonce_state`](crate::ForkDetector::nonce_state).
    pub settled_history_len: usize,
}

impl Default for ForkDetectorConfig {
    fn default() -> Self {
        Self {
            chain: ChainKind::Shard,
            genesis_nonce: 0,
            genesis_round: 0,
            genesis_time: None,
            block_finality: 1,
            max_rounds_without_committed_block: 10,
            max_nonces_difference: 5,
            nonce_difference_when_synced: 0,
            round_modulus_trigger: 5,
            settled_history_len: 1024,
        }
    }
}

impl ForkDetectorConfig {
    pub fn meta() -> Self {
        Self {
            chain: ChainKind::Meta,
            ..Self::default()
        }
    }

    /// Create a config for testing (small history).
    pub fn for_testing(chain: ChainKind) -> Self {
        Self {
            chain,
            settled_history_len: 16,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ForkDetectorResult<()> {
        if self.round_modulus_trigger <= 0 {
            return Err(ForkDetectorError::InvalidConfig {
                reason: "round_modulus_trigger must be positive".to_string(),
            });
        }
        if self.block_finality < 0 || self.max_rounds_without_committed_block < 0 {
            return Err(ForkDetectorError::InvalidConfig {
                reason: "finality and stuck thresholds must not be negative".to_string(),
            });
        }
        if self.settled_history_len == 0 {
            return Err(ForkDetectorError::InvalidConfig {
                reason: "settled_history_len must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ForkDetectorConfig::default().validate().is_ok());
        assert_eq!(ForkDetectorConfig::meta().chain, ChainKind::Meta);
    }

    #[test]
    fn test_zero_modulus_rejected() {
        let config = ForkDetectorConfig {
            round_modulus_trigger: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ForkDetectorError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip_keeps_chain() {
        let json = serde_json::to_string(&ForkDetectorConfig::meta()).unwrap();
        let back: ForkDetectorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.chain, ChainKind::Meta);
    }
}
