//! Error types for the fork detector.

use thiserror::Error;

/// Fork detector errors.
///
/// Every variant is returned before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForkDetectorError {
    #[error("Empty header hash")]
    EmptyHash,

    #[error("Final headers mismatch: {headers} headers, {hashes} hashes")]
    FinalHeadersMismatch { headers: usize, hashes: usize },

    /// The previous header is blacklisted; this header was blacklisted too.
    #[error("Header is blacklisted")]
    HeaderIsBlackListed,

    /// `actual` is `None` when the header's round or timestamp overflows.
    #[error(
        "Genesis time mismatch: expected {expected}, header implies {}",
        .actual.map_or_else(|| "an out-of-range time".to_string(), |t| t.to_string())
    )]
    GenesisTimeMismatch { expected: i64, actual: Option<i64> },

    #[error("Lower round in block: round {round}, minimum {min}")]
    LowerRoundInBlock { round: u64, min: i64 },

    #[error("Lower nonce in block: nonce {nonce}, final {final_nonce}")]
    LowerNonceInBlock { nonce: u64, final_nonce: u64 },

    #[error("Higher round in block: round {round}, maximum {max}")]
    HigherRoundInBlock { round: u64, max: i64 },

    #[error("Higher nonce in block: nonce {nonce} too far ahead for round {round}")]
    HigherNonceInBlock { nonce: u64, round: u64 },

    #[error("Random seed not valid")]
    RandomSeedNotValid,

    #[error("Block is not signed")]
    BlockIsNotSigned,

    #[error("Header already processed at nonce {nonce}")]
    HeaderAlreadyProcessed { nonce: u64 },

    #[error(
        "Checkpoint regression: ({nonce}, {round}) behind last ({last_nonce}, {last_round})"
    )]
    CheckpointRegression {
        nonce: u64,
        round: u64,
        last_nonce: u64,
        last_round: u64,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl ForkDetectorError {
    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EmptyHash => "empty_hash",
            Self::FinalHeadersMismatch { .. } => "final_headers_mismatch",
            Self::HeaderIsBlackListed => "blacklisted",
            Self::GenesisTimeMismatch { .. } => "genesis_time",
            Self::LowerRoundInBlock { .. } => "lower_round",
            Self::LowerNonceInBlock { .. } => "lower_nonce",
            Self::HigherRoundInBlock { .. } => "higher_round",
            Self::HigherNonceInBlock { .. } => "higher_nonce",
            Self::RandomSeedNotValid => "random_seed",
            Self::BlockIsNotSigned => "not_signed",
            Self::HeaderAlreadyProcessed { .. } => "duplicate",
            Self::CheckpointRegression { .. } => "checkpoint_regression",
            Self::InvalidConfig { .. } => "config",
        }
    }
}

/// Result type for fork detector operations
pub type ForkDetectorResult<T> = Result<T, ForkDetectorError>;
