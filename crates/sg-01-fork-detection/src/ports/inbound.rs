//! Driving port: what block processing and sync call on the detector.

use crate::domain::{BlockHeaderState, ForkInfo, NonceState};
use crate::error::ForkDetectorResult;
use shared_types::BlockHeader;

/// Fork detector API.
pub trait ForkDetectorApi: Send + Sync {
    /// Record a header observation.
    ///
    /// `final_headers` are the headers the coordinating chain notarized for
    /// this shard; only the shard flavour reads them.
    fn add_header(
        &self,
        header: &BlockHeader,
        header_hash: &[u8],
        state: BlockHeaderState,
        final_headers: &[BlockHeader],
        final_headers_hashes: &[Vec<u8>],
        is_notarized_shard_stuck: bool,
    ) -> ForkDetectorResult<()>;

    /// Lowest nonce where the processed chain competes with a better
    /// received header, or a stuck consensus.
    fn check_fork(&self) -> ForkInfo;

    /// Roll back a header that failed to commit.
    fn remove_header(&self, nonce: u64, hash: &[u8]);

    /// Forget received headers above the final nonce after a forced fork.
    fn reset_fork(&self);

    fn reset_probable_highest_nonce(&self);

    fn restore_to_genesis(&self);

    /// Nonce the node intends to roll back to; consumed by the next
    /// [`reset_fork`](Self::reset_fork).
    fn set_roll_back_nonce(&self, nonce: u64);

    fn get_notarized_header_hash(&self, nonce: u64) -> Option<Vec<u8>>;

    fn get_highest_final_block_nonce(&self) -> u64;

    fn probable_highest_nonce(&self) -> u64;

    fn is_notarized_shard_stuck(&self) -> bool;

    fn nonce_state(&self, nonce: u64) -> NonceState;
}
