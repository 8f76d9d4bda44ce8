use crate::entities::{Epoch, ShardId};
use crate::errors::NodesCoordinatorError;
use crate::ports::NodesCoordinator;
use std::collections::HashMap;

/// Fixed eligible lists per shard; the group rotates with the round and the
/// randomness so every member proposes in turn.
#[derive(Debug, Clone, Default)]
pub struct StaticNodesCoordinator {
    eligible: HashMap<ShardId, Vec<Vec<u8>>>,
    group_size: usize,
}

impl StaticNodesCoordinator {
    pub fn new(group_size: usize) -> Self {
        Self {
            eligible: HashMap::new(),
            group_size,
        }
    }

    pub fn with_shard(mut self, shard_id: ShardId, validators: Vec<Vec<u8>>) -> Self {
        self.eligible.insert(shard_id, validators);
        self
    }
}

impl NodesCoordinator for StaticNodesCoordinator {
    fn compute_consensus_group(
        &self,
        randomness: &[u8],
        round: u64,
        shard_id: ShardId,
        epoch: Epoch,
    ) -> Result<Vec<Vec<u8>>, NodesCoordinatorError> {
        if randomness.is_empty() {
            return Err(NodesCoordinatorError::InvalidRandomness);
        }
        let validators = self
            .eligible
            .get(&shard_id)
            .filter(|v| !v.is_empty())
            .ok_or(NodesCoordinatorError::EmptyValidatorSet { shard_id, epoch })?;

        let seed = randomness
            .iter()
            .fold(round, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(*b)));
        let start = (seed % validators.len() as u64) as usize;
        let size = self.group_size.clamp(1, validators.len());

        Ok((0..size)
            .map(|i| validators[(start + i) % validators.len()].clone())
            .collect())
    }
}
