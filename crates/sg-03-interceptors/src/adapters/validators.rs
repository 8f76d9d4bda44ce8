use crate::error::{InterceptorError, InterceptorResult};
use crate::ports::ValidatorChecker;
use parking_lot::RwLock;
use shared_types::ShardId;
use std::collections::HashMap;

/// Eligible validators of the current epoch, keyed by public key.
#[derive(Default)]
pub struct ValidatorSetChecker {
    validators: RwLock<HashMap<Vec<u8>, ShardId>>,
}

impl ValidatorSetChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, pubkey: Vec<u8>, shard_id: ShardId) {
        self.validators.write().insert(pubkey, shard_id);
    }

    /// Replaces the whole set at an epoch change.
    pub fn replace(&self, validators: HashMap<Vec<u8>, ShardId>) {
        *self.validators.write() = validators;
    }
}

impl ValidatorChecker for ValidatorSetChecker {
    fn get_validator_shard(&self, pubkey: &[u8]) -> InterceptorResult<ShardId> {
        self.validators
            .read()
            .get(pubkey)
            .copied()
            .ok_or(InterceptorError::NotAValidator)
    }
}
