//! # Intercepted Data
//!
//! Contract for anything decoded from a network message before it reaches a
//! processor. Interceptors only see `dyn InterceptedData`; consumers recover
//! the concrete type through [`InterceptedData::as_any`].

use crate::entities::BlockHeader;
use crate::errors::InterceptedDataError;
use std::any::Any;
use std::fmt;

/// Decoded network payload.
pub trait InterceptedData: fmt::Debug + Send + Sync {
    /// Field-level validation (lengths, mandatory fields).
    fn check_validity(&self) -> Result<(), InterceptedDataError>;

    fn is_for_current_shard(&self) -> bool;

    fn hash(&self) -> &[u8];

    /// Short type label used in logs and blacklist causes.
    fn type_name(&self) -> &'static str;

    /// Keys under which the data is deduplicated and whitelisted.
    fn identifiers(&self) -> Vec<Vec<u8>>;

    fn as_any(&self) -> &dyn Any;
}

/// A block header received from the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptedHeader {
    header: BlockHeader,
    hash: Vec<u8>,
}

impl InterceptedHeader {
    pub fn new(header: BlockHeader, hash: Vec<u8>) -> Self {
        Self { header, hash }
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }
}

impl InterceptedData for InterceptedHeader {
    fn check_validity(&self) -> Result<(), InterceptedDataError> {
        if self.hash.is_empty() {
            return Err(InterceptedDataError::too_short("hash"));
        }
        if !self.header.has_valid_rand_seed() {
            return Err(InterceptedDataError::Invalid(
                "missing randomness seed".to_string(),
            ));
        }
        Ok(())
    }

    fn is_for_current_shard(&self) -> bool {
        true
    }

    fn hash(&self) -> &[u8] {
        &self.hash
    }

    fn type_name(&self) -> &'static str {
        "intercepted header"
    }

    fn identifiers(&self) -> Vec<Vec<u8>> {
        vec![self.hash.clone()]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for InterceptedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shard={}, round={}, nonce={}, hash={}",
            self.header.shard_id,
            self.header.round,
            self.header.nonce,
            hex::encode(&self.hash)
        )
    }
}
