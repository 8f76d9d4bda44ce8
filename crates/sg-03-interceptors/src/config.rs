//! # Interceptor Configuration

use crate::error::{InterceptorError, InterceptorResult};
use serde::{Deserialize, Serialize};

/// Interceptor configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptorConfig {
    pub topic: String,
    /// Upper bound for every peer authentication property.
    pub max_property_len: usize,
    /// Lower bound for mandatory properties.
    pub min_property_len: usize,
    /// Messages processed at once on the topic.
    pub max_concurrent_messages: usize,
    /// Payloads from non-validators processed at once.
    pub max_concurrent_observer_messages: usize,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            topic: "peerAuthentication".to_string(),
            max_property_len: 128,
            min_property_len: 1,
            max_concurrent_messages: 100,
            max_concurrent_observer_messages: 10,
        }
    }
}

impl InterceptorConfig {
    /// Create a config for testing (small throttles).
    pub fn for_testing() -> Self {
        Self {
            max_concurrent_messages: 4,
            max_concurrent_observer_messages: 1,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> InterceptorResult<()> {
        let invalid = |reason: &str| {
            Err(InterceptorError::InvalidConfig {
                reason: reason.to_string(),
            })
        };
        if self.topic.is_empty() {
            return invalid("empty topic");
        }
        if self.min_property_len > self.max_property_len {
            return invalid("min_property_len above max_property_len");
        }
        if self.max_concurrent_messages == 0 || self.max_concurrent_observer_messages == 0 {
            return invalid("throttle capacity must be positive");
        }
        Ok(())
    }
}
