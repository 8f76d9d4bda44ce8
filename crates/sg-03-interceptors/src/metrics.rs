//! # Interceptor Metrics
//!
//! Enable with the `metrics` feature.
//!
//! ## Metrics Exported
//!
//! - `interceptor_messages_processed_total` - Payloads handed to processors
//! - `interceptor_messages_ignored_total` - Messages with ignored payloads
//! - `interceptor_peers_blacklisted_total` - Peers blacklisted

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_counter_vec, CounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref MESSAGES_PROCESSED: CounterVec = register_counter_vec!(
        "interceptor_messages_processed_total",
        "Total number of payloads handed to processors",
        &["topic"]
    )
    .expect("Failed to create MESSAGES_PROCESSED metric");

    pub static ref MESSAGES_IGNORED: CounterVec = register_counter_vec!(
        "interceptor_messages_ignored_total",
        "Total number of messages with ignored payloads",
        &["topic"]
    )
    .expect("Failed to create MESSAGES_IGNORED metric");

    pub static ref PEERS_BLACKLISTED: CounterVec = register_counter_vec!(
        "interceptor_peers_blacklisted_total",
        "Total number of peers blacklisted",
        &["topic"]
    )
    .expect("Failed to create PEERS_BLACKLISTED metric");
}

#[cfg(feature = "metrics")]
pub fn record_message_processed(topic: &str) {
    MESSAGES_PROCESSED.with_label_values(&[topic]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_message_ignored(topic: &str) {
    MESSAGES_IGNORED.with_label_values(&[topic]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_peer_blacklisted(topic: &str) {
    PEERS_BLACKLISTED.with_label_values(&[topic]).inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_message_processed(_topic: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_message_ignored(_topic: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_peer_blacklisted(_topic: &str) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_noop_when_disabled() {
        record_message_processed("peerAuthentication");
        record_message_ignored("peerAuthentication");
        record_peer_blacklisted("peerAuthentication");
    }
}
