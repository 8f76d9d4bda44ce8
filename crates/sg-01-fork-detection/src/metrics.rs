//! # Fork Detector Metrics
//!
//! Prometheus metrics for monitoring header bookkeeping.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! sg-01-fork-detection = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `fork_detector_headers_added_total` - Counter of accepted headers
//! - `fork_detector_headers_rejected_total` - Counter of rejected headers (by reason)
//! - `fork_detector_checkpoints_total` - Counter of checkpoints appended
//! - `fork_detector_forks_detected_total` - Counter of detected forks
//! - `fork_detector_probable_highest_nonce` - Gauge of the current estimate

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_counter_vec, register_int_counter, register_int_gauge, CounterVec, IntCounter,
    IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref HEADERS_ADDED: IntCounter = register_int_counter!(
        "fork_detector_headers_added_total",
        "Total number of headers accepted by the fork detector"
    )
    .expect("Failed to create HEADERS_ADDED metric");

    pub static ref HEADERS_REJECTED: CounterVec = register_counter_vec!(
        "fork_detector_headers_rejected_total",
        "Total number of headers rejected by the fork detector",
        &["reason"]
    )
    .expect("Failed to create HEADERS_REJECTED metric");

    pub static ref CHECKPOINTS: IntCounter = register_int_counter!(
        "fork_detector_checkpoints_total",
        "Total number of checkpoints appended"
    )
    .expect("Failed to create CHECKPOINTS metric");

    pub static ref FORKS_DETECTED: IntCounter = register_int_counter!(
        "fork_detector_forks_detected_total",
        "Total number of forks reported"
    )
    .expect("Failed to create FORKS_DETECTED metric");

    pub static ref PROBABLE_HIGHEST_NONCE: IntGauge = register_int_gauge!(
        "fork_detector_probable_highest_nonce",
        "Current probable highest nonce"
    )
    .expect("Failed to create PROBABLE_HIGHEST_NONCE metric");
}

#[cfg(feature = "metrics")]
pub fn record_header_added() {
    HEADERS_ADDED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_header_rejected(reason: &str) {
    HEADERS_REJECTED.with_label_values(&[reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_checkpoint() {
    CHECKPOINTS.inc();
}

#[cfg(feature = "metrics")]
pub fn record_fork_detected() {
    FORKS_DETECTED.inc();
}

#[cfg(feature = "metrics")]
pub fn set_probable_highest_nonce(nonce: u64) {
    PROBABLE_HIGHEST_NONCE.set(nonce as i64);
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_header_added() {}

#[cfg(not(feature = "metrics"))]
pub fn record_header_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_checkpoint() {}

#[cfg(not(feature = "metrics"))]
pub fn record_fork_detected() {}

#[cfg(not(feature = "metrics"))]
pub fn set_probable_highest_nonce(_nonce: u64) {}
