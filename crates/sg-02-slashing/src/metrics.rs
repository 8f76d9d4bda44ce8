//! # Slashing Metrics
//!
//! Prometheus metrics for the detection and adjudication pipeline.
//!
//! Enable with the `metrics` feature.
//!
//! ## Metrics Exported
//!
//! - `slashing_proofs_detected_total` - Counter of proofs produced (by type)
//! - `slashing_transactions_created_total` - Counter of commitment/reveal txs
//! - `slashing_executed_total` - Counter of punished offenders
//! - `slashing_noop_results_total` - Counter of no-op results (by stage)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_counter_vec, register_int_counter, CounterVec, IntCounter};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref PROOFS_DETECTED: CounterVec = register_counter_vec!(
        "slashing_proofs_detected_total",
        "Total number of slashing proofs produced",
        &["type"]
    )
    .expect("Failed to create PROOFS_DETECTED metric");

    pub static ref TRANSACTIONS_CREATED: CounterVec = register_counter_vec!(
        "slashing_transactions_created_total",
        "Total number of slashing transactions created",
        &["kind"]
    )
    .expect("Failed to create TRANSACTIONS_CREATED metric");

    pub static ref SLASHES_EXECUTED: IntCounter = register_int_counter!(
        "slashing_executed_total",
        "Total number of offenders punished"
    )
    .expect("Failed to create SLASHES_EXECUTED metric");

    pub static ref NOOP_RESULTS: CounterVec = register_counter_vec!(
        "slashing_noop_results_total",
        "Total number of no-op slashing results",
        &["stage"]
    )
    .expect("Failed to create NOOP_RESULTS metric");
}

#[cfg(feature = "metrics")]
pub fn record_proof_detected(slash_type: &str) {
    PROOFS_DETECTED.with_label_values(&[slash_type]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_transaction_created(kind: &str) {
    TRANSACTIONS_CREATED.with_label_values(&[kind]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_slash_executed() {
    SLASHES_EXECUTED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_no_op(stage: &str) {
    NOOP_RESULTS.with_label_values(&[stage]).inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_proof_detected(_slash_type: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_transaction_created(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_slash_executed() {}

#[cfg(not(feature = "metrics"))]
pub fn record_no_op(_stage: &str) {}
