//! Cross-crate integration flows.

pub mod admission_flow;
pub mod fork_detection;
pub mod slashing_flow;
