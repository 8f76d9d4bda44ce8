//! Ports for the fork detector.
//!
//! Outbound dependencies are the shared [`Rounder`] and
//! [`BlackListHandler`] ports.

pub mod inbound;

pub use inbound::ForkDetectorApi;
pub use shared_types::{BlackListHandler, Rounder};
