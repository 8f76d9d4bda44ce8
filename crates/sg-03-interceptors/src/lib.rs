//! # Interceptors Subsystem
//!
//! Admission control for evidence and peer information arriving from the
//! network.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │              PeerAuthenticationInterceptor                 │
//! │  ┌──────────────────┐   ┌───────────────────────────────┐  │
//! │  │ MessageAdmission │   │ per payload:                  │  │
//! │  │ blacklist        │──►│ factory, validity, validator  │  │
//! │  │ antiflood        │   │ check, observers throttler,   │  │
//! │  │ topic throttler  │   │ processor                     │  │
//! │  └──────────────────┘   └───────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Outcomes
//!
//! - `Ok(())`: every payload was processed.
//! - Ignored ([`InterceptorError::is_ignored`]): nothing is blamed.
//! - Any other error: the originator and the relaying peer are blacklisted
//!   when the failure came from the payload itself.

pub mod adapters;
pub mod admission;
pub mod config;
pub mod domain;
pub mod error;
pub mod interceptor;
pub mod metrics;
pub mod ports;
pub mod throttler;

#[cfg(test)]
pub(crate) mod test_support;

pub use admission::{Admitted, MessageAdmission};
pub use config::InterceptorConfig;
pub use domain::{InterceptedPeerAuthentication, MessageBatch, P2pMessage, PeerAuthentication};
pub use error::{InterceptorError, InterceptorResult};
pub use interceptor::{PeerAuthenticationInterceptor, PeerAuthenticationInterceptorArgs};
pub use throttler::{ConcurrencyThrottler, InterceptorThrottler, ThrottleGuard};
