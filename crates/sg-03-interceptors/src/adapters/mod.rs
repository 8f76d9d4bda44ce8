//! Reference implementations of the interceptor ports.

pub mod antiflood;
pub mod factory;
pub mod signature;
pub mod validators;

pub use antiflood::{TokenBucket, TokenBucketAntiflood};
pub use factory::PeerAuthenticationDataFactory;
pub use signature::SignerPeerSignatureHandler;
pub use validators::ValidatorSetChecker;
