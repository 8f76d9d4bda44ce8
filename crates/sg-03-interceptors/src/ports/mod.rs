//! Ports for the interceptors.

pub mod outbound;

pub use outbound::{
    AntifloodHandler, InterceptedDataFactory, PeerAuthenticationProcessor, PeerSignatureHandler,
    ValidatorChecker,
};
pub use shared_types::{BlackListHandler, Hasher, Marshalizer, SingleSigner, WhiteListHandler};
