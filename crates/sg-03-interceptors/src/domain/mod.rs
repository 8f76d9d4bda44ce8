//! Messages and decoded payloads seen by the interceptors.

pub mod message;
pub mod peer_authentication;

pub use message::{MessageBatch, P2pMessage};
pub use peer_authentication::{
    InterceptedPeerAuthentication, PeerAuthentication, PEER_AUTHENTICATION_TYPE,
};
