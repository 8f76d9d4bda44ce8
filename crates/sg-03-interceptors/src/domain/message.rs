use serde::{Deserialize, Serialize};
use shared_types::PeerId;

/// A message as delivered by the transport on one topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct P2pMessage {
    /// Originator, as signed in the message envelope.
    pub peer: PeerId,
    pub topic: String,
    /// Marshalled [`MessageBatch`].
    pub data: Vec<u8>,
}

impl P2pMessage {
    pub fn new(peer: PeerId, topic: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            peer,
            topic: topic.into(),
            data,
        }
    }
}

/// Several payloads packed into one message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBatch {
    pub data: Vec<Vec<u8>>,
}
