//! # Message Admission
//!
//! Front half shared by interceptors: reputation, antiflood, the per-topic
//! throttler and batch decoding.
//!
//! ```text
//! message ─► empty? ─► blacklisted? ─► antiflood ─► throttler slot ─► batch
//! ```

use crate::domain::{MessageBatch, P2pMessage};
use crate::error::{InterceptorError, InterceptorResult};
use crate::metrics;
use crate::ports::{AntifloodHandler, BlackListHandler, Marshalizer};
use crate::throttler::{InterceptorThrottler, ThrottleGuard};
use shared_types::PeerId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Buffers of an admitted message. The topic slot is held until this is
/// dropped.
pub struct Admitted<'a> {
    pub buffers: Vec<Vec<u8>>,
    _slot: ThrottleGuard<'a>,
}

pub struct MessageAdmission<M: Marshalizer> {
    topic: String,
    marshalizer: Arc<M>,
    antiflood: Arc<dyn AntifloodHandler>,
    throttler: Arc<dyn InterceptorThrottler>,
    blacklist: Arc<dyn BlackListHandler>,
}

impl<M: Marshalizer> MessageAdmission<M> {
    pub fn new(
        topic: impl Into<String>,
        marshalizer: Arc<M>,
        antiflood: Arc<dyn AntifloodHandler>,
        throttler: Arc<dyn InterceptorThrottler>,
        blacklist: Arc<dyn BlackListHandler>,
    ) -> Self {
        Self {
            topic: topic.into(),
            marshalizer,
            antiflood,
            throttler,
            blacklist,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn pre_process(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> InterceptorResult<Admitted<'_>> {
        if message.data.is_empty() {
            return Err(InterceptorError::EmptyBuffer);
        }
        for peer in [&message.peer, from_connected_peer] {
            if self.blacklist.has(peer.as_bytes()) {
                return Err(InterceptorError::PeerBlacklisted {
                    peer: peer.pretty(),
                });
            }
        }
        self.antiflood
            .can_process_message(message, from_connected_peer)?;

        let slot =
            ThrottleGuard::acquire(self.throttler.as_ref()).ok_or(InterceptorError::SystemBusy)?;

        let batch: MessageBatch = match self.marshalizer.unmarshal(&message.data) {
            Ok(batch) => batch,
            Err(err) => {
                self.blacklist_peers(message, from_connected_peer, "unmarshalable message batch");
                return Err(err.into());
            }
        };
        if batch.data.is_empty() {
            return Err(InterceptorError::EmptyBuffer);
        }

        debug!(
            "[sg-03] Admitted {} buffer(s) on {} from {}",
            batch.data.len(),
            self.topic,
            message.peer
        );
        Ok(Admitted {
            buffers: batch.data,
            _slot: slot,
        })
    }

    /// Blacklists the originator and the relaying peer.
    pub fn blacklist_peers(&self, message: &P2pMessage, from_connected_peer: &PeerId, cause: &str) {
        warn!(
            "[sg-03] Blacklisting {} and {} on {}: {}",
            message.peer, from_connected_peer, self.topic, cause
        );
        self.blacklist.add(message.peer.as_bytes(), cause);
        metrics::record_peer_blacklisted(&self.topic);
        if &message.peer != from_connected_peer {
            self.blacklist.add(from_connected_peer.as_bytes(), cause);
            metrics::record_peer_blacklisted(&self.topic);
        }
    }
}
