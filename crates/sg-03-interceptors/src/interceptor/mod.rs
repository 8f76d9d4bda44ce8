//! # Peer Authentication Interceptor
//!
//! Admits peer authentication messages.
//!
//! ```text
//! pre_process ─► for each buffer:
//!     create ─► check validity ─► peer authentication? ─┐   (Err ⇒ blacklist)
//!                                                       ▼
//!     validator? ─ no ─► observer                addressed to sender pid
//!                                                or whitelisted? ─ no ─► ignored
//!     observer slot free? ─ no ─► ignored
//!     processor.process_received                 (Err ⇒ blacklist)
//! ```
//!
//! Ignored payloads never blacklist; when any payload was ignored the call
//! returns `PeerAuthenticationForObservers`.

use crate::admission::MessageAdmission;
use crate::config::InterceptorConfig;
use crate::domain::{InterceptedPeerAuthentication, P2pMessage, PEER_AUTHENTICATION_TYPE};
use crate::error::{InterceptorError, InterceptorResult};
use crate::metrics;
use crate::ports::{
    InterceptedDataFactory, Marshalizer, PeerAuthenticationProcessor, ValidatorChecker,
    WhiteListHandler,
};
use crate::throttler::{InterceptorThrottler, ThrottleGuard};
use shared_types::{InterceptedData, PeerId};
use std::sync::Arc;
use tracing::debug;

/// Collaborators of the interceptor.
pub struct PeerAuthenticationInterceptorArgs<M: Marshalizer> {
    pub config: InterceptorConfig,
    pub admission: MessageAdmission<M>,
    pub factory: Arc<dyn InterceptedDataFactory>,
    pub processor: Arc<dyn PeerAuthenticationProcessor>,
    pub validator_checker: Arc<dyn ValidatorChecker>,
    pub whitelist: Arc<dyn WhiteListHandler>,
    pub observers_throttler: Arc<dyn InterceptorThrottler>,
}

pub struct PeerAuthenticationInterceptor<M: Marshalizer> {
    admission: MessageAdmission<M>,
    factory: Arc<dyn InterceptedDataFactory>,
    processor: Arc<dyn PeerAuthenticationProcessor>,
    validator_checker: Arc<dyn ValidatorChecker>,
    whitelist: Arc<dyn WhiteListHandler>,
    observers_throttler: Arc<dyn InterceptorThrottler>,
}

impl<M: Marshalizer> PeerAuthenticationInterceptor<M> {
    pub fn new(args: PeerAuthenticationInterceptorArgs<M>) -> InterceptorResult<Self> {
        args.config.validate()?;
        if args.admission.topic() != args.config.topic {
            return Err(InterceptorError::InvalidConfig {
                reason: format!(
                    "admission topic {} differs from {}",
                    args.admission.topic(),
                    args.config.topic
                ),
            });
        }
        Ok(Self {
            admission: args.admission,
            factory: args.factory,
            processor: args.processor,
            validator_checker: args.validator_checker,
            whitelist: args.whitelist,
            observers_throttler: args.observers_throttler,
        })
    }

    pub fn process_received_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> InterceptorResult<()> {
        let admitted = self.admission.pre_process(message, from_connected_peer)?;

        let mut ignored = 0usize;
        for buffer in &admitted.buffers {
            let data = self.decode(buffer, message, from_connected_peer)?;
            let Some(peer_auth) = data.as_any().downcast_ref::<InterceptedPeerAuthentication>()
            else {
                let cause = format!("intercepted data is not of type {PEER_AUTHENTICATION_TYPE}");
                self.admission
                    .blacklist_peers(message, from_connected_peer, &cause);
                return Err(InterceptorError::WrongDataType {
                    expected: PEER_AUTHENTICATION_TYPE,
                });
            };

            let is_observer = match self.validator_checker.get_validator_shard(peer_auth.pubkey()) {
                Ok(shard_id) => {
                    peer_auth.set_computed_shard_id(shard_id);
                    false
                }
                Err(_) => true,
            };

            if &message.peer != peer_auth.peer_id() && !self.whitelist.is_white_listed(data.as_ref())
            {
                debug!("[sg-03] Ignoring {} relayed by {}", peer_auth, message.peer);
                ignored += 1;
                continue;
            }

            let _observer_slot = if is_observer {
                match ThrottleGuard::acquire(self.observers_throttler.as_ref()) {
                    Some(slot) => Some(slot),
                    None => {
                        debug!("[sg-03] Observer throttle full, ignoring {}", peer_auth);
                        ignored += 1;
                        continue;
                    }
                }
            } else {
                None
            };

            if let Err(err) = self.processor.process_received(peer_auth, &message.peer) {
                self.admission
                    .blacklist_peers(message, from_connected_peer, "peer info processing error");
                return Err(err);
            }
            metrics::record_message_processed(self.admission.topic());
        }
        drop(admitted);

        if ignored > 0 {
            metrics::record_message_ignored(self.admission.topic());
            return Err(InterceptorError::PeerAuthenticationForObservers);
        }
        Ok(())
    }

    fn decode(
        &self,
        buffer: &[u8],
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> InterceptorResult<Box<dyn InterceptedData>> {
        let data = match self.factory.create(buffer) {
            Ok(data) => data,
            Err(err) => {
                self.admission
                    .blacklist_peers(message, from_connected_peer, &err.to_string());
                return Err(err);
            }
        };
        if let Err(err) = data.check_validity() {
            let cause = format!("{} validity error: {}", data.type_name(), err);
            self.admission
                .blacklist_peers(message, from_connected_peer, &cause);
            return Err(err.into());
        }
        Ok(data)
    }
}
