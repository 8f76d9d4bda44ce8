use crate::domain::{InterceptedPeerAuthentication, PeerAuthentication};
use crate::error::InterceptorResult;
use crate::ports::{Hasher, InterceptedDataFactory, Marshalizer, PeerSignatureHandler};
use shared_types::InterceptedData;
use std::sync::Arc;

/// Decodes peer authentications; the hash covers the raw buffer.
pub struct PeerAuthenticationDataFactory<M: Marshalizer> {
    marshalizer: Arc<M>,
    hasher: Arc<dyn Hasher>,
    signature_handler: Arc<dyn PeerSignatureHandler>,
    min_property_len: usize,
    max_property_len: usize,
}

impl<M: Marshalizer> PeerAuthenticationDataFactory<M> {
    pub fn new(
        marshalizer: Arc<M>,
        hasher: Arc<dyn Hasher>,
        signature_handler: Arc<dyn PeerSignatureHandler>,
        min_property_len: usize,
        max_property_len: usize,
    ) -> Self {
        Self {
            marshalizer,
            hasher,
            signature_handler,
            min_property_len,
            max_property_len,
        }
    }
}

impl<M: Marshalizer> InterceptedDataFactory for PeerAuthenticationDataFactory<M> {
    fn create(&self, buffer: &[u8]) -> InterceptorResult<Box<dyn InterceptedData>> {
        let peer_auth: PeerAuthentication = self.marshalizer.unmarshal(buffer)?;
        Ok(Box::new(InterceptedPeerAuthentication::new(
            peer_auth,
            self.hasher.compute(buffer),
            self.min_property_len,
            self.max_property_len,
            self.signature_handler.clone(),
        )))
    }
}
