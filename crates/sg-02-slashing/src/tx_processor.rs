//! # Slashing Transaction Processor
//!
//! Runs on the shard that receives a commitment or reveal and forwards it to
//! the coordinating chain as a smart contract result. Anything that is not a
//! well-formed, correctly signed slashing transaction becomes a `NoOp`
//! result; the processor never fails.

use crate::domain::SlashingTxData;
use crate::error::{SlashingError, SlashingResult};
use crate::metrics;
use crate::ports::{Marshalizer, PubkeyConverter, SingleSigner};
use shared_types::{ReturnCode, SmartContractResult, Transaction, METACHAIN_SHARD_ID};
use std::sync::Arc;
use tracing::{debug, info};

pub struct SlashingTxProcessor<M: Marshalizer> {
    signer: Arc<dyn SingleSigner>,
    marshalizer: Arc<M>,
    pubkey_converter: Arc<dyn PubkeyConverter>,
    slashing_sc_address: Vec<u8>,
}

impl<M: Marshalizer> SlashingTxProcessor<M> {
    pub fn new(
        signer: Arc<dyn SingleSigner>,
        marshalizer: Arc<M>,
        pubkey_converter: Arc<dyn PubkeyConverter>,
        slashing_sc_address: Vec<u8>,
    ) -> SlashingResult<Self> {
        if slashing_sc_address.is_empty() {
            return Err(SlashingError::InvalidConfig {
                reason: "empty slashing address".to_string(),
            });
        }
        Ok(Self {
            signer,
            marshalizer,
            pubkey_converter,
            slashing_sc_address,
        })
    }

    pub fn process_tx(&self, tx: &Transaction) -> SmartContractResult {
        match self.forward(tx) {
            Ok(scr) => scr,
            Err(err) => {
                debug!("[sg-02] Slashing tx from {} is a no-op: {}", hex::encode(&tx.snd_addr), err);
                metrics::record_no_op("processor");
                SmartContractResult::no_op(err.to_string())
            }
        }
    }

    fn forward(&self, tx: &Transaction) -> SlashingResult<SmartContractResult> {
        if tx.rcv_addr.is_some() {
            return Err(SlashingError::malformed_tx_data("unexpected receiver"));
        }
        if tx.snd_addr.is_empty() {
            return Err(SlashingError::malformed_tx_data("empty sender"));
        }
        let data = SlashingTxData::decode(&tx.data)?;

        // The sender address is the signer's public key.
        let signing_bytes =
            tx.data_for_signing(self.pubkey_converter.as_ref(), self.marshalizer.as_ref())?;
        self.signer
            .verify(&tx.snd_addr, &signing_bytes, &tx.signature)?;

        info!(
            "[sg-02] Forwarding slashing {} from {} to the coordinating chain",
            data.kind(),
            hex::encode(&tx.snd_addr)
        );
        Ok(SmartContractResult {
            nonce: tx.nonce,
            value: tx.value,
            rcv_addr: self.slashing_sc_address.clone(),
            snd_addr: tx.snd_addr.clone(),
            original_sender: tx.snd_addr.clone(),
            destination_shard: METACHAIN_SHARD_ID,
            data: data.encode(),
            return_code: ReturnCode::Ok,
            return_message: String::new(),
        })
    }
}
