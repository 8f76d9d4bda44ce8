//! # Slashing Notifier
//!
//! Turns a proof into a signed commitment transaction, and later into the
//! reveal that discloses the proof.
//!
//! ```text
//! proof ─► extractor ─► own account ─► hash(proof bytes)
//!                                          │
//!                     sign(hash), proof id, crc = hash[len-2..]
//!                                          │
//!                                          ▼
//!   Transaction { nonce: account.nonce, data: SlashCommitment@..., rcv: None }
//!                                          │
//!                   sign(data_for_signing) ─► signature
//! ```
//!
//! Any collaborator failure aborts creation and is returned unchanged.

use crate::config::CommitmentTxConfig;
use crate::domain::{CommitmentData, ProofIdTable, ProofTxData, RevealData, SlashingProof};
use crate::error::{SlashingError, SlashingResult};
use crate::metrics;
use crate::ports::{
    AccountsAdapter, Hasher, Marshalizer, ProofTxDataExtractor, PubkeyConverter, SingleSigner,
};
use shared_types::{PrivateKey, Transaction, U256};
use std::sync::Arc;
use tracing::{debug, info};

/// Collaborators of the notifier.
pub struct SlashingNotifierArgs<M: Marshalizer> {
    pub private_key: PrivateKey,
    pub signer: Arc<dyn SingleSigner>,
    pub accounts: Arc<dyn AccountsAdapter>,
    pub hasher: Arc<dyn Hasher>,
    pub marshalizer: Arc<M>,
    pub pubkey_converter: Arc<dyn PubkeyConverter>,
    pub extractor: Arc<dyn ProofTxDataExtractor>,
    pub proof_ids: ProofIdTable,
    pub tx_config: CommitmentTxConfig,
}

pub struct SlashingNotifier<M: Marshalizer> {
    private_key: PrivateKey,
    signer: Arc<dyn SingleSigner>,
    accounts: Arc<dyn AccountsAdapter>,
    hasher: Arc<dyn Hasher>,
    marshalizer: Arc<M>,
    pubkey_converter: Arc<dyn PubkeyConverter>,
    extractor: Arc<dyn ProofTxDataExtractor>,
    proof_ids: ProofIdTable,
    tx_config: CommitmentTxConfig,
}

impl<M: Marshalizer> SlashingNotifier<M> {
    pub fn new(args: SlashingNotifierArgs<M>) -> SlashingResult<Self> {
        if args.private_key.public_key().is_empty() {
            return Err(SlashingError::InvalidConfig {
                reason: "notifier key has no public part".to_string(),
            });
        }
        args.tx_config.validate()?;
        Ok(Self {
            private_key: args.private_key,
            signer: args.signer,
            accounts: args.accounts,
            hasher: args.hasher,
            marshalizer: args.marshalizer,
            pubkey_converter: args.pubkey_converter,
            extractor: args.extractor,
            proof_ids: args.proof_ids,
            tx_config: args.tx_config,
        })
    }

    /// Public key of the notifying node; also the account it pays from.
    pub fn public_key(&self) -> &[u8] {
        self.private_key.public_key()
    }

    /// Commitment transaction hiding the proof behind its hash.
    pub fn create_shard_slashing_transaction(
        &self,
        proof: &SlashingProof,
    ) -> SlashingResult<Transaction> {
        let tx_data = self.extractor.extract(proof)?;
        let account = self.accounts.get_existing_account(self.public_key())?;
        let data = self.commitment_data(&tx_data)?;

        let tx = self.signed_transaction(account.nonce, account.address, data)?;
        info!(
            "[sg-02] Created {} commitment for round {} (shard {}, nonce {})",
            tx_data.slash_type, tx_data.round, tx_data.shard_id, tx.nonce
        );
        metrics::record_transaction_created("commitment");
        Ok(tx)
    }

    /// Reveal transaction disclosing the proof committed to earlier.
    pub fn create_reveal_transaction(&self, proof: &SlashingProof) -> SlashingResult<Transaction> {
        let tx_data = self.extractor.extract(proof)?;
        let account = self.accounts.get_existing_account(self.public_key())?;
        let data = RevealData {
            proof_id: self.proof_ids.id_of(tx_data.slash_type)?,
            shard_id: tx_data.shard_id,
            round: tx_data.round,
            proof: tx_data.bytes,
        }
        .encode();

        let tx = self.signed_transaction(account.nonce, account.address, data)?;
        info!(
            "[sg-02] Created {} reveal for round {} (shard {}, nonce {})",
            tx_data.slash_type, tx_data.round, tx_data.shard_id, tx.nonce
        );
        metrics::record_transaction_created("reveal");
        Ok(tx)
    }

    /// Escalation to the coordinating chain is not produced.
    pub fn create_meta_slashing_escalated_transaction(
        &self,
        _proof: &SlashingProof,
    ) -> Option<Transaction> {
        None
    }

    fn commitment_data(&self, tx_data: &ProofTxData) -> SlashingResult<Vec<u8>> {
        let proof_hash = self.hasher.compute(&tx_data.bytes);
        let signature = self.signer.sign(&self.private_key, &proof_hash)?;
        let proof_id = self.proof_ids.id_of(tx_data.slash_type)?;
        let crc = CommitmentData::crc_of(&proof_hash)?;

        Ok(CommitmentData {
            proof_id,
            shard_id: tx_data.shard_id,
            round: tx_data.round,
            crc,
            signature,
        }
        .encode())
    }

    fn signed_transaction(
        &self,
        nonce: u64,
        sender: Vec<u8>,
        data: Vec<u8>,
    ) -> SlashingResult<Transaction> {
        let mut tx = Transaction {
            nonce,
            value: U256::from(self.tx_config.value),
            rcv_addr: None,
            snd_addr: sender,
            gas_price: self.tx_config.gas_price,
            gas_limit: self.tx_config.gas_limit,
            data,
            signature: Vec::new(),
        };
        let signing_bytes =
            tx.data_for_signing(self.pubkey_converter.as_ref(), self.marshalizer.as_ref())?;
        tx.signature = self.signer.sign(&self.private_key, &signing_bytes)?;
        debug!("[sg-02] Signed slashing tx with {} data bytes", tx.data.len());
        Ok(tx)
    }
}
