//! # Checkpoint Ledger
//!
//! Ordered `(nonce, round)` checkpoints plus the final checkpoint.
//!
//! ## Invariants
//!
//! - Checkpoints never decrease in nonce or round.
//! - `final_checkpoint.nonce <= last().nonce`.
//! - The list is never empty; genesis is the floor.

use crate::error::{ForkDetectorError, ForkDetectorResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointInfo {
    pub nonce: u64,
    pub round: u64,
}

impl CheckpointInfo {
    pub fn new(nonce: u64, round: u64) -> Self {
        Self { nonce, round }
    }
}

#[derive(Clone, Debug)]
pub struct CheckpointLedger {
    genesis: CheckpointInfo,
    checkpoints: Vec<CheckpointInfo>,
    final_checkpoint: CheckpointInfo,
}

impl CheckpointLedger {
    pub fn new(genesis: CheckpointInfo) -> Self {
        Self {
            genesis,
            checkpoints: vec![genesis],
            final_checkpoint: genesis,
        }
    }

    pub fn last(&self) -> CheckpointInfo {
        self.checkpoints.last().copied().unwrap_or(self.genesis)
    }

    pub fn final_checkpoint(&self) -> CheckpointInfo {
        self.final_checkpoint
    }

    pub fn all(&self) -> &[CheckpointInfo] {
        &self.checkpoints
    }

    /// Fails if `checkpoint` would move the ledger backwards.
    pub fn ensure_can_append(&self, checkpoint: CheckpointInfo) -> ForkDetectorResult<()> {
        let last = self.last();
        if checkpoint.nonce < last.nonce || checkpoint.round < last.round {
            return Err(ForkDetectorError::CheckpointRegression {
                nonce: checkpoint.nonce,
                round: checkpoint.round,
                last_nonce: last.nonce,
                last_round: last.round,
            });
        }
        Ok(())
    }

    pub fn append(&mut self, checkpoint: CheckpointInfo) -> ForkDetectorResult<()> {
        self.ensure_can_append(checkpoint)?;
        self.checkpoints.push(checkpoint);
        Ok(())
    }

    /// Moves the final checkpoint forward. Never moves it back and never past
    /// the last checkpoint.
    pub fn advance_final(&mut self, checkpoint: CheckpointInfo) -> bool {
        if checkpoint.nonce <= self.final_checkpoint.nonce || checkpoint.nonce > self.last().nonce {
            return false;
        }
        self.final_checkpoint = checkpoint;
        true
    }

    /// Drops checkpoints behind the final one.
    pub fn remove_behind_final(&mut self) {
        let final_nonce = self.final_checkpoint.nonce;
        self.checkpoints.retain(|cp| cp.nonce >= final_nonce);
        if self.checkpoints.is_empty() {
            self.checkpoints.push(self.final_checkpoint);
        }
    }

    /// Drops the checkpoint at `nonce` unless it is the final one.
    pub fn remove_at(&mut self, nonce: u64) {
        if nonce <= self.final_checkpoint.nonce {
            return;
        }
        self.checkpoints.retain(|cp| cp.nonce != nonce);
        if self.checkpoints.is_empty() {
            self.checkpoints.push(self.final_checkpoint);
        }
    }

    pub fn restore_to_genesis(&mut self) {
        self.checkpoints = vec![self.genesis];
        self.final_checkpoint = self.genesis;
    }
}
