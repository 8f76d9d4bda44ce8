//! # Header Tracker
//!
//! Records of observed headers, grouped by nonce.
//!
//! Two records at one nonce with different hashes are the raw fork signal.
//! Records are only removed by pruning behind the final checkpoint or by an
//! explicit rollback.

use super::header_state::{BlockHeaderState, HeaderRecord};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default)]
pub struct HeaderTracker {
    headers: BTreeMap<u64, Vec<HeaderRecord>>,
}

impl HeaderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record. Returns `false` for an exact duplicate (same hash
    /// and state at the nonce).
    pub fn append(&mut self, record: HeaderRecord) -> bool {
        let slot = self.headers.entry(record.nonce).or_default();
        if slot
            .iter()
            .any(|r| r.hash == record.hash && r.state == record.state)
        {
            return false;
        }
        slot.push(record);
        true
    }

    pub fn contains(&self, nonce: u64, hash: &[u8], state: BlockHeaderState) -> bool {
        self.at(nonce)
            .iter()
            .any(|r| r.hash == hash && r.state == state)
    }

    pub fn at(&self, nonce: u64) -> &[HeaderRecord] {
        self.headers.get(&nonce).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct hashes at `nonce`, ignoring proposed records.
    pub fn distinct_hashes(&self, nonce: u64) -> usize {
        self.at(nonce)
            .iter()
            .filter(|r| r.state != BlockHeaderState::Proposed)
            .map(|r| r.hash.as_slice())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &[HeaderRecord])> {
        self.headers.iter().map(|(n, r)| (*n, r.as_slice()))
    }

    pub fn nonces(&self) -> impl Iterator<Item = u64> + '_ {
        self.headers.keys().copied()
    }

    /// Drops every record below `nonce`.
    pub fn remove_below(&mut self, nonce: u64) {
        self.headers = self.headers.split_off(&nonce);
    }

    /// Drops received records whose nonce is further from the reference than
    /// their round allows.
    pub fn remove_invalid_received(&mut self, reference_nonce: u64, reference_round: u64) {
        for records in self.headers.values_mut() {
            records.retain(|r| {
                let round_dif = r.round as i64 - reference_round as i64;
                let nonce_dif = r.nonce as i64 - reference_nonce as i64;
                !(r.state == BlockHeaderState::Received && round_dif < nonce_dif)
            });
        }
        self.headers.retain(|_, records| !records.is_empty());
    }

    /// Drops received records above `nonce`.
    pub fn remove_received_above(&mut self, nonce: u64) {
        for (_, records) in self.headers.range_mut(nonce.saturating_add(1)..) {
            records.retain(|r| r.state != BlockHeaderState::Received);
        }
        self.headers.retain(|_, records| !records.is_empty());
    }

    /// Drops non-notarized records with `hash` at `nonce`.
    pub fn remove_hash(&mut self, nonce: u64, hash: &[u8]) {
        if let Some(records) = self.headers.get_mut(&nonce) {
            records.retain(|r| r.hash != hash || r.state == BlockHeaderState::Notarized);
            if records.is_empty() {
                self.headers.remove(&nonce);
            }
        }
    }

    pub fn clear(&mut self) {
        self.headers.clear();
    }

    pub fn len(&self) -> usize {
        self.headers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}
