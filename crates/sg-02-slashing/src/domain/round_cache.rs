//! Rolling per-round cache of headers seen for each key (proposer or
//! signer), bounded to a fixed number of rounds.

use super::proof::HeaderInfo;
use crate::error::{SlashingError, SlashingResult};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[derive(Debug)]
pub struct RoundHeadersCache<K> {
    capacity: usize,
    rounds: BTreeMap<u64, HashMap<K, Vec<HeaderInfo>>>,
}

impl<K: Eq + Hash + Clone> RoundHeadersCache<K> {
    pub fn new(capacity: usize) -> SlashingResult<Self> {
        if capacity == 0 {
            return Err(SlashingError::InvalidConfig {
                reason: "round cache needs room for at least one round".to_string(),
            });
        }
        Ok(Self {
            capacity,
            rounds: BTreeMap::new(),
        })
    }

    pub fn contains(&self, round: u64, key: &K, hash: &[u8]) -> bool {
        self.rounds
            .get(&round)
            .and_then(|keys| keys.get(key))
            .map(|headers| headers.iter().any(|info| info.hash == hash))
            .unwrap_or(false)
    }

    /// Stores `info` and returns every header now known for `(round, key)`.
    ///
    /// A round older than everything in a full cache is not stored; only
    /// `info` itself is returned.
    pub fn add(&mut self, round: u64, key: K, info: HeaderInfo) -> SlashingResult<Vec<HeaderInfo>> {
        if self.contains(round, &key, &info.hash) {
            return Err(SlashingError::HeadersNotDifferentHashes);
        }

        if !self.rounds.contains_key(&round) && self.rounds.len() >= self.capacity {
            match self.rounds.keys().next().copied() {
                Some(oldest) if oldest < round => {
                    self.rounds.remove(&oldest);
                }
                _ => return Ok(vec![info]),
            }
        }

        let headers = self.rounds.entry(round).or_default().entry(key).or_default();
        headers.push(info);
        Ok(headers.clone())
    }

    pub fn rounds(&self) -> Vec<u64> {
        self.rounds.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}
