//! Mapping between slash types and the one-byte ids carried on chain.

use super::proof::SlashingType;
use crate::error::{SlashingError, SlashingResult};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofIdTable {
    ids: BTreeMap<SlashingType, u8>,
}

impl ProofIdTable {
    /// Fails if two types share an id.
    pub fn new(entries: impl IntoIterator<Item = (SlashingType, u8)>) -> SlashingResult<Self> {
        let mut ids = BTreeMap::new();
        for (slash_type, id) in entries {
            if ids.values().any(|existing| *existing == id) {
                return Err(SlashingError::DuplicateProofId { id });
            }
            ids.insert(slash_type, id);
        }
        Ok(Self { ids })
    }

    /// `InvalidProof` for types with no id.
    pub fn id_of(&self, slash_type: SlashingType) -> SlashingResult<u8> {
        self.ids
            .get(&slash_type)
            .copied()
            .ok_or(SlashingError::InvalidProof)
    }

    pub fn types(&self) -> impl Iterator<Item = SlashingType> + '_ {
        self.ids.keys().copied()
    }

    pub fn type_of(&self, id: u8) -> Option<SlashingType> {
        self.ids
            .iter()
            .find(|(_, existing)| **existing == id)
            .map(|(slash_type, _)| *slash_type)
    }
}

impl Default for ProofIdTable {
    fn default() -> Self {
        let mut ids = BTreeMap::new();
        ids.insert(SlashingType::MultipleProposal, 1);
        ids.insert(SlashingType::MultipleSigning, 2);
        Self { ids }
    }
}
