//! # Slashing Transaction Data
//!
//! Byte layout of the `data` field of commitment and reveal transactions.
//!
//! ```text
//! SlashCommitment@<proof id>@<shard>@<round>@<crc>@<signature>
//! SlashReveal@<proof id>@<shard>@<round>@<proof bytes>
//! ```
//!
//! `proof id` is a single raw byte, `shard` and `round` are ASCII decimals,
//! `crc` is the last two bytes of the proof hash. Decoding is positional, so
//! the raw fields may themselves contain `@`.

use crate::error::{SlashingError, SlashingResult};
use shared_types::ShardId;
use std::str::FromStr;

pub const COMMITMENT_PREFIX: &[u8] = b"SlashCommitment";
pub const REVEAL_PREFIX: &[u8] = b"SlashReveal";
pub const SEPARATOR: u8 = b'@';
/// Trailing proof-hash bytes published in a commitment.
pub const CRC_LEN: usize = 2;

/// Published before the evidence itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentData {
    pub proof_id: u8,
    pub shard_id: ShardId,
    pub round: u64,
    pub crc: [u8; CRC_LEN],
    /// Signature of the full proof hash.
    pub signature: Vec<u8>,
}

impl CommitmentData {
    /// Checksum of a proof hash. `HashTooShort` below `CRC_LEN` bytes.
    pub fn crc_of(hash: &[u8]) -> SlashingResult<[u8; CRC_LEN]> {
        if hash.len() < CRC_LEN {
            return Err(SlashingError::HashTooShort { len: hash.len() });
        }
        let tail = &hash[hash.len() - CRC_LEN..];
        Ok([tail[0], tail[1]])
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = header(COMMITMENT_PREFIX, self.proof_id, self.shard_id, self.round);
        out.extend_from_slice(&self.crc);
        out.push(SEPARATOR);
        out.extend_from_slice(&self.signature);
        out
    }
}

/// Publishes the evidence a commitment referred to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealData {
    pub proof_id: u8,
    pub shard_id: ShardId,
    pub round: u64,
    pub proof: Vec<u8>,
}

impl RevealData {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = header(REVEAL_PREFIX, self.proof_id, self.shard_id, self.round);
        out.extend_from_slice(&self.proof);
        out
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlashingTxData {
    Commitment(CommitmentData),
    Reveal(RevealData),
}

impl SlashingTxData {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            SlashingTxData::Commitment(data) => data.encode(),
            SlashingTxData::Reveal(data) => data.encode(),
        }
    }

    pub fn decode(data: &[u8]) -> SlashingResult<Self> {
        if let Some(rest) = strip_tag(data, COMMITMENT_PREFIX) {
            let (proof_id, shard_id, round, rest) = read_header(rest)?;
            if rest.len() < CRC_LEN + 1 {
                return Err(SlashingError::malformed_tx_data("missing checksum"));
            }
            let crc = [rest[0], rest[1]];
            let signature = expect_separator(&rest[CRC_LEN..])?;
            if signature.is_empty() {
                return Err(SlashingError::malformed_tx_data("empty signature"));
            }
            return Ok(SlashingTxData::Commitment(CommitmentData {
                proof_id,
                shard_id,
                round,
                crc,
                signature: signature.to_vec(),
            }));
        }

        if let Some(rest) = strip_tag(data, REVEAL_PREFIX) {
            let (proof_id, shard_id, round, proof) = read_header(rest)?;
            if proof.is_empty() {
                return Err(SlashingError::malformed_tx_data("empty proof"));
            }
            return Ok(SlashingTxData::Reveal(RevealData {
                proof_id,
                shard_id,
                round,
                proof: proof.to_vec(),
            }));
        }

        Err(SlashingError::malformed_tx_data("unknown prefix"))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SlashingTxData::Commitment(_) => "commitment",
            SlashingTxData::Reveal(_) => "reveal",
        }
    }
}

fn header(prefix: &[u8], proof_id: u8, shard_id: ShardId, round: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(prefix.len() + 32);
    out.extend_from_slice(prefix);
    out.push(SEPARATOR);
    out.push(proof_id);
    out.push(SEPARATOR);
    out.extend_from_slice(shard_id.to_string().as_bytes());
    out.push(SEPARATOR);
    out.extend_from_slice(round.to_string().as_bytes());
    out.push(SEPARATOR);
    out
}

fn strip_tag<'a>(data: &'a [u8], prefix: &[u8]) -> Option<&'a [u8]> {
    data.strip_prefix(prefix)?.strip_prefix(&[SEPARATOR])
}

/// Reads `<id>@<shard>@<round>@` and returns the remainder.
fn read_header(data: &[u8]) -> SlashingResult<(u8, ShardId, u64, &[u8])> {
    let (&proof_id, rest) = data
        .split_first()
        .ok_or_else(|| SlashingError::malformed_tx_data("missing proof id"))?;
    let rest = expect_separator(rest)?;
    let (shard_id, rest) = read_decimal::<ShardId>(rest, "shard")?;
    let (round, rest) = read_decimal::<u64>(rest, "round")?;
    Ok((proof_id, shard_id, round, rest))
}

fn expect_separator(data: &[u8]) -> SlashingResult<&[u8]> {
    data.strip_prefix(&[SEPARATOR])
        .ok_or_else(|| SlashingError::malformed_tx_data("missing separator"))
}

fn read_decimal<'a, T: FromStr>(data: &'a [u8], field: &str) -> SlashingResult<(T, &'a [u8])> {
    let end = data
        .iter()
        .position(|byte| *byte == SEPARATOR)
        .ok_or_else(|| SlashingError::malformed_tx_data(format!("unterminated {field}")))?;
    let digits = &data[..end];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(SlashingError::malformed_tx_data(format!("{field} is not a decimal")));
    }
    let value = std::str::from_utf8(digits)
        .ok()
        .and_then(|text| text.parse::<T>().ok())
        .ok_or_else(|| SlashingError::malformed_tx_data(format!("{field} out of range")))?;
    Ok((value, &data[end + 1..]))
}
