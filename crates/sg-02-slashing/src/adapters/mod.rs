//! Default implementations of the slashing ports.

pub mod extractor;

pub use extractor::MarshalProofTxDataExtractor;
