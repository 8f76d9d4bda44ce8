use crate::errors::CodecError;
use crate::ports::PubkeyConverter;

/// Hex text form of raw keys.
#[derive(Debug, Clone, Copy)]
pub struct HexPubkeyConverter {
    len: usize,
}

impl HexPubkeyConverter {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl PubkeyConverter for HexPubkeyConverter {
    fn encode(&self, pub_key: &[u8]) -> String {
        hex::encode(pub_key)
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        let bytes = hex::decode(text).map_err(|e| CodecError::InvalidAddress(e.to_string()))?;
        if bytes.len() != self.len {
            return Err(CodecError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                self.len,
                bytes.len()
            )));
        }
        Ok(bytes)
    }

    fn len(&self) -> usize {
        self.len
    }
}
