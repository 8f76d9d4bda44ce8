use crate::errors::CodecError;
use crate::ports::Marshalizer;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Compact binary encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeMarshalizer;

impl Marshalizer for BincodeMarshalizer {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(value).map_err(|e| CodecError::Marshal(e.to_string()))
    }

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Unmarshal(e.to_string()))
    }
}

/// JSON encoding, used where signed bytes must stay human readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMarshalizer;

impl Marshalizer for JsonMarshalizer {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Marshal(e.to_string()))
    }

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Unmarshal(e.to_string()))
    }
}
