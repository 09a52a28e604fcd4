//! JSON codec for HashMap<String, FieldValue> serialization/deserialization
//!
//! Uses FieldValue's Serialize/Deserialize impls directly, so no intermediate
//! serde_json::Value tree is built on either path.

use crate::searchstream::record::FieldValue;
use crate::searchstream::serialization::SerializationError;
use std::collections::HashMap;

/// JSON codec that serializes/deserializes HashMap<String, FieldValue>
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JsonCodec
    pub fn new() -> Self {
        JsonCodec
    }

    /// Serialize a document field map to JSON bytes
    pub fn serialize(
        &self,
        value: &HashMap<String, FieldValue>,
    ) -> Result<Vec<u8>, SerializationError> {
        serde_json::to_vec(value)
            .map_err(|e| SerializationError::SerializationFailed(e.to_string()))
    }

    /// Deserialize JSON bytes to a document field map
    pub fn deserialize(&self, bytes: &[u8]) -> Result<HashMap<String, FieldValue>, SerializationError> {
        serde_json::from_slice(bytes)
            .map_err(|e| SerializationError::DeserializationFailed(e.to_string()))
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_round_trip() {
        let mut fields = HashMap::new();
        fields.insert("user".to_string(), FieldValue::String("costin".to_string()));
        fields.insert("retweets".to_string(), FieldValue::Integer(7));

        let codec = JsonCodec::new();
        let bytes = codec.serialize(&fields).unwrap();
        let decoded = codec.deserialize(&bytes).unwrap();
        assert_eq!(fields, decoded);
    }

    #[test]
    fn test_codec_rejects_malformed_json() {
        let codec = JsonCodec::new();
        assert!(codec.deserialize(b"{not json").is_err());
    }
}
