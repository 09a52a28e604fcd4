//! Serialization support for connector payloads
//!
//! Connectors move documents as JSON; this module provides the codec between
//! raw JSON bytes and `HashMap<String, FieldValue>` plus the value-level
//! conversion helpers shared by readers and writers.

pub mod json;

pub use json::JsonCodec;

use crate::searchstream::record::FieldValue;
use std::collections::HashMap;

/// Serialization error type
#[derive(Debug)]
pub enum SerializationError {
    SerializationFailed(String),
    DeserializationFailed(String),
    UnsupportedType(String),
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializationError::SerializationFailed(msg) => {
                write!(f, "Serialization failed: {}", msg)
            }
            SerializationError::DeserializationFailed(msg) => {
                write!(f, "Deserialization failed: {}", msg)
            }
            SerializationError::UnsupportedType(msg) => {
                write!(f, "Unsupported type: {}", msg)
            }
        }
    }
}

impl std::error::Error for SerializationError {}

/// Convert a JSON value to a FieldValue
///
/// Strings stay strings verbatim; documents coming back from the index must
/// not be numerically coerced.
pub fn json_to_field_value(json_value: &serde_json::Value) -> FieldValue {
    match json_value {
        serde_json::Value::String(s) => FieldValue::String(s.clone()),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        serde_json::Value::Bool(b) => FieldValue::Boolean(*b),
        serde_json::Value::Null => FieldValue::Null,
        serde_json::Value::Array(arr) => {
            FieldValue::Array(arr.iter().map(json_to_field_value).collect())
        }
        serde_json::Value::Object(obj) => {
            let mut field_map = HashMap::new();
            for (k, v) in obj {
                field_map.insert(k.clone(), json_to_field_value(v));
            }
            FieldValue::Map(field_map)
        }
    }
}

/// Convert a FieldValue to a JSON value
pub fn field_value_to_json(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Integer(i) => serde_json::Value::from(*i),
        FieldValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        FieldValue::String(s) => serde_json::Value::String(s.clone()),
        FieldValue::Boolean(b) => serde_json::Value::Bool(*b),
        FieldValue::Null => serde_json::Value::Null,
        FieldValue::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
        FieldValue::Timestamp(ts) => {
            serde_json::Value::String(ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        }
        FieldValue::Decimal(dec) => serde_json::Value::String(dec.to_string()),
        FieldValue::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(field_value_to_json).collect())
        }
        FieldValue::Map(map) | FieldValue::Struct(map) => {
            let mut obj = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                obj.insert(k.clone(), field_value_to_json(v));
            }
            serde_json::Value::Object(obj)
        }
    }
}

/// Convert a whole JSON object into a document field map
///
/// Returns an error for non-object values; index hits are always objects.
pub fn json_object_to_fields(
    json_value: &serde_json::Value,
) -> Result<HashMap<String, FieldValue>, SerializationError> {
    match json_to_field_value(json_value) {
        FieldValue::Map(fields) => Ok(fields),
        other => Err(SerializationError::DeserializationFailed(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_to_field_value_keeps_strings_verbatim() {
        let v = json_to_field_value(&serde_json::json!("1.50"));
        assert_eq!(v, FieldValue::String("1.50".to_string()));
    }

    #[test]
    fn test_json_round_trip_object() {
        let json = serde_json::json!({"name": "kimchy", "age": 42, "tags": ["a", "b"]});
        let fields = json_object_to_fields(&json).unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(
            field_value_to_json(&FieldValue::Map(fields.clone())),
            json
        );
    }

    #[test]
    fn test_json_object_to_fields_rejects_scalars() {
        assert!(json_object_to_fields(&serde_json::json!(42)).is_err());
    }
}
