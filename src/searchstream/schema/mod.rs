//! Schema types for connector metadata exchange.
//!
//! A [`Schema`] is the ordered field list a store declares before writing and
//! a load derives a projection from. Schemas are serde-serializable because
//! they travel through the job context's side-channel property store as
//! opaque string blobs (see `datasource::elastic::job_context`).

use crate::searchstream::record::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Data types a schema field can declare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Timestamp,
    Decimal,
    /// Array with element type
    Array(Box<DataType>),
    /// Map with key and value types
    Map(Box<DataType>, Box<DataType>),
}

/// An ordered sequence of named, typed fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<FieldDefinition>,
}

/// A single field specification within a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Schema {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self { fields }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|field| field.name.as_str())
            .collect()
    }

    /// Check that all non-nullable fields are present and non-null
    pub fn validate_record(&self, fields: &HashMap<String, FieldValue>) -> bool {
        for field in &self.fields {
            if field.nullable {
                continue;
            }
            match fields.get(&field.name) {
                None | Some(FieldValue::Null) => return false,
                Some(_) => {}
            }
        }
        true
    }
}

impl FieldDefinition {
    pub fn new(name: String, data_type: DataType, nullable: bool) -> Self {
        Self {
            name,
            data_type,
            nullable,
        }
    }

    pub fn required(name: String, data_type: DataType) -> Self {
        Self::new(name, data_type, false)
    }

    pub fn optional(name: String, data_type: DataType) -> Self {
        Self::new(name, data_type, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_field_schema() -> Schema {
        Schema::new(vec![
            FieldDefinition::required("x".to_string(), DataType::Integer),
            FieldDefinition::optional("y".to_string(), DataType::String),
        ])
    }

    #[test]
    fn test_field_lookup() {
        let schema = two_field_schema();
        assert!(schema.has_field("x"));
        assert!(!schema.has_field("z"));
        assert_eq!(schema.field_names(), vec!["x", "y"]);
    }

    #[test]
    fn test_validate_record_missing_required() {
        let schema = two_field_schema();
        let mut fields = HashMap::new();
        fields.insert("y".to_string(), FieldValue::String("ok".to_string()));
        assert!(!schema.validate_record(&fields));

        fields.insert("x".to_string(), FieldValue::Integer(1));
        assert!(schema.validate_record(&fields));
    }

    #[test]
    fn test_schema_serde_round_trip() {
        let schema = two_field_schema();
        let encoded = serde_json::to_string(&schema).unwrap();
        let decoded: Schema = serde_json::from_str(&encoded).unwrap();
        assert_eq!(schema, decoded);
    }
}
