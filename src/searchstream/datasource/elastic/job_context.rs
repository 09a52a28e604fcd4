//! Signature-keyed side-channel state shared across adapter instances
//!
//! The engine may construct the adapter several times over one logical job
//! (planning, projection negotiation, task execution). State that must
//! survive re-instantiation (the declared write schema, the resolved read
//! projection) travels through a [`JobContext`]: job-level configuration
//! plus per-signature property maps, keyed so that several adapter instances
//! in one job never collide.
//!
//! The context is explicit, injected state. Tests supply an isolated context
//! per case; nothing here is process-global.

use crate::searchstream::datasource::elastic::error::ElasticDataSourceError;
use crate::searchstream::schema::Schema;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// A store operator scheduled in the same job plan
///
/// Used by the read side's projection discovery heuristic: when the engine
/// gives no explicit projection, the single sibling store's declared schema
/// implies what the next stage expects.
#[derive(Debug, Clone)]
pub struct StoreOperator {
    pub name: String,
    pub schema: Option<Schema>,
}

impl StoreOperator {
    pub fn new(name: impl Into<String>, schema: Option<Schema>) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

#[derive(Default)]
struct JobContextInner {
    job: HashMap<String, String>,
    per_signature: HashMap<String, HashMap<String, String>>,
    store_operators: Vec<StoreOperator>,
}

/// Job-scoped configuration and side-channel property store
///
/// Internally synchronized; the engine hands one shared context to every
/// adapter instance participating in a job.
#[derive(Default)]
pub struct JobContext {
    inner: Mutex<JobContextInner>,
}

impl JobContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context seeded with job-level configuration
    pub fn with_job_config(job: HashMap<String, String>) -> Self {
        Self {
            inner: Mutex::new(JobContextInner {
                job,
                ..Default::default()
            }),
        }
    }

    /// Get a job-level property
    pub fn job_property(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().job.get(key).cloned()
    }

    /// Set a job-level property unconditionally
    pub fn set_job_property(&self, key: &str, value: &str) {
        self.inner
            .lock()
            .unwrap()
            .job
            .insert(key.to_string(), value.to_string());
    }

    /// Suggest a job-level property only if not explicitly set
    ///
    /// Returns true when the suggestion was applied.
    pub fn suggest_job_property(&self, key: &str, value: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.job.contains_key(key) {
            false
        } else {
            inner.job.insert(key.to_string(), value.to_string());
            true
        }
    }

    /// Snapshot of the job-level configuration
    pub fn job_config(&self) -> HashMap<String, String> {
        self.inner.lock().unwrap().job.clone()
    }

    /// Get a property scoped to one adapter signature
    pub fn signature_property(&self, signature: &str, key: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .per_signature
            .get(signature)
            .and_then(|props| props.get(key))
            .cloned()
    }

    /// Set a property scoped to one adapter signature
    pub fn set_signature_property(&self, signature: &str, key: &str, value: &str) {
        self.inner
            .lock()
            .unwrap()
            .per_signature
            .entry(signature.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Register a store operator scheduled in this job's plan
    pub fn register_store_operator(&self, operator: StoreOperator) {
        self.inner.lock().unwrap().store_operators.push(operator);
    }

    /// Store operators scheduled in this job's plan
    pub fn store_operators(&self) -> Vec<StoreOperator> {
        self.inner.lock().unwrap().store_operators.clone()
    }
}

/// Serialize a value into the transportable blob form used by the
/// side-channel property store
///
/// The blob is base64-wrapped JSON: not human-readable in property dumps,
/// and immune to whitespace mangling by configuration layers.
pub fn serialize_blob<T: Serialize>(value: &T) -> Result<String, ElasticDataSourceError> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| ElasticDataSourceError::Serialization(e.to_string()))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Deserialize a value previously produced by [`serialize_blob`]
pub fn deserialize_blob<T: DeserializeOwned>(blob: &str) -> Result<T, ElasticDataSourceError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(blob)
        .map_err(|e| ElasticDataSourceError::Serialization(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ElasticDataSourceError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searchstream::schema::{DataType, FieldDefinition};

    #[test]
    fn test_suggest_does_not_override_user_setting() {
        let ctx = JobContext::new();
        ctx.set_job_property("elastic.nodes", "es1:9200");
        assert!(!ctx.suggest_job_property("elastic.nodes", "localhost:9200"));
        assert_eq!(ctx.job_property("elastic.nodes").unwrap(), "es1:9200");

        assert!(ctx.suggest_job_property("elastic.scroll.size", "50"));
        assert_eq!(ctx.job_property("elastic.scroll.size").unwrap(), "50");
    }

    #[test]
    fn test_signature_properties_are_isolated() {
        let ctx = JobContext::new();
        ctx.set_signature_property("sig-a", "k", "1");
        ctx.set_signature_property("sig-b", "k", "2");

        assert_eq!(ctx.signature_property("sig-a", "k").unwrap(), "1");
        assert_eq!(ctx.signature_property("sig-b", "k").unwrap(), "2");
        assert!(ctx.signature_property("sig-c", "k").is_none());
    }

    #[test]
    fn test_schema_blob_round_trip() {
        let schema = Schema::new(vec![
            FieldDefinition::required("id".to_string(), DataType::Integer),
            FieldDefinition::optional("name".to_string(), DataType::String),
        ]);

        let blob = serialize_blob(&schema).unwrap();
        // Transportable form, not raw JSON
        assert!(!blob.contains('{'));

        let decoded: Schema = deserialize_blob(&blob).unwrap();
        assert_eq!(schema, decoded);
    }
}
