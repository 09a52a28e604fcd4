//! Search index data sink implementation
//!
//! Implements the write-mode lifecycle: schema declaration persists the
//! record shape through the job context so it survives adapter
//! re-instantiation, and writer creation binds a bulk writer to the
//! persisted schema. Store-metadata callbacks are deliberate no-ops.

use crate::searchstream::datasource::config::SinkConfig;
use crate::searchstream::datasource::elastic::client::BulkDocumentWriter;
use crate::searchstream::datasource::elastic::job_context::{
    deserialize_blob, serialize_blob, JobContext,
};
use crate::searchstream::datasource::elastic::property_keys as keys;
use crate::searchstream::datasource::elastic::settings::{
    ElasticSettings, InlineProperties, OperationMode,
};
use crate::searchstream::datasource::elastic::writer::{ElasticDataWriter, RecordEncoder};
use crate::searchstream::datasource::traits::{DataSink, DataWriter};
use crate::searchstream::datasource::types::{DataSourceError, SinkMetadata};
use crate::searchstream::schema::Schema;
use async_trait::async_trait;
use log::debug;
use std::collections::HashSet;
use std::error::Error;
use std::sync::Arc;

/// Search index data sink
pub struct ElasticDataSink {
    ctx: Arc<JobContext>,
    signature: String,
    inline: InlineProperties,
    settings: Option<ElasticSettings>,
}

impl ElasticDataSink {
    /// Create a data sink with no inline configuration
    pub fn new(ctx: Arc<JobContext>, signature: impl Into<String>) -> Self {
        Self {
            ctx,
            signature: signature.into(),
            inline: InlineProperties::default(),
            settings: None,
        }
    }

    /// Create a data sink with inline `key=value` configuration strings
    ///
    /// Malformed configuration fails construction immediately.
    pub fn with_configuration(
        ctx: Arc<JobContext>,
        signature: impl Into<String>,
        configuration: &[String],
    ) -> Result<Self, DataSourceError> {
        let inline = InlineProperties::parse(configuration)?;
        Ok(Self {
            ctx,
            signature: signature.into(),
            inline,
            settings: None,
        })
    }

    fn settings(&self) -> Result<&ElasticSettings, DataSourceError> {
        self.settings.as_ref().ok_or_else(|| {
            DataSourceError::Configuration("ElasticDataSink not initialized".to_string())
        })
    }

    /// Load the schema persisted for this sink's signature
    pub fn declared_schema(&self) -> Result<Option<Schema>, DataSourceError> {
        match self
            .ctx
            .signature_property(&self.signature, keys::INTERNAL_RESOURCE_SCHEMA)
        {
            None => Ok(None),
            Some(blob) => deserialize_blob(&blob)
                .map(Some)
                .map_err(|e| DataSourceError::Schema(e.to_string())),
        }
    }

    /// Statistics callback from the engine
    ///
    /// No-op: the engine invokes it after the data has already been written,
    /// which makes it useless for this sink.
    pub fn write_statistics(&self, _record_count: u64) {}

    /// Post-write schema callback from the engine
    ///
    /// No-op for the same lifecycle reason as [`write_statistics`](Self::write_statistics).
    pub fn write_schema(&self, _schema: &Schema) {}

    /// Failure cleanup hook; nothing to clean up for bulk writes
    pub fn cleanup_on_failure(&self, _location: &str) {}

    /// Success cleanup hook
    pub fn cleanup_on_success(&self, _location: &str) {}
}

#[async_trait]
impl DataSink for ElasticDataSink {
    async fn initialize(&mut self, config: SinkConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
        let (location, config_properties, nodes) = match config {
            SinkConfig::Elastic {
                nodes,
                resource,
                properties,
            } => (resource, properties, Some(nodes)),
            other => {
                return Err(Box::new(DataSourceError::Configuration(format!(
                    "Unsupported sink config for a search index sink: {:?}",
                    other
                ))));
            }
        };

        let mut inline = self.inline.clone();
        if let Some(nodes) = nodes {
            inline.insert(keys::NODES, nodes);
        }
        for (key, value) in config_properties {
            inline.insert(key, value);
        }

        let settings =
            ElasticSettings::resolve(OperationMode::Write, &location, &self.ctx, &inline)?;
        self.settings = Some(settings);
        Ok(())
    }

    /// Declare the write schema for this sink's signature
    ///
    /// Idempotent: the first declaration wins; later calls within the same
    /// signature leave the persisted value untouched.
    async fn validate_schema(&self, schema: &Schema) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut seen = HashSet::new();
        for field in &schema.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Box::new(DataSourceError::Schema(format!(
                    "schema declares field [{}] more than once",
                    field.name
                ))));
            }
        }

        if self
            .ctx
            .signature_property(&self.signature, keys::INTERNAL_RESOURCE_SCHEMA)
            .is_none()
        {
            let blob = serialize_blob(schema)
                .map_err(|e| DataSourceError::Schema(e.to_string()))?;
            self.ctx
                .set_signature_property(&self.signature, keys::INTERNAL_RESOURCE_SCHEMA, &blob);
            debug!(
                "Persisted schema with {} fields for signature [{}]",
                schema.fields.len(),
                self.signature
            );
        }
        Ok(())
    }

    async fn create_writer(&self) -> Result<Box<dyn DataWriter>, Box<dyn Error + Send + Sync>> {
        let settings = self.settings()?;

        // Schema declaration must have happened first within this signature
        let schema = self.declared_schema()?.ok_or_else(|| {
            DataSourceError::Configuration(format!(
                "no schema declared for signature [{}]; declare the schema before creating writers",
                self.signature
            ))
        })?;

        let bulk = BulkDocumentWriter::from_settings(settings)
            .map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)?;
        Ok(Box::new(ElasticDataWriter::new(
            Box::new(bulk),
            RecordEncoder::new(schema),
        )))
    }

    fn supports_transactions(&self) -> bool {
        false
    }

    fn supports_upsert(&self) -> bool {
        true
    }

    fn metadata(&self) -> SinkMetadata {
        SinkMetadata {
            sink_type: "elastic".to_string(),
            version: "current".to_string(),
            supports_transactions: false,
            supports_upsert: true,
            supports_schema_evolution: false,
            capabilities: vec!["bulk_write".to_string(), "upsert".to_string()],
        }
    }
}
