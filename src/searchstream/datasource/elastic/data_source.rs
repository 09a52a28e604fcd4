//! Search index data source implementation
//!
//! Implements the read-mode lifecycle: location declaration resolves the
//! settings and the field projection, projection push-down persists the
//! engine's required-field list through the job context, and reader creation
//! binds a scroll cursor with the resolved projection.

use crate::searchstream::datasource::config::SourceConfig;
use crate::searchstream::datasource::elastic::client::ScrollDocumentReader;
use crate::searchstream::datasource::elastic::job_context::JobContext;
use crate::searchstream::datasource::elastic::projection::FieldProjection;
use crate::searchstream::datasource::elastic::property_keys as keys;
use crate::searchstream::datasource::elastic::reader::ElasticDataReader;
use crate::searchstream::datasource::elastic::settings::{
    ElasticSettings, InlineProperties, OperationMode, ProtocolVersion,
};
use crate::searchstream::datasource::traits::{DataReader, DataSource};
use crate::searchstream::datasource::types::{DataSourceError, SourceMetadata};
use crate::searchstream::schema::{DataType, FieldDefinition, Schema};
use async_trait::async_trait;
use log::{debug, trace, warn};
use std::error::Error;
use std::sync::Arc;

/// Search index data source
///
/// One instance per adapter signature; the engine may construct several over
/// a job's lifetime, so durable state lives in the shared [`JobContext`].
pub struct ElasticDataSource {
    ctx: Arc<JobContext>,
    signature: String,
    inline: InlineProperties,
    settings: Option<ElasticSettings>,
    metadata: Option<SourceMetadata>,
}

impl ElasticDataSource {
    /// Create a data source with no inline configuration
    pub fn new(ctx: Arc<JobContext>, signature: impl Into<String>) -> Self {
        Self {
            ctx,
            signature: signature.into(),
            inline: InlineProperties::default(),
            settings: None,
            metadata: None,
        }
    }

    /// Create a data source with inline `key=value` configuration strings
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
            metadata: None,
        })
    }

    fn settings(&self) -> Result<&ElasticSettings, DataSourceError> {
        self.settings.as_ref().ok_or_else(|| {
            DataSourceError::Configuration("ElasticDataSource not initialized".to_string())
        })
    }

    /// Partition keys for this resource
    ///
    /// The index does not expose partitioning at planning time; sharding is
    /// a scroll-layer concern.
    pub fn partition_keys(&self) -> Option<Vec<String>> {
        None
    }

    /// The projection that readers created now would apply
    ///
    /// Explicit scroll fields in the settings win, then the projection
    /// persisted under this source's signature.
    pub fn current_projection(&self) -> Option<FieldProjection> {
        if let Some(settings) = &self.settings {
            if let Some(fields) = settings.scroll_fields() {
                return Some(FieldProjection::parse(fields));
            }
        }
        self.ctx
            .signature_property(&self.signature, keys::INTERNAL_TARGET_FIELDS)
            .map(|fields| FieldProjection::parse(&fields))
    }

    /// Resolve the read projection as part of location declaration
    ///
    /// Runs only when the settings carry no explicit scroll field list. A
    /// projection pushed down earlier (or resolved by a previous adapter
    /// instance) is reused from the signature properties; otherwise the
    /// single sibling store operator's declared schema implies one. Zero or
    /// multiple candidate stores degrade to a full natural read.
    fn resolve_projection(&self, settings: &ElasticSettings) {
        if settings.scroll_fields().is_some() {
            debug!("Explicit scroll fields configured; skipping projection discovery");
            return;
        }

        if let Some(fields) = self
            .ctx
            .signature_property(&self.signature, keys::INTERNAL_TARGET_FIELDS)
        {
            debug!("Found field projection [{}] in job context", fields);
            self.ctx
                .set_job_property(keys::INTERNAL_TARGET_FIELDS, &fields);
            return;
        }

        trace!("No field projection specified, looking for existing stores...");
        let stores = self.ctx.store_operators();
        match stores.len() {
            0 => {
                warn!("No store operators in job plan - cannot determine the implied projection");
            }
            1 => {
                let store = &stores[0];
                match &store.schema {
                    None => {
                        trace!(
                            "Store [{}] defines no schema; falling back to default projection",
                            store.name
                        );
                    }
                    Some(schema) => {
                        let fields = FieldProjection::from_schema(schema).as_projection_string();
                        debug!(
                            "Found field projection [{}] in store [{}]",
                            fields, store.name
                        );
                        self.ctx
                            .set_job_property(keys::INTERNAL_TARGET_FIELDS, &fields);
                        self.ctx.set_signature_property(
                            &self.signature,
                            keys::INTERNAL_TARGET_FIELDS,
                            &fields,
                        );
                    }
                }
            }
            n => {
                warn!(
                    "Too many store operators ({}) in job plan - cannot properly determine the implied projection",
                    n
                );
            }
        }
    }
}

#[async_trait]
impl DataSource for ElasticDataSource {
    async fn initialize(
        &mut self,
        config: SourceConfig,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let (location, config_properties, nodes) = match config {
            SourceConfig::Elastic {
                nodes,
                resource,
                properties,
            } => (resource, properties, Some(nodes)),
            other => {
                return Err(Box::new(DataSourceError::Configuration(format!(
                    "Unsupported source config for a search index source: {:?}",
                    other
                ))));
            }
        };

        // Structured config behaves like inline overrides for resolution
        let mut inline = self.inline.clone();
        if let Some(nodes) = nodes {
            inline.insert(keys::NODES, nodes);
        }
        for (key, value) in config_properties {
            inline.insert(key, value);
        }

        let settings =
            ElasticSettings::resolve(OperationMode::Read, &location, &self.ctx, &inline)?;

        self.resolve_projection(&settings);

        self.metadata = Some(SourceMetadata {
            source_type: "elastic".to_string(),
            version: match settings.protocol() {
                ProtocolVersion::Legacy => "legacy".to_string(),
                ProtocolVersion::Current => "current".to_string(),
            },
            supports_streaming: false,
            supports_batch: true,
            supports_schema_evolution: false,
            capabilities: vec![
                "batch_read".to_string(),
                "scroll".to_string(),
                "projection_pushdown".to_string(),
            ],
        });
        self.settings = Some(settings);
        Ok(())
    }

    async fn fetch_schema(&self) -> Result<Schema, Box<dyn Error + Send + Sync>> {
        // A projected read has a known shape; otherwise the index is
        // schemaless from the engine's point of view
        let fields = match self.current_projection() {
            Some(projection) => projection
                .paths()
                .iter()
                .map(|path| FieldDefinition::optional(path.clone(), DataType::String))
                .collect(),
            None => Vec::new(),
        };
        Ok(Schema::new(fields))
    }

    async fn create_reader(&self) -> Result<Box<dyn DataReader>, Box<dyn Error + Send + Sync>> {
        let settings = self.settings()?;
        let scroll = ScrollDocumentReader::from_settings(settings)
            .map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)?;
        Ok(Box::new(ElasticDataReader::new(
            Box::new(scroll),
            self.current_projection(),
            settings.protocol(),
        )))
    }

    fn supports_projection(&self) -> bool {
        true
    }

    fn push_projection(
        &mut self,
        required_fields: &[String],
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let fields = FieldProjection::from_paths(required_fields.iter().cloned())
            .as_projection_string();
        self.ctx
            .set_signature_property(&self.signature, keys::INTERNAL_TARGET_FIELDS, &fields);
        trace!("Given push projection; saving field projection [{}]", fields);
        Ok(true)
    }

    fn supports_streaming(&self) -> bool {
        false
    }

    fn supports_batch(&self) -> bool {
        true
    }

    fn metadata(&self) -> SourceMetadata {
        self.metadata.clone().unwrap_or_else(|| SourceMetadata {
            source_type: "elastic".to_string(),
            version: "current".to_string(),
            supports_streaming: false,
            supports_batch: true,
            supports_schema_evolution: false,
            capabilities: vec!["batch_read".to_string()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searchstream::datasource::elastic::job_context::StoreOperator;
    use std::collections::HashMap;

    fn source_config(resource: &str) -> SourceConfig {
        SourceConfig::Elastic {
            nodes: "localhost:9200".to_string(),
            resource: resource.to_string(),
            properties: HashMap::new(),
        }
    }

    fn schema_xy() -> Schema {
        Schema::new(vec![
            FieldDefinition::required("x".to_string(), DataType::Integer),
            FieldDefinition::required("y".to_string(), DataType::String),
        ])
    }

    #[tokio::test]
    async fn test_push_projection_persists_before_initialize() {
        let ctx = Arc::new(JobContext::new());
        let mut source = ElasticDataSource::new(ctx.clone(), "sig-1");

        assert!(source.supports_projection());
        let accepted = source
            .push_projection(&["a".to_string(), "b.c".to_string()])
            .unwrap();
        assert!(accepted);

        source.initialize(source_config("twitter")).await.unwrap();
        let projection = source.current_projection().unwrap();
        assert_eq!(projection.paths(), &["a", "b.c"]);
    }

    #[tokio::test]
    async fn test_discovery_from_single_store_schema() {
        let ctx = Arc::new(JobContext::new());
        ctx.register_store_operator(StoreOperator::new("store-1", Some(schema_xy())));

        let mut source = ElasticDataSource::new(ctx.clone(), "sig-1");
        source.initialize(source_config("twitter")).await.unwrap();

        let projection = source.current_projection().unwrap();
        assert_eq!(projection.paths(), &["x", "y"]);
    }

    #[tokio::test]
    async fn test_discovery_degrades_with_multiple_stores() {
        let ctx = Arc::new(JobContext::new());
        ctx.register_store_operator(StoreOperator::new("store-1", Some(schema_xy())));
        ctx.register_store_operator(StoreOperator::new("store-2", Some(schema_xy())));

        let mut source = ElasticDataSource::new(ctx.clone(), "sig-1");
        source.initialize(source_config("twitter")).await.unwrap();

        assert!(source.current_projection().is_none());
    }

    #[tokio::test]
    async fn test_discovery_degrades_with_no_stores() {
        let ctx = Arc::new(JobContext::new());
        let mut source = ElasticDataSource::new(ctx.clone(), "sig-1");
        source.initialize(source_config("twitter")).await.unwrap();

        assert!(source.current_projection().is_none());
    }

    #[tokio::test]
    async fn test_explicit_scroll_fields_short_circuit_discovery() {
        let ctx = Arc::new(JobContext::new());
        // A sibling store exists, but explicit scroll fields take precedence
        ctx.register_store_operator(StoreOperator::new("store-1", Some(schema_xy())));

        let mut source = ElasticDataSource::with_configuration(
            ctx.clone(),
            "sig-1",
            &["elastic.scroll.fields=name,user.id".to_string()],
        )
        .unwrap();
        source.initialize(source_config("twitter")).await.unwrap();

        let projection = source.current_projection().unwrap();
        assert_eq!(projection.paths(), &["name", "user.id"]);
        // Discovery never persisted anything under the signature
        assert!(ctx
            .signature_property("sig-1", keys::INTERNAL_TARGET_FIELDS)
            .is_none());
    }

    #[tokio::test]
    async fn test_fetch_schema_reflects_projection() {
        let ctx = Arc::new(JobContext::new());
        let mut source = ElasticDataSource::new(ctx, "sig-1");
        source
            .push_projection(&["a".to_string(), "b".to_string()])
            .unwrap();
        source.initialize(source_config("twitter")).await.unwrap();

        let schema = source.fetch_schema().await.unwrap();
        assert_eq!(schema.field_names(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_initialize_rejects_foreign_config() {
        let ctx = Arc::new(JobContext::new());
        let mut source = ElasticDataSource::new(ctx, "sig-1");
        let result = source
            .initialize(SourceConfig::Generic {
                source_type: "file".to_string(),
                properties: HashMap::new(),
            })
            .await;
        assert!(result.is_err());
    }
}
