//! Lifecycle tests for the search index connector
//!
//! Covers the contracts that span adapter re-instantiation: schema
//! declaration round-trips through the job context, projection push-down is
//! accepted and persisted, and the store-discovery heuristic degrades
//! gracefully on ambiguity.

use async_trait::async_trait;
use searchstream::searchstream::datasource::elastic::client::{
    ClientError, Document, DocumentWriter,
};
use searchstream::searchstream::datasource::elastic::writer::{ElasticDataWriter, RecordEncoder};
use searchstream::{
    DataSink, DataSource, DataSourceError, DataWriter, ElasticDataSink, ElasticDataSource,
    DataType, FieldDefinition, FieldValue, JobContext, Schema, SinkConfig, SourceConfig,
    StoreOperator, StreamRecord,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn elastic_source_config() -> SourceConfig {
    SourceConfig::Elastic {
        nodes: "localhost:9200".to_string(),
        resource: "twitter/tweet".to_string(),
        properties: HashMap::new(),
    }
}

fn elastic_sink_config() -> SinkConfig {
    SinkConfig::Elastic {
        nodes: "localhost:9200".to_string(),
        resource: "twitter/tweet".to_string(),
        properties: HashMap::new(),
    }
}

fn tweet_schema() -> Schema {
    Schema::new(vec![
        FieldDefinition::required("user".to_string(), DataType::String),
        FieldDefinition::optional("message".to_string(), DataType::String),
        FieldDefinition::optional("retweets".to_string(), DataType::Integer),
    ])
}

#[tokio::test]
async fn test_schema_survives_adapter_reinstantiation() {
    let ctx = Arc::new(JobContext::new());

    // Planning-phase instance declares the schema...
    {
        let sink = ElasticDataSink::new(ctx.clone(), "store-sig");
        sink.validate_schema(&tweet_schema()).await.unwrap();
    }

    // ...and a fresh execution-phase instance under the same signature sees
    // the identical schema
    let mut sink = ElasticDataSink::new(ctx, "store-sig");
    sink.initialize(elastic_sink_config()).await.unwrap();
    assert_eq!(sink.declared_schema().unwrap().unwrap(), tweet_schema());
    assert!(sink.create_writer().await.is_ok());
}

#[tokio::test]
async fn test_redeclaration_does_not_alter_persisted_schema() {
    let ctx = Arc::new(JobContext::new());
    let sink = ElasticDataSink::new(ctx, "store-sig");

    sink.validate_schema(&tweet_schema()).await.unwrap();
    let replacement = Schema::new(vec![FieldDefinition::required(
        "other".to_string(),
        DataType::Boolean,
    )]);
    sink.validate_schema(&replacement).await.unwrap();

    assert_eq!(sink.declared_schema().unwrap().unwrap(), tweet_schema());
}

#[tokio::test]
async fn test_writer_creation_requires_prior_declaration() {
    let ctx = Arc::new(JobContext::new());
    let mut sink = ElasticDataSink::new(ctx, "store-sig");
    sink.initialize(elastic_sink_config()).await.unwrap();

    assert!(sink.create_writer().await.is_err());
}

#[tokio::test]
async fn test_push_projection_format() {
    let ctx = Arc::new(JobContext::new());
    let mut source = ElasticDataSource::new(ctx, "load-sig");

    let accepted = source
        .push_projection(&["a".to_string(), "b.c".to_string()])
        .unwrap();
    assert!(accepted);

    source.initialize(elastic_source_config()).await.unwrap();
    let projection = source.current_projection().unwrap();
    assert_eq!(projection.paths(), &["a".to_string(), "b.c".to_string()]);
}

#[tokio::test]
async fn test_discovery_uses_single_store_schema() {
    let ctx = Arc::new(JobContext::new());
    ctx.register_store_operator(StoreOperator::new(
        "store-op",
        Some(Schema::new(vec![
            FieldDefinition::required("x".to_string(), DataType::Integer),
            FieldDefinition::required("y".to_string(), DataType::String),
        ])),
    ));

    let mut source = ElasticDataSource::new(ctx, "load-sig");
    source.initialize(elastic_source_config()).await.unwrap();

    let projection = source.current_projection().unwrap();
    assert_eq!(projection.paths(), &["x", "y"]);
}

#[tokio::test]
async fn test_discovery_ambiguity_is_not_fatal() {
    for store_count in [0usize, 2, 3] {
        let ctx = Arc::new(JobContext::new());
        for i in 0..store_count {
            ctx.register_store_operator(StoreOperator::new(
                format!("store-{}", i),
                Some(tweet_schema()),
            ));
        }

        let mut source = ElasticDataSource::new(ctx, "load-sig");
        // Degrades to a natural full read instead of failing the task
        source.initialize(elastic_source_config()).await.unwrap();
        assert!(
            source.current_projection().is_none(),
            "{} stores should leave the projection unset",
            store_count
        );
    }
}

#[tokio::test]
async fn test_discovery_skips_store_without_schema() {
    let ctx = Arc::new(JobContext::new());
    ctx.register_store_operator(StoreOperator::new("store-op", None));

    let mut source = ElasticDataSource::new(ctx, "load-sig");
    source.initialize(elastic_source_config()).await.unwrap();
    assert!(source.current_projection().is_none());
}

#[tokio::test]
async fn test_malformed_inline_configuration_fails_construction() {
    let ctx = Arc::new(JobContext::new());
    let result = ElasticDataSource::with_configuration(
        ctx,
        "load-sig",
        &["elastic.nodes=es1:9200".to_string(), "broken".to_string()],
    );
    assert!(matches!(result, Err(DataSourceError::Configuration(_))));
}

#[derive(Default, Clone)]
struct CapturingBulk {
    written: Arc<Mutex<Vec<(Option<String>, Document)>>>,
}

#[async_trait]
impl DocumentWriter for CapturingBulk {
    async fn write(&mut self, id: Option<&str>, document: &Document) -> Result<(), ClientError> {
        self.written
            .lock()
            .unwrap()
            .push((id.map(str::to_string), document.clone()));
        Ok(())
    }

    async fn delete(&mut self, _id: &str) -> Result<(), ClientError> {
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ClientError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_declared_schema_drives_record_encoding() {
    let ctx = Arc::new(JobContext::new());
    let sink = ElasticDataSink::new(ctx.clone(), "store-sig");
    sink.validate_schema(&tweet_schema()).await.unwrap();

    let capture = CapturingBulk::default();
    let mut writer = ElasticDataWriter::new(
        Box::new(capture.clone()),
        RecordEncoder::new(sink.declared_schema().unwrap().unwrap()),
    );

    let mut fields = HashMap::new();
    fields.insert("user".to_string(), FieldValue::String("kimchy".to_string()));
    fields.insert(
        "message".to_string(),
        FieldValue::String("hello".to_string()),
    );
    writer.write(StreamRecord::new(fields)).await.unwrap();

    let written = capture.written.lock().unwrap();
    let (key, document) = &written[0];
    assert!(key.is_none(), "records are written with a null key");
    assert_eq!(
        document.get("user"),
        Some(&FieldValue::String("kimchy".to_string()))
    );
    // Undeclared slots filled from the schema
    assert_eq!(document.get("retweets"), Some(&FieldValue::Null));
}
