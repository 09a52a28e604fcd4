//! Document-to-record translation tests for the search index reader
//!
//! Drives the translating reader end-to-end with an in-memory document
//! reader standing in for the scroll collaborator.

use async_trait::async_trait;
use searchstream::searchstream::datasource::elastic::client::{
    ClientError, Document, DocumentReader,
};
use searchstream::searchstream::serialization::json_object_to_fields;
use searchstream::{
    DataReader, DataSource, ElasticDataReader, ElasticDataSource, FieldProjection, FieldValue,
    JobContext, ProtocolVersion, SourceConfig, SourceOffset,
};
use std::collections::HashMap;
use std::sync::Arc;

struct FakeScroll {
    batches: Vec<Vec<Document>>,
    served: u64,
}

impl FakeScroll {
    fn new(batches: Vec<Vec<Document>>) -> Self {
        Self { batches, served: 0 }
    }
}

#[async_trait]
impl DocumentReader for FakeScroll {
    async fn next_batch(&mut self) -> Result<Option<Vec<Document>>, ClientError> {
        if self.batches.is_empty() {
            return Ok(None);
        }
        let batch = self.batches.remove(0);
        self.served += batch.len() as u64;
        Ok(Some(batch))
    }

    fn offset(&self) -> SourceOffset {
        SourceOffset::Scroll {
            scroll_id: None,
            documents_read: self.served,
        }
    }
}

fn doc(json: serde_json::Value) -> Document {
    json_object_to_fields(&json).unwrap()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn test_projection_resolves_values_in_projection_order() {
    init_logging();

    let documents = vec![doc(serde_json::json!({
        "name": "costin",
        "user": {"id": 42, "location": {"city": "Bucharest"}},
        "extra": true
    }))];
    let projection = FieldProjection::parse("name,user.id,user.location.city");
    let mut reader = ElasticDataReader::new(
        Box::new(FakeScroll::new(vec![documents])),
        Some(projection.clone()),
        ProtocolVersion::Current,
    );

    let records = reader.read().await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];

    assert_eq!(record.arity(), projection.len());
    let resolved: Vec<FieldValue> = projection
        .paths()
        .iter()
        .map(|path| record.get_field(path).cloned().unwrap())
        .collect();
    assert_eq!(
        resolved,
        vec![
            FieldValue::String("costin".to_string()),
            FieldValue::Integer(42),
            FieldValue::String("Bucharest".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_natural_read_covers_every_document_field() {
    init_logging();

    let document = doc(serde_json::json!({"a": 1, "b": "two", "c": [1, 2]}));
    let mut reader = ElasticDataReader::new(
        Box::new(FakeScroll::new(vec![vec![document.clone()]])),
        None,
        ProtocolVersion::Current,
    );

    let records = reader.read().await.unwrap();
    assert_eq!(records[0].arity(), document.len());
    assert_eq!(records[0].fields, document);
}

#[tokio::test]
async fn test_dotted_lookup_against_empty_nested_object() {
    let mut reader = ElasticDataReader::new(
        Box::new(FakeScroll::new(vec![vec![doc(serde_json::json!({"b": {}}))]])),
        Some(FieldProjection::parse("b.c")),
        ProtocolVersion::Current,
    );

    let records = reader.read().await.unwrap();
    assert_eq!(records[0].arity(), 1);
    assert_eq!(records[0].get_field("b.c"), Some(&FieldValue::Null));
}

#[tokio::test]
async fn test_dotted_lookup_resolves_nested_value() {
    let mut reader = ElasticDataReader::new(
        Box::new(FakeScroll::new(vec![vec![doc(
            serde_json::json!({"b": {"c": 5}}),
        )]])),
        Some(FieldProjection::parse("b.c")),
        ProtocolVersion::Current,
    );

    let records = reader.read().await.unwrap();
    assert_eq!(records[0].arity(), 1);
    assert_eq!(records[0].get_field("b.c"), Some(&FieldValue::Integer(5)));
}

#[tokio::test]
async fn test_batches_drain_in_order_then_terminate() {
    let batches = vec![
        vec![doc(serde_json::json!({"n": 1})), doc(serde_json::json!({"n": 2}))],
        vec![doc(serde_json::json!({"n": 3}))],
    ];
    let mut reader = ElasticDataReader::new(
        Box::new(FakeScroll::new(batches)),
        None,
        ProtocolVersion::Current,
    );

    let mut seen = Vec::new();
    loop {
        let records = reader.read().await.unwrap();
        if records.is_empty() {
            break;
        }
        for record in records {
            match record.get_field("n") {
                Some(FieldValue::Integer(n)) => seen.push(*n),
                other => panic!("unexpected field value: {:?}", other),
            }
        }
    }
    assert_eq!(seen, vec![1, 2, 3]);
    assert!(!reader.has_more().await.unwrap());
}

#[tokio::test]
async fn test_pushed_projection_flows_into_created_readers() {
    init_logging();

    let ctx = Arc::new(JobContext::new());
    let mut source = ElasticDataSource::new(ctx, "task-3");
    source
        .push_projection(&["a".to_string(), "b.c".to_string()])
        .unwrap();
    source
        .initialize(SourceConfig::Elastic {
            nodes: "localhost:9200".to_string(),
            resource: "twitter/tweet".to_string(),
            properties: HashMap::new(),
        })
        .await
        .unwrap();

    // The projection the source resolved drives translation
    let projection = source.current_projection().unwrap();
    assert_eq!(projection.paths(), &["a", "b.c"]);

    let mut reader = ElasticDataReader::new(
        Box::new(FakeScroll::new(vec![vec![doc(
            serde_json::json!({"a": "hit", "b": {"c": 9}, "noise": 0}),
        )]])),
        Some(projection),
        ProtocolVersion::Current,
    );
    let records = reader.read().await.unwrap();
    assert_eq!(records[0].arity(), 2);
    assert_eq!(
        records[0].get_field("a"),
        Some(&FieldValue::String("hit".to_string()))
    );
    assert_eq!(records[0].get_field("b.c"), Some(&FieldValue::Integer(9)));
}
