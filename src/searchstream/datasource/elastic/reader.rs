//! Search index data reader: document-to-record translation
//!
//! Pulls generic documents from the injected [`DocumentReader`] and projects
//! each into a [`StreamRecord`]. With a projection, the record carries one
//! slot per projected path in the projection's order (missing paths become
//! NULL slots); without one, every document field is taken in natural
//! iteration order.

use crate::searchstream::datasource::elastic::client::{Document, DocumentReader};
use crate::searchstream::datasource::elastic::error::ElasticDataSourceError;
use crate::searchstream::datasource::elastic::projection::{lookup_path, FieldProjection};
use crate::searchstream::datasource::elastic::settings::ProtocolVersion;
use crate::searchstream::datasource::traits::DataReader;
use crate::searchstream::datasource::types::{DataSourceError, SourceOffset};
use crate::searchstream::record::{FieldValue, StreamRecord};
use async_trait::async_trait;
use log::trace;
use std::collections::HashMap;
use std::error::Error;

/// Translating reader bound to one scroll
pub struct ElasticDataReader {
    reader: Box<dyn DocumentReader>,
    projection: Option<FieldProjection>,
    protocol: ProtocolVersion,
    records_read: u64,
    exhausted: bool,
}

impl ElasticDataReader {
    /// Bind a document reader with an optional projection
    ///
    /// An empty projection is normalized to "no projection" (natural full
    /// read).
    pub fn new(
        reader: Box<dyn DocumentReader>,
        projection: Option<FieldProjection>,
        protocol: ProtocolVersion,
    ) -> Self {
        Self {
            reader,
            projection: projection.filter(|p| !p.is_empty()),
            protocol,
            records_read: 0,
            exhausted: false,
        }
    }

    /// The projection this reader applies, if any
    pub fn projection(&self) -> Option<&FieldProjection> {
        self.projection.as_ref()
    }

    /// Project one document into a record
    ///
    /// Record arity equals the projection length when a projection is set,
    /// else the document's field count; an empty document yields a
    /// zero-arity record.
    pub fn translate_document(&self, document: Document) -> StreamRecord {
        if document.is_empty() {
            return StreamRecord::new(HashMap::new());
        }

        let fields = match &self.projection {
            Some(projection) => {
                let mut fields = HashMap::with_capacity(projection.len());
                for path in projection.paths() {
                    let value = match self.protocol {
                        // Legacy clusters return projected fields flat under
                        // their full name, dotted or not
                        ProtocolVersion::Legacy => document.get(path),
                        // Current clusters return the nested source; walk
                        // the dotted path
                        ProtocolVersion::Current => lookup_path(&document, path),
                    };
                    fields.insert(
                        path.clone(),
                        value.cloned().unwrap_or(FieldValue::Null),
                    );
                }
                fields
            }
            None => document,
        };

        StreamRecord::new(fields)
    }
}

#[async_trait]
impl DataReader for ElasticDataReader {
    async fn read(&mut self) -> Result<Vec<StreamRecord>, Box<dyn Error + Send + Sync>> {
        if self.exhausted {
            return Ok(vec![]);
        }

        let batch = self.reader.next_batch().await.map_err(|e| {
            Box::new(ElasticDataSourceError::from(e)) as Box<dyn Error + Send + Sync>
        })?;

        let documents = match batch {
            Some(documents) => documents,
            None => {
                self.exhausted = true;
                return Ok(vec![]);
            }
        };

        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            let mut record = self.translate_document(document);
            record.offset = self.records_read as i64;
            self.records_read += 1;
            trace!("Reading out record {:?}", record.fields);
            records.push(record);
        }
        Ok(records)
    }

    async fn commit(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        // Scroll position lives server-side with the cursor; nothing to do
        Ok(())
    }

    async fn seek(&mut self, offset: SourceOffset) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err(Box::new(DataSourceError::Unsupported(format!(
            "scroll readers cannot seek (requested {:?})",
            offset
        ))))
    }

    async fn has_more(&self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Ok(!self.exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searchstream::datasource::elastic::client::ClientError;
    use crate::searchstream::serialization::json_object_to_fields;

    struct FakeDocumentReader {
        batches: Vec<Vec<Document>>,
    }

    #[async_trait]
    impl DocumentReader for FakeDocumentReader {
        async fn next_batch(&mut self) -> Result<Option<Vec<Document>>, ClientError> {
            if self.batches.is_empty() {
                Ok(None)
            } else {
                Ok(Some(self.batches.remove(0)))
            }
        }

        fn offset(&self) -> SourceOffset {
            SourceOffset::Generic("fake".to_string())
        }
    }

    fn doc(json: serde_json::Value) -> Document {
        json_object_to_fields(&json).unwrap()
    }

    fn reader_with(
        batches: Vec<Vec<Document>>,
        projection: Option<FieldProjection>,
        protocol: ProtocolVersion,
    ) -> ElasticDataReader {
        ElasticDataReader::new(Box::new(FakeDocumentReader { batches }), projection, protocol)
    }

    #[tokio::test]
    async fn test_projected_read_resolves_paths_in_order() {
        let document = doc(serde_json::json!({"a": 1, "b": {"c": 2}, "ignored": 3}));
        let projection = FieldProjection::parse("a,b.c");
        let mut reader = reader_with(
            vec![vec![document]],
            Some(projection.clone()),
            ProtocolVersion::Current,
        );

        let records = reader.read().await.unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.arity(), projection.len());
        let values: Vec<_> = projection
            .paths()
            .iter()
            .map(|path| record.get_field(path).unwrap().clone())
            .collect();
        assert_eq!(values, vec![FieldValue::Integer(1), FieldValue::Integer(2)]);
    }

    #[tokio::test]
    async fn test_unprojected_read_takes_all_fields() {
        let document = doc(serde_json::json!({"x": 1, "y": "two", "z": true}));
        let mut reader = reader_with(vec![vec![document.clone()]], None, ProtocolVersion::Current);

        let records = reader.read().await.unwrap();
        assert_eq!(records[0].arity(), document.len());
        assert_eq!(records[0].fields, document);
    }

    #[tokio::test]
    async fn test_empty_document_yields_zero_arity_record() {
        let mut reader = reader_with(
            vec![vec![Document::new()]],
            Some(FieldProjection::parse("a,b")),
            ProtocolVersion::Current,
        );

        let records = reader.read().await.unwrap();
        assert_eq!(records[0].arity(), 0);
    }

    #[tokio::test]
    async fn test_missing_nested_segment_leaves_slot_null() {
        let document = doc(serde_json::json!({"b": {}}));
        let mut reader = reader_with(
            vec![vec![document]],
            Some(FieldProjection::parse("b.c")),
            ProtocolVersion::Current,
        );

        let records = reader.read().await.unwrap();
        assert_eq!(records[0].arity(), 1);
        assert_eq!(records[0].get_field("b.c"), Some(&FieldValue::Null));
    }

    #[tokio::test]
    async fn test_legacy_protocol_uses_flat_lookup() {
        // Legacy clusters return dotted paths as flat keys
        let mut document = Document::new();
        document.insert("b.c".to_string(), FieldValue::Integer(5));
        let mut reader = reader_with(
            vec![vec![document]],
            Some(FieldProjection::parse("b.c")),
            ProtocolVersion::Legacy,
        );

        let records = reader.read().await.unwrap();
        assert_eq!(records[0].get_field("b.c"), Some(&FieldValue::Integer(5)));
    }

    #[tokio::test]
    async fn test_exhaustion_is_terminal() {
        let mut reader = reader_with(vec![], None, ProtocolVersion::Current);

        assert!(reader.has_more().await.unwrap());
        assert!(reader.read().await.unwrap().is_empty());
        assert!(!reader.has_more().await.unwrap());
        assert!(reader.read().await.unwrap().is_empty());
    }
}
