//! Search index data writer: record-to-document translation
//!
//! Binds incoming records to the schema declared earlier in the job and
//! forwards the encoded documents to the injected [`DocumentWriter`] with no
//! explicit document id. Retry and backpressure belong entirely to the bulk
//! writer underneath; a failure here aborts the task.

use crate::searchstream::datasource::elastic::client::{Document, DocumentWriter};
use crate::searchstream::datasource::elastic::error::ElasticDataSinkError;
use crate::searchstream::datasource::traits::DataWriter;
use crate::searchstream::record::{FieldValue, StreamRecord};
use crate::searchstream::schema::Schema;
use async_trait::async_trait;
use log::trace;
use std::error::Error;

/// Schema-bound record encoder
///
/// Built once per writer from the schema persisted at declaration time; the
/// schema dictates which record fields are written and stands in for slots
/// the record leaves unset.
pub struct RecordEncoder {
    schema: Schema,
}

impl RecordEncoder {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Encode a record into a document following the declared field order
    ///
    /// A record field missing for a nullable schema field becomes NULL; a
    /// missing non-nullable field is a schema violation.
    pub fn encode(&self, record: &StreamRecord) -> Result<Document, ElasticDataSinkError> {
        let mut document = Document::with_capacity(self.schema.fields.len());
        for field in &self.schema.fields {
            match record.get_field(&field.name) {
                Some(value) => {
                    document.insert(field.name.clone(), value.clone());
                }
                None if field.nullable => {
                    document.insert(field.name.clone(), FieldValue::Null);
                }
                None => {
                    return Err(ElasticDataSinkError::Schema(format!(
                        "record is missing non-nullable field [{}]",
                        field.name
                    )));
                }
            }
        }
        Ok(document)
    }
}

/// Translating writer bound to one task
pub struct ElasticDataWriter {
    writer: Box<dyn DocumentWriter>,
    encoder: RecordEncoder,
}

impl ElasticDataWriter {
    pub fn new(writer: Box<dyn DocumentWriter>, encoder: RecordEncoder) -> Self {
        Self { writer, encoder }
    }
}

#[async_trait]
impl DataWriter for ElasticDataWriter {
    async fn write(&mut self, record: StreamRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        let document = self.encoder.encode(&record)?;
        trace!("Writing out record {:?}", record.fields);

        // No explicit id; the index assigns one
        self.writer.write(None, &document).await.map_err(|e| {
            Box::new(ElasticDataSinkError::from(e)) as Box<dyn Error + Send + Sync>
        })?;
        Ok(())
    }

    async fn update(
        &mut self,
        key: &str,
        record: StreamRecord,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let document = self.encoder.encode(&record)?;
        self.writer.write(Some(key), &document).await.map_err(|e| {
            Box::new(ElasticDataSinkError::from(e)) as Box<dyn Error + Send + Sync>
        })?;
        Ok(())
    }

    async fn delete(&mut self, key: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.writer.delete(key).await.map_err(|e| {
            Box::new(ElasticDataSinkError::from(e)) as Box<dyn Error + Send + Sync>
        })?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.writer.flush().await.map_err(|e| {
            Box::new(ElasticDataSinkError::from(e)) as Box<dyn Error + Send + Sync>
        })?;
        Ok(())
    }
}
