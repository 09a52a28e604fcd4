//! Collaborator layer talking to the search index
//!
//! The adapter itself never speaks HTTP; it delegates document movement to
//! the [`DocumentReader`] / [`DocumentWriter`] collaborators defined here.
//! [`ScrollDocumentReader`] pulls pages of documents through the scroll API,
//! [`BulkDocumentWriter`] pushes buffered documents through the bulk API.
//! Retry, backpressure and cursor bookkeeping live at this layer; the
//! translating reader/writer above only pull and push.

use crate::searchstream::datasource::elastic::settings::ElasticSettings;
use crate::searchstream::datasource::types::SourceOffset;
use crate::searchstream::record::FieldValue;
use crate::searchstream::serialization::{field_value_to_json, json_object_to_fields};
use async_trait::async_trait;
use elasticsearch::http::request::JsonBody;
use elasticsearch::http::transport::Transport;
use elasticsearch::{BulkParts, ClearScrollParts, Elasticsearch, ScrollParts, SearchParts};
use log::{debug, trace};
use serde_json::json;
use std::collections::HashMap;
use std::mem::take;
use thiserror::Error;

/// One index document as a field map
pub type Document = HashMap<String, FieldValue>;

/// Errors surfaced by the index client collaborators
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] elasticsearch::Error),
    #[error("transport build error: {0}")]
    Build(#[from] elasticsearch::http::transport::BuildError),
    #[error("unexpected response: {0}")]
    Response(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Pull interface over the index: one batch of documents per call
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Pull the next batch of documents
    ///
    /// Returns `None` once the source is exhausted; every call after that
    /// keeps returning `None`.
    async fn next_batch(&mut self) -> Result<Option<Vec<Document>>, ClientError>;

    /// Current read position
    fn offset(&self) -> SourceOffset;
}

/// Push interface over the index: buffered document writes
#[async_trait]
pub trait DocumentWriter: Send + Sync {
    /// Queue one document for writing; `id` of `None` lets the index assign
    /// the document id
    async fn write(&mut self, id: Option<&str>, document: &Document) -> Result<(), ClientError>;

    /// Queue a deletion by document id
    async fn delete(&mut self, id: &str) -> Result<(), ClientError>;

    /// Flush all queued operations
    async fn flush(&mut self) -> Result<(), ClientError>;
}

/// Build an index client from resolved settings
pub fn client_from_settings(settings: &ElasticSettings) -> Result<Elasticsearch, ClientError> {
    // Single-node transport against the first configured node; the cluster
    // routes internally
    let node = &settings.nodes()[0];
    let url = if node.contains("://") {
        node.clone()
    } else {
        format!("http://{}", node)
    };
    let transport = Transport::single_node(&url)?;
    Ok(Elasticsearch::new(transport))
}

/// The index name component of a resource ("index" or "index/type")
pub fn resource_index(resource: &str) -> &str {
    resource.split('/').next().unwrap_or(resource)
}

/// Scroll-based document reader
///
/// Opens a scroll cursor on the first pull and walks it to exhaustion,
/// clearing the cursor server-side when done.
pub struct ScrollDocumentReader {
    client: Elasticsearch,
    index: String,
    query: Option<String>,
    page_size: i64,
    keepalive: String,
    scroll_id: Option<String>,
    documents_read: u64,
    exhausted: bool,
}

impl ScrollDocumentReader {
    pub fn from_settings(settings: &ElasticSettings) -> Result<Self, ClientError> {
        Ok(Self {
            client: client_from_settings(settings)?,
            index: resource_index(settings.resource()).to_string(),
            query: settings.query().map(|q| q.to_string()),
            page_size: settings.scroll_size() as i64,
            keepalive: settings.scroll_keepalive().to_string(),
            scroll_id: None,
            documents_read: 0,
            exhausted: false,
        })
    }

    async fn initial_search(&mut self) -> Result<serde_json::Value, ClientError> {
        debug!(
            "Opening scroll over [{}] (page size {}, keepalive {})",
            self.index, self.page_size, self.keepalive
        );

        let index = [self.index.as_str()];
        let search = self
            .client
            .search(SearchParts::Index(&index))
            .scroll(&self.keepalive)
            .size(self.page_size);

        // A query may be URI-style ("q=user:costin") or a JSON DSL body
        let query = self.query.as_deref().map(|q| q.trim_start_matches('?'));
        let response = match query {
            Some(dsl) if dsl.starts_with('{') => {
                let body = serde_json::from_str::<serde_json::Value>(dsl)
                    .map_err(|e| ClientError::Serialization(e.to_string()))?;
                search.body(body).send().await?
            }
            Some(q) => search.q(q.strip_prefix("q=").unwrap_or(q)).send().await?,
            None => search.send().await?,
        };

        let response = response.error_for_status_code()?;
        Ok(response.json::<serde_json::Value>().await?)
    }

    async fn continue_scroll(&mut self, scroll_id: &str) -> Result<serde_json::Value, ClientError> {
        let response = self
            .client
            .scroll(ScrollParts::ScrollId(scroll_id))
            .scroll(&self.keepalive)
            .send()
            .await?
            .error_for_status_code()?;
        Ok(response.json::<serde_json::Value>().await?)
    }

    async fn clear_scroll(&mut self) -> Result<(), ClientError> {
        if let Some(scroll_id) = self.scroll_id.take() {
            self.client
                .clear_scroll(ClearScrollParts::ScrollId(&[&scroll_id]))
                .send()
                .await?
                .error_for_status_code()?;
        }
        Ok(())
    }

    fn parse_hits(&self, body: &serde_json::Value) -> Result<Vec<Document>, ClientError> {
        let hits = body["hits"]["hits"]
            .as_array()
            .ok_or_else(|| ClientError::Response("response carries no hits array".to_string()))?;

        let mut documents = Vec::with_capacity(hits.len());
        for hit in hits {
            // Current clusters return the nested `_source`; legacy clusters
            // answer field projections with a flat `fields` map
            let source = if hit["_source"].is_object() {
                &hit["_source"]
            } else if hit["fields"].is_object() {
                &hit["fields"]
            } else {
                documents.push(Document::new());
                continue;
            };
            documents.push(
                json_object_to_fields(source)
                    .map_err(|e| ClientError::Serialization(e.to_string()))?,
            );
        }
        Ok(documents)
    }
}

#[async_trait]
impl DocumentReader for ScrollDocumentReader {
    async fn next_batch(&mut self) -> Result<Option<Vec<Document>>, ClientError> {
        if self.exhausted {
            return Ok(None);
        }

        let body = match self.scroll_id.clone() {
            None => self.initial_search().await?,
            Some(scroll_id) => self.continue_scroll(&scroll_id).await?,
        };

        if let Some(scroll_id) = body["_scroll_id"].as_str() {
            self.scroll_id = Some(scroll_id.to_string());
        }

        let documents = self.parse_hits(&body)?;
        if documents.is_empty() {
            self.exhausted = true;
            self.clear_scroll().await?;
            debug!(
                "Scroll over [{}] exhausted after {} documents",
                self.index, self.documents_read
            );
            return Ok(None);
        }

        self.documents_read += documents.len() as u64;
        trace!(
            "Pulled {} documents from [{}] ({} total)",
            documents.len(),
            self.index,
            self.documents_read
        );
        Ok(Some(documents))
    }

    fn offset(&self) -> SourceOffset {
        SourceOffset::Scroll {
            scroll_id: self.scroll_id.clone(),
            documents_read: self.documents_read,
        }
    }
}

/// Bulk-buffering document writer
///
/// Operations accumulate until the configured entry count, then go out as
/// one bulk request. Errors reported in the bulk response surface as
/// [`ClientError::Response`]; nothing is retried here.
pub struct BulkDocumentWriter {
    client: Elasticsearch,
    index: String,
    buffer: Vec<JsonBody<serde_json::Value>>,
    entries: usize,
    max_entries: usize,
}

impl BulkDocumentWriter {
    pub fn from_settings(settings: &ElasticSettings) -> Result<Self, ClientError> {
        Ok(Self {
            client: client_from_settings(settings)?,
            index: resource_index(settings.resource()).to_string(),
            buffer: Vec::new(),
            entries: 0,
            max_entries: settings.bulk_size_entries().max(1),
        })
    }

    fn document_to_json(document: &Document) -> serde_json::Value {
        field_value_to_json(&FieldValue::Map(document.clone()))
    }

    async fn flush_if_full(&mut self) -> Result<(), ClientError> {
        if self.entries >= self.max_entries {
            self.flush().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentWriter for BulkDocumentWriter {
    async fn write(&mut self, id: Option<&str>, document: &Document) -> Result<(), ClientError> {
        let action = match id {
            Some(id) => json!({"index": {"_id": id}}),
            None => json!({"index": {}}),
        };
        self.buffer.push(action.into());
        self.buffer.push(Self::document_to_json(document).into());
        self.entries += 1;
        self.flush_if_full().await
    }

    async fn delete(&mut self, id: &str) -> Result<(), ClientError> {
        self.buffer.push(json!({"delete": {"_id": id}}).into());
        self.entries += 1;
        self.flush_if_full().await
    }

    async fn flush(&mut self) -> Result<(), ClientError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let operations = take(&mut self.buffer);
        let flushed = self.entries;
        self.entries = 0;

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index))
            .body(operations)
            .send()
            .await?
            .error_for_status_code()?;

        let body = response.json::<serde_json::Value>().await?;
        if body["errors"].as_bool().unwrap_or(false) {
            let first_error = body["items"]
                .as_array()
                .and_then(|items| {
                    items.iter().find_map(|item| {
                        item.as_object()?
                            .values()
                            .find_map(|op| op.get("error"))
                            .map(|error| error.to_string())
                    })
                })
                .unwrap_or_else(|| "unknown bulk failure".to_string());
            return Err(ClientError::Response(format!(
                "bulk write to [{}] reported errors: {}",
                self.index, first_error
            )));
        }

        trace!("Flushed {} bulk entries to [{}]", flushed, self.index);
        Ok(())
    }
}
