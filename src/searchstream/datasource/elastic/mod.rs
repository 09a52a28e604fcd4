//! Search index datasource and sink adapter
//!
//! Binds the generic [`DataSource`](crate::searchstream::datasource::DataSource) /
//! [`DataSink`](crate::searchstream::datasource::DataSink) abstractions to an
//! Elasticsearch-compatible index:
//!
//! - **Read path**: location declaration resolves settings and a field
//!   projection (pushed down, persisted, or discovered from the job plan's
//!   single store), then scroll readers translate documents into records.
//! - **Write path**: the declared schema is persisted per signature through
//!   the [`job_context`], and writers encode records against it before
//!   handing them to the bulk writer.
//!
//! The HTTP protocol work (scroll cursors, bulk batching) lives in
//! [`client`]; everything above it is translation and lifecycle wiring.

pub mod client;
pub mod data_sink;
pub mod data_source;
pub mod error;
pub mod job_context;
pub mod projection;
pub mod property_keys;
pub mod reader;
pub mod settings;
pub mod writer;

pub use client::{
    BulkDocumentWriter, ClientError, Document, DocumentReader, DocumentWriter,
    ScrollDocumentReader,
};
pub use data_sink::ElasticDataSink;
pub use data_source::ElasticDataSource;
pub use error::{ElasticDataSinkError, ElasticDataSourceError};
pub use job_context::{JobContext, StoreOperator};
pub use projection::{lookup_path, FieldProjection};
pub use reader::ElasticDataReader;
pub use settings::{ElasticSettings, InlineProperties, OperationMode, ProtocolVersion};
pub use writer::{ElasticDataWriter, RecordEncoder};
