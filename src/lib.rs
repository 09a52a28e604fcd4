//! # searchstream
//!
//! Streaming datasource and sink connectors for Elasticsearch-compatible
//! search indexes, built around a generic load/store abstraction layer so
//! any data processing engine can drive them.
//!
//! ## Features
//!
//! - **Generic connector traits**: `DataSource`/`DataSink` with per-task
//!   `DataReader`/`DataWriter` instances
//! - **Projection push-down**: required-field lists resolve to scroll-time
//!   projections, including dotted nested paths
//! - **Side-channel job context**: schemas and projections survive adapter
//!   re-instantiation across planning and execution phases
//! - **Scroll and bulk delegation**: cursor and batching mechanics live in a
//!   dedicated client layer behind injectable trait seams
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use searchstream::{
//!     DataReader, DataSource, ElasticDataSource, JobContext, SourceConfig,
//! };
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let ctx = Arc::new(JobContext::new());
//!     let mut source = ElasticDataSource::new(ctx, "task-0");
//!
//!     source
//!         .initialize(SourceConfig::Elastic {
//!             nodes: "localhost:9200".to_string(),
//!             resource: "twitter/tweet".to_string(),
//!             properties: HashMap::new(),
//!         })
//!         .await?;
//!
//!     let mut reader = source.create_reader().await?;
//!     loop {
//!         let records = reader.read().await?;
//!         if records.is_empty() {
//!             break;
//!         }
//!         for record in records {
//!             println!("{:?}", record.fields);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod searchstream;

// Re-export main API at crate root for easy access
pub use searchstream::datasource::elastic::{
    ElasticDataReader, ElasticDataSink, ElasticDataSource, ElasticDataWriter, FieldProjection,
    InlineProperties, JobContext, ProtocolVersion, StoreOperator,
};
pub use searchstream::datasource::{
    ConnectionString, DataReader, DataSink, DataSource, DataSourceError, DataWriter, SinkConfig,
    SourceConfig, SourceOffset,
};
pub use searchstream::record::{FieldValue, StreamRecord};
pub use searchstream::schema::{DataType, FieldDefinition, Schema};
