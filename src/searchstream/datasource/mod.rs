//! Generic Data Source Abstraction Layer
//!
//! This module provides generic data source and sink abstractions that are
//! independent of any specific query engine. The implementations here can be
//! used by:
//!
//! - SQL query engines
//! - Streaming processors
//! - ETL pipelines
//! - Data ingestion systems
//!
//! ## Architecture
//!
//! - **DataSource/DataSink**: Core traits for sources and sinks
//! - **DataReader/DataWriter**: Streaming interfaces for read/write operations
//! - **Implementations**: the search index adapter under [`elastic`]
//! - **Configuration**: URI- and property-based configuration types

pub mod config;
pub mod elastic;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export core types
pub use config::{ConnectionString, SinkConfig, SourceConfig};

pub use traits::{DataReader, DataSink, DataSource, DataWriter};
pub use types::{DataSourceError, SinkMetadata, SourceMetadata, SourceOffset};

// Re-export registry functions
pub use registry::{create_sink, create_source, DataSourceRegistry};
