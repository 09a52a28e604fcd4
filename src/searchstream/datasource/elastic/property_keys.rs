//! Standardized property key constants for the search index connector
//!
//! This module defines all property keys used across ElasticDataSource and
//! ElasticDataSink to ensure consistent naming and extraction. Using these
//! constants prevents typos and makes property key usage traceable across the
//! codebase.

// ============================================================================
// CONNECTION PROPERTIES
// ============================================================================

/// Comma-separated node addresses (host:port)
pub const NODES: &str = "elastic.nodes";

/// Default node address when none is configured
pub const DEFAULT_NODES: &str = "localhost:9200";

/// Index resource, optionally with a mapping suffix ("index/type")
pub const RESOURCE: &str = "elastic.resource";

/// Read-mode resource (takes precedence over RESOURCE when reading)
pub const RESOURCE_READ: &str = "elastic.resource.read";

/// Write-mode resource (takes precedence over RESOURCE when writing)
pub const RESOURCE_WRITE: &str = "elastic.resource.write";

/// Query string or query DSL applied when reading
pub const QUERY: &str = "elastic.query";

/// Server version the cluster speaks, e.g. "0.90", "1.7", "8.11"
pub const SERVER_VERSION: &str = "elastic.server.version";

// ============================================================================
// READ (SCROLL) PROPERTIES
// ============================================================================

/// Explicit comma-separated field list to scroll; set by the caller to skip
/// projection discovery entirely
pub const SCROLL_FIELDS: &str = "elastic.scroll.fields";

/// Documents per scroll page
pub const SCROLL_SIZE: &str = "elastic.scroll.size";

/// Default scroll page size
pub const DEFAULT_SCROLL_SIZE: u64 = 50;

/// Scroll cursor keep-alive
pub const SCROLL_KEEPALIVE: &str = "elastic.scroll.keepalive";

/// Default scroll keep-alive window
pub const DEFAULT_SCROLL_KEEPALIVE: &str = "10m";

// ============================================================================
// WRITE (BULK) PROPERTIES
// ============================================================================

/// Number of documents buffered before a bulk flush
pub const BULK_SIZE_ENTRIES: &str = "elastic.batch.size.entries";

/// Default bulk flush threshold
pub const DEFAULT_BULK_SIZE_ENTRIES: usize = 1000;

// ============================================================================
// SERIALIZATION STRATEGY PROPERTIES
// ============================================================================
// Injected as defaults at settings resolution when the caller has not picked
// a strategy explicitly.

/// Record-to-document value writer strategy
pub const VALUE_WRITER: &str = "elastic.ser.writer.value.class";

/// Document-to-record value reader strategy
pub const VALUE_READER: &str = "elastic.ser.reader.value.class";

/// Raw-bytes converter strategy
pub const BYTES_CONVERTER: &str = "elastic.input.json.bytes.converter.class";

/// Field extractor strategy for document ids and routing
pub const FIELD_EXTRACTOR: &str = "elastic.mapping.field.extractor.class";

/// Default serialization strategy for all four slots
pub const DEFAULT_SERIALIZATION_STRATEGY: &str = "json";

// ============================================================================
// INTERNAL SIDE-CHANNEL PROPERTIES
// ============================================================================
// Keys for metadata carried across adapter re-instantiation through the
// signature-keyed job context; never set by users directly.

/// Comma-joined projected field paths for the read side
pub const INTERNAL_TARGET_FIELDS: &str = "internal.elastic.target.fields";

/// Serialized schema blob for the write side
pub const INTERNAL_RESOURCE_SCHEMA: &str = "internal.elastic.resource.schema";
