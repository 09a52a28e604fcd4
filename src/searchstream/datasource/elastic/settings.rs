//! Settings and mode resolution for the search index connector
//!
//! Settings are merged from three sources with override precedence
//! job-configuration < inline-properties < location-derived values, then
//! frozen for the lifetime of the operation. Resolution also injects default
//! serialization strategies into the job configuration when the caller has
//! not picked any, and tags the settings with the protocol version the
//! cluster speaks (legacy clusters return flat `fields`, current clusters
//! return nested `_source` documents).

use crate::searchstream::datasource::config::ConnectionString;
use crate::searchstream::datasource::elastic::job_context::JobContext;
use crate::searchstream::datasource::elastic::property_keys as keys;
use crate::searchstream::datasource::types::DataSourceError;
use log::{debug, warn};
use std::collections::HashMap;

/// Whether this settings object drives a read or a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    Read,
    Write,
}

/// Protocol generation of the target cluster
///
/// Legacy clusters (pre-1.0) answer field projections with a flat `fields`
/// map; current clusters answer with the nested `_source` document, so
/// projected paths must be walked segment by segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    Legacy,
    Current,
}

impl ProtocolVersion {
    /// Classify a server version string ("0.90", "1.7", "8.11", ...)
    pub fn from_server_version(version: &str) -> Self {
        if version.trim().starts_with("0.") {
            ProtocolVersion::Legacy
        } else {
            ProtocolVersion::Current
        }
    }
}

/// Inline configuration supplied at adapter construction
///
/// Line-oriented `key = value` text; a `;` acts as a line separator so a
/// whole configuration can be passed as one string. Malformed input fails
/// construction immediately.
#[derive(Debug, Clone, Default)]
pub struct InlineProperties {
    properties: HashMap<String, String>,
}

impl InlineProperties {
    /// Parse constructor configuration strings
    pub fn parse(configuration: &[String]) -> Result<Self, DataSourceError> {
        let mut properties = HashMap::new();

        for chunk in configuration {
            // `;` separates options inside a single string
            for line in chunk.replace(';', "\n").lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let (key, value) = line.split_once('=').ok_or_else(|| {
                    DataSourceError::Configuration(format!(
                        "Cannot parse option [{}]; expected key=value",
                        line
                    ))
                })?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(DataSourceError::Configuration(format!(
                        "Cannot parse option [{}]; empty key",
                        line
                    )));
                }
                properties.insert(key.to_string(), value.trim().to_string());
            }
        }

        Ok(Self { properties })
    }

    /// Build inline properties from an already-parsed map
    pub fn from_map(properties: HashMap<String, String>) -> Self {
        Self { properties }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.properties.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.properties.iter()
    }
}

/// Fully resolved, immutable connector settings for one operation
#[derive(Debug, Clone)]
pub struct ElasticSettings {
    mode: OperationMode,
    nodes: Vec<String>,
    resource: String,
    query: Option<String>,
    scroll_fields: Option<String>,
    scroll_size: u64,
    scroll_keepalive: String,
    bulk_size_entries: usize,
    protocol: ProtocolVersion,
    properties: HashMap<String, String>,
}

impl ElasticSettings {
    /// Resolve settings for one operation
    ///
    /// `location` may be a full URI (`elastic://host:9200/index?...`), a bare
    /// resource string (`index/type`, optionally with `?query`), or empty
    /// (resource then comes from properties). Injecting missing serialization
    /// strategy defaults writes them back into the job configuration; the
    /// engine re-reads that configuration when it re-instantiates the
    /// adapter, so the defaults must stick.
    pub fn resolve(
        mode: OperationMode,
        location: &str,
        ctx: &JobContext,
        inline: &InlineProperties,
    ) -> Result<Self, DataSourceError> {
        // Precedence: job configuration first, inline properties override it
        let mut merged = ctx.job_config();
        for (key, value) in inline.iter() {
            merged.insert(key.clone(), value.clone());
        }

        // Location-derived values override everything
        let mut location_resource = None;
        let mut location_query = None;
        if !location.is_empty() {
            if location.contains("://") {
                let conn = ConnectionString::parse(location)?;
                if let Some(host) = &conn.host {
                    let port = conn.port.unwrap_or(9200);
                    merged.insert(keys::NODES.to_string(), format!("{}:{}", host, port));
                }
                if !conn.path.is_empty() {
                    location_resource = Some(conn.path.clone());
                }
                for (key, value) in &conn.params {
                    merged.insert(key.clone(), value.clone());
                }
            } else {
                let (resource, query) = match location.split_once('?') {
                    Some((resource, query)) => (resource, Some(query.to_string())),
                    None => (location, None),
                };
                let resource = resource.trim_matches('/');
                if !resource.is_empty() {
                    location_resource = Some(resource.to_string());
                }
                location_query = query;
            }
        }
        if let Some(query) = location_query {
            merged.insert(keys::QUERY.to_string(), query);
        }

        // Fill in serialization strategy defaults only when unset, and write
        // the injected defaults back into the job configuration
        for key in [
            keys::VALUE_WRITER,
            keys::VALUE_READER,
            keys::BYTES_CONVERTER,
            keys::FIELD_EXTRACTOR,
        ] {
            if !merged.contains_key(key) {
                merged.insert(key.to_string(), keys::DEFAULT_SERIALIZATION_STRATEGY.to_string());
                if ctx.suggest_job_property(key, keys::DEFAULT_SERIALIZATION_STRATEGY) {
                    debug!(
                        "No {} configured; defaulting to [{}]",
                        key,
                        keys::DEFAULT_SERIALIZATION_STRATEGY
                    );
                }
            }
        }

        let nodes: Vec<String> = merged
            .get(keys::NODES)
            .map(|s| s.as_str())
            .unwrap_or(keys::DEFAULT_NODES)
            .split(',')
            .map(|node| node.trim().to_string())
            .filter(|node| !node.is_empty())
            .collect();
        if nodes.is_empty() {
            return Err(DataSourceError::Configuration(
                "No search index nodes configured".to_string(),
            ));
        }

        // Resource precedence: location, then the mode-specific key, then the
        // shared key
        let mode_key = match mode {
            OperationMode::Read => keys::RESOURCE_READ,
            OperationMode::Write => keys::RESOURCE_WRITE,
        };
        let resource = location_resource
            .or_else(|| merged.get(mode_key).cloned())
            .or_else(|| merged.get(keys::RESOURCE).cloned())
            .map(|r| r.trim_matches('/').to_string())
            .unwrap_or_default();
        if resource.is_empty() {
            return Err(DataSourceError::Configuration(format!(
                "No index resource configured for {:?} operation; set {} or pass a location",
                mode,
                keys::RESOURCE
            )));
        }
        merged.insert(mode_key.to_string(), resource.clone());

        let scroll_size = parse_u64(
            keys::SCROLL_SIZE,
            merged.get(keys::SCROLL_SIZE),
            keys::DEFAULT_SCROLL_SIZE,
        );
        let bulk_size_entries = parse_u64(
            keys::BULK_SIZE_ENTRIES,
            merged.get(keys::BULK_SIZE_ENTRIES),
            keys::DEFAULT_BULK_SIZE_ENTRIES as u64,
        ) as usize;

        let protocol = merged
            .get(keys::SERVER_VERSION)
            .map(|v| ProtocolVersion::from_server_version(v))
            .unwrap_or(ProtocolVersion::Current);

        Ok(Self {
            mode,
            nodes,
            resource,
            query: merged.get(keys::QUERY).cloned(),
            scroll_fields: merged.get(keys::SCROLL_FIELDS).cloned(),
            scroll_size,
            scroll_keepalive: merged
                .get(keys::SCROLL_KEEPALIVE)
                .cloned()
                .unwrap_or_else(|| keys::DEFAULT_SCROLL_KEEPALIVE.to_string()),
            bulk_size_entries,
            protocol,
            properties: merged,
        })
    }

    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Explicit scroll field list, when the caller configured one
    pub fn scroll_fields(&self) -> Option<&str> {
        self.scroll_fields.as_deref()
    }

    pub fn scroll_size(&self) -> u64 {
        self.scroll_size
    }

    pub fn scroll_keepalive(&self) -> &str {
        &self.scroll_keepalive
    }

    pub fn bulk_size_entries(&self) -> usize {
        self.bulk_size_entries
    }

    pub fn protocol(&self) -> ProtocolVersion {
        self.protocol
    }

    /// Look up any merged property by key
    pub fn property(&self, key: &str) -> Option<&String> {
        self.properties.get(key)
    }
}

fn parse_u64(key: &str, value: Option<&String>, default: u64) -> u64 {
    match value {
        Some(raw) => match raw.parse::<u64>() {
            Ok(v) => v,
            Err(_) => {
                warn!("Invalid value '{}' for {}, using default {}", raw, key, default);
                default
            }
        },
        None => default,
    }
}
