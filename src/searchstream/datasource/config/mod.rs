//! Configuration system for pluggable data sources
//!
//! This module provides configuration abstractions for the supported data
//! source types. It supports both URI-based configuration
//! (e.g., "elastic://localhost:9200/twitter/tweet") and structured
//! configuration objects.

use crate::searchstream::datasource::DataSourceError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Configuration for data sources (inputs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SourceConfig {
    /// Search index source configuration
    Elastic {
        /// Comma-separated node addresses (host:port)
        nodes: String,
        /// Index resource, optionally with a mapping suffix ("index/type")
        resource: String,
        /// Additional source properties
        properties: HashMap<String, String>,
    },
    /// Generic configuration for custom sources
    Generic {
        source_type: String,
        properties: HashMap<String, String>,
    },
}

/// Configuration for data sinks (outputs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SinkConfig {
    /// Search index sink configuration
    Elastic {
        nodes: String,
        resource: String,
        properties: HashMap<String, String>,
    },
    /// Generic configuration for custom sinks
    Generic {
        sink_type: String,
        properties: HashMap<String, String>,
    },
}

/// Default port when a node address omits one
const DEFAULT_ELASTIC_PORT: u16 = 9200;

/// Connection string parser for URI-based configuration
#[derive(Debug, Clone)]
pub struct ConnectionString {
    pub scheme: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
    pub params: HashMap<String, String>,
}

impl ConnectionString {
    /// Parse a URI into a ConnectionString
    ///
    /// Examples:
    /// - `elastic://localhost:9200/twitter/tweet?q=kimchy`
    /// - `elastic://es-node/logs-2026?scroll.size=500`
    pub fn parse(uri: &str) -> Result<Self, DataSourceError> {
        let parts: Vec<&str> = uri.splitn(2, "://").collect();
        if parts.len() != 2 {
            return Err(DataSourceError::Configuration(format!(
                "Invalid URI format: {}",
                uri
            )));
        }

        let scheme = parts[0].to_string();
        let remainder = parts[1];

        // Split path and query parameters
        let (path_part, query_part) = match remainder.find('?') {
            Some(pos) => (&remainder[..pos], Some(&remainder[pos + 1..])),
            None => (remainder, None),
        };

        let (host, port, path) = if path_part.contains('/') {
            // Host with path: elastic://localhost:9200/index/type
            let host_path: Vec<&str> = path_part.splitn(2, '/').collect();
            let host_port = host_path[0];
            let path = host_path[1].to_string();

            let (host, port) = if host_port.contains(':') {
                let hp: Vec<&str> = host_port.splitn(2, ':').collect();
                let host = Some(hp[0].to_string());
                let port = hp[1].parse::<u16>().ok();
                (host, port)
            } else {
                (Some(host_port.to_string()), None)
            };

            (host, port, path)
        } else {
            // Host only: resource must come from properties
            (Some(path_part.to_string()), None, String::new())
        };

        // Parse query parameters
        let mut params = HashMap::new();
        if let Some(query) = query_part {
            for param in query.split('&') {
                let kv: Vec<&str> = param.splitn(2, '=').collect();
                if kv.len() == 2 {
                    params.insert(kv[0].to_string(), kv[1].to_string());
                }
            }
        }

        Ok(ConnectionString {
            scheme,
            host,
            port,
            path,
            params,
        })
    }

    fn nodes(&self) -> Result<String, DataSourceError> {
        match (&self.host, self.port) {
            (Some(host), Some(port)) => Ok(format!("{}:{}", host, port)),
            (Some(host), None) => Ok(format!("{}:{}", host, DEFAULT_ELASTIC_PORT)),
            _ => Err(DataSourceError::Configuration(
                "Search index connection requires a host".to_string(),
            )),
        }
    }

    /// Convert to a source configuration
    pub fn to_source_config(&self) -> Result<SourceConfig, DataSourceError> {
        match self.scheme.as_str() {
            "elastic" | "es" => {
                let nodes = self.nodes()?;
                if self.path.is_empty() && !self.params.contains_key("elastic.resource") {
                    return Err(DataSourceError::Configuration(
                        "Search index source requires an index resource".to_string(),
                    ));
                }
                Ok(SourceConfig::Elastic {
                    nodes,
                    resource: self.path.clone(),
                    properties: self.params.clone(),
                })
            }
            _ => Ok(SourceConfig::Generic {
                source_type: self.scheme.clone(),
                properties: self.params.clone(),
            }),
        }
    }

    /// Convert to a sink configuration
    pub fn to_sink_config(&self) -> Result<SinkConfig, DataSourceError> {
        match self.scheme.as_str() {
            "elastic" | "es" => {
                let nodes = self.nodes()?;
                if self.path.is_empty() && !self.params.contains_key("elastic.resource") {
                    return Err(DataSourceError::Configuration(
                        "Search index sink requires an index resource".to_string(),
                    ));
                }
                Ok(SinkConfig::Elastic {
                    nodes,
                    resource: self.path.clone(),
                    properties: self.params.clone(),
                })
            }
            _ => Ok(SinkConfig::Generic {
                sink_type: self.scheme.clone(),
                properties: self.params.clone(),
            }),
        }
    }
}

impl FromStr for ConnectionString {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elastic_uri_parsing() {
        let conn = ConnectionString::parse("elastic://localhost:9200/twitter/tweet?q=kimchy")
            .unwrap();

        assert_eq!(conn.scheme, "elastic");
        assert_eq!(conn.host, Some("localhost".to_string()));
        assert_eq!(conn.port, Some(9200));
        assert_eq!(conn.path, "twitter/tweet");
        assert_eq!(conn.params.get("q"), Some(&"kimchy".to_string()));
    }

    #[test]
    fn test_elastic_uri_default_port() {
        let conn = ConnectionString::parse("elastic://es-node/logs-2026").unwrap();
        let config = conn.to_source_config().unwrap();

        match config {
            SourceConfig::Elastic {
                nodes, resource, ..
            } => {
                assert_eq!(nodes, "es-node:9200");
                assert_eq!(resource, "logs-2026");
            }
            _ => panic!("Expected Elastic config"),
        }
    }

    #[test]
    fn test_invalid_uri_rejected() {
        let result = ConnectionString::parse("no-scheme-here");
        assert!(matches!(result, Err(DataSourceError::Configuration(_))));
    }

    #[test]
    fn test_missing_resource_rejected() {
        let conn = ConnectionString::parse("elastic://localhost:9200").unwrap();
        assert!(conn.to_source_config().is_err());
        assert!(conn.to_sink_config().is_err());
    }

    #[test]
    fn test_generic_scheme_passthrough() {
        let conn = ConnectionString::parse("custom://anything?x=1").unwrap();
        match conn.to_source_config().unwrap() {
            SourceConfig::Generic { source_type, .. } => assert_eq!(source_type, "custom"),
            _ => panic!("Expected Generic config"),
        }
    }
}
