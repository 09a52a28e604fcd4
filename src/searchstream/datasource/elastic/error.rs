//! Search index data source and sink error types

use crate::searchstream::datasource::elastic::client::ClientError;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ElasticDataSourceError {
    /// Index client error
    Client(ClientError),
    /// Configuration error
    Configuration(String),
    /// Projection resolution error
    Projection(String),
    /// Serialization error
    Serialization(String),
    /// Interrupted while pulling the next document
    Interrupted(String),
}

#[derive(Debug)]
pub enum ElasticDataSinkError {
    /// Index client error
    Client(ClientError),
    /// Configuration error
    Configuration(String),
    /// Schema error
    Schema(String),
    /// Serialization error
    Serialization(String),
    /// Interrupted during the underlying write
    Interrupted(String),
}

impl fmt::Display for ElasticDataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElasticDataSourceError::Client(err) => write!(f, "Index client error: {}", err),
            ElasticDataSourceError::Configuration(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            ElasticDataSourceError::Projection(msg) => write!(f, "Projection error: {}", msg),
            ElasticDataSourceError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ElasticDataSourceError::Interrupted(msg) => write!(f, "Read interrupted: {}", msg),
        }
    }
}

impl Error for ElasticDataSourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ElasticDataSourceError::Client(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientError> for ElasticDataSourceError {
    fn from(err: ClientError) -> Self {
        ElasticDataSourceError::Client(err)
    }
}

impl fmt::Display for ElasticDataSinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElasticDataSinkError::Client(err) => write!(f, "Index sink client error: {}", err),
            ElasticDataSinkError::Configuration(msg) => {
                write!(f, "Sink configuration error: {}", msg)
            }
            ElasticDataSinkError::Schema(msg) => write!(f, "Sink schema error: {}", msg),
            ElasticDataSinkError::Serialization(msg) => {
                write!(f, "Sink serialization error: {}", msg)
            }
            ElasticDataSinkError::Interrupted(msg) => write!(f, "Write interrupted: {}", msg),
        }
    }
}

impl Error for ElasticDataSinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ElasticDataSinkError::Client(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientError> for ElasticDataSinkError {
    fn from(err: ClientError) -> Self {
        ElasticDataSinkError::Client(err)
    }
}
