//! Error types for loading trees and configuration

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fallible comparison operations
pub type CompareResult<T> = Result<T, CompareError>;

/// Errors raised around the comparison core.
///
/// Normalizing, diffing, classifying and building reports never fail; these
/// errors only come from reading inputs and validating configuration.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Failed to read a file
    #[error("failed to read file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON
    #[error("failed to parse JSON from {source_name}: {source}")]
    ParseJson {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to parse YAML
    #[error("failed to parse YAML from {source_name}: {source}")]
    ParseYaml {
        source_name: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The input is not something a tree can be read from
    #[error("unsupported tree source {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}
