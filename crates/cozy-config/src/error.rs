//! Error types for configuration resolution.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("could not locate config file: {}", path.display())]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },
    /// A configuration file exists but could not be parsed.
    #[error("failed to read configuration from {}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse failure.
        source: ParseError,
    },
    /// A configuration file could not be read from disk.
    #[error("failed to read {}", path.display())]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// File involved in the failure.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// A required key is absent from every layer.
    #[error("missing configuration key '{key}'")]
    MissingKey {
        /// Dot-path key that was looked up.
        key: String,
    },
    /// A key resolved to a value of the wrong shape.
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue {
        /// Dot-path key that was looked up.
        key: String,
        /// Offending value rendered as text.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

/// Reasons a configuration document is rejected.
#[derive(Debug, Error)]
pub enum ParseError {
    /// YAML syntax or type error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    /// JSON syntax or type error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The document parsed but its top level is not a mapping.
    #[error("top-level value must be a mapping")]
    NotAMapping,
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
