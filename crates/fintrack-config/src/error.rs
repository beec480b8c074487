//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid value for '{field}' in '{section}': {reason}")]
    InvalidField {
        /// Section that failed validation.
        section: &'static str,
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Human-readable reason for the failure.
        reason: &'static str,
    },
    /// Config file was not valid JSON for the expected shape.
    #[error("failed to parse config file {}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Source serde error.
        source: serde_json::Error,
    },
    /// File system operation failed.
    #[error("filesystem operation '{operation}' failed for {}", path.display())]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// File the operation targeted.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
