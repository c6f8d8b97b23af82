//! Scroll configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`ScrollConfig`](crate::ScrollConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed
    #[error("Failed to parse scroll config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized
    #[error("Failed to serialize scroll config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value is out of its accepted range
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
