//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or validating `steamloop.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid config file")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),

    /// A `[[layers]]` entry that cannot be drawn.
    #[error("invalid layer `{id}`: {reason}")]
    Layer { id: String, reason: String },
}
