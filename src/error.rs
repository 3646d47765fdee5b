// SPDX-License-Identifier: MIT

//! Errors raised by the host side: configuration, seed files and serving

use thiserror::Error;

/// Top-level error type for the store host
#[derive(Debug, Error)]
pub enum HostError {
    /// Configuration errors (bad env vars, invalid flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Seed file content that cannot be loaded into the store
    #[error("Seed error: {0}")]
    Seed(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl HostError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a seed error
    pub fn seed(message: impl Into<String>) -> Self {
        Self::Seed(message.into())
    }
}
