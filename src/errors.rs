// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlobWatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A glob pattern could not be compiled. Registration is rejected as a
    /// whole when this is returned.
    #[error("invalid glob pattern '{pattern}': {reason}")]
    PatternSyntax { pattern: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlobWatchError {
    pub(crate) fn pattern(pattern: &str, reason: impl Into<String>) -> Self {
        GlobWatchError::PatternSyntax {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GlobWatchError>;
