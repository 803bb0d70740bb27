use code_graph::GraphError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for normalization
pub type Result<T> = std::result::Result<T, GrapherError>;

/// Errors that abort normalization
#[derive(Error, Debug)]
pub enum GrapherError {
    /// Grapher output failed a structural check
    #[error("Invalid grapher output: {0}")]
    Invalid(#[from] GraphError),

    /// Offset policy is unusable
    #[error("Invalid offset policy: {0}")]
    InvalidConfig(String),

    /// Offset policy could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GrapherError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Failure to convert the offsets of one record. Never fatal.
#[derive(Error, Debug)]
pub enum OffsetError {
    #[error("rune offset {rune} is past the end of the content ({rune_count} runes)")]
    RuneOutOfRange { rune: usize, rune_count: usize },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
