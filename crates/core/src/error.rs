//! Error types for command history recall
//!
//! History operations themselves are total and never fail. Errors only arise
//! at the configuration boundary: reading, parsing and validating
//! `recall.toml`. We use `thiserror` for `Display` and `Error` impls.

use std::io;
use thiserror::Error;

/// Result type alias for recall operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for recall configuration
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading a config file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Config content is not valid TOML or does not match the schema
    #[error("Config parse error: {0}")]
    ConfigParse(String),

    /// Config parsed but holds a value the scorer cannot use
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ConfigParse(e.to_string())
    }
}
