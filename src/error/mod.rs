//! Error handling module for EditX

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for EditX operations
#[derive(Error, Debug)]
pub enum EditxError {
    /// Engine, session or parameter failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration value rejected during validation
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration file {path}: {source}")]
    ConfigParseError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Input file is not a recognised video type
    #[error("Unsupported input file: {path}. Expected a video file (mp4, m4v, mov, mkv, webm, avi)")]
    UnsupportedInput { path: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for EditX operations
pub type EditxResult<T> = std::result::Result<T, EditxError>;
