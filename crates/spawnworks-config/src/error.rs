//! Error types for configuration loading

use thiserror::Error;

/// Configuration loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Duplicate upgrade key: {0}")]
    DuplicateUpgrade(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
