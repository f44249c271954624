//! Error types for spawnworks-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// An upgrade advance was attempted past the last defined level
    #[error("upgrade '{0}' is already at its maximum level")]
    MaxLevelReached(String),

    /// A prerequisite for the target level is not satisfied
    #[error(
        "upgrade '{upgrade}' requires '{requires}' at level {min_level} (currently {current})"
    )]
    PrerequisiteUnmet {
        upgrade: String,
        requires: String,
        min_level: u32,
        current: u32,
    },

    /// The upgrade key is not defined for the record's category
    #[error("unknown upgrade key '{0}'")]
    UnknownUpgrade(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
