//! Construction-time configuration errors.

use thiserror::Error;

/// Errors raised while resolving string-keyed component attributes
/// into typed components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown physics category: {0:?}")]
    UnknownCategory(String),

    #[error("unknown physics shape: {0:?}")]
    UnknownShape(String),

    #[error("unknown monster type: {0:?}")]
    UnknownMonster(String),

    #[error("unknown collectible type: {0:?}")]
    UnknownCollectible(String),

    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("malformed configuration: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Malformed(err.to_string())
    }
}
