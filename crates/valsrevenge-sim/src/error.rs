//! Runtime and persistence errors.
//!
//! None of these abort a tick. Callers inside the engine log them and carry
//! on; they are surfaced as `Result`s so tests and hosts can observe them.

use thiserror::Error;
use valsrevenge_core::types::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("expected entity `{0}` is missing")]
    UnresolvedLookup(&'static str),

    #[error("invalid state transition {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("save file is not a valid record: {0}")]
    Format(#[from] serde_json::Error),
}
