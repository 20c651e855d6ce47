//! Crate-level error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnimError {
    #[error("unknown animation mode `{0}` (expected `opt` or `pdf`)")]
    UnknownMode(String),
    #[error("invalid animation config: {0}")]
    Config(#[from] serde_json::Error),
    /// The canvas could not provide a 2D drawing context.
    #[error("canvas 2d context unavailable: {0}")]
    Context(String),
    #[error("failed to schedule animation frame: {0}")]
    Schedule(String),
}
