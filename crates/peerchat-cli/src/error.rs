//! CLI error types.

use thiserror::Error;

/// Errors that end a scripted session.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the script or writing the session dump failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session could not be serialized.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A peer name argument was not of the form `ID=NAME`.
    #[error("expected ID=NAME, got {0:?}")]
    PeerName(String),
}
