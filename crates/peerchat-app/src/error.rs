//! Engine error kinds.
//!
//! Only [`EngineError::InvalidView`] and [`EngineError::InvalidSession`] ever
//! reach a caller. The other kinds are produced at event-handler boundaries,
//! logged, and recovered from locally so that malformed network input can
//! never take the session down.

use thiserror::Error;

/// Errors produced by the session engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Malformed status line or inbound event shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Peer not present in the peer directory, or its record is unusable.
    #[error("lookup failed for peer {peer}: {reason}")]
    Lookup {
        /// Peer the lookup was for.
        peer: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// A transcript key was referenced but absent from the mapping.
    #[error("missing transcript for channel {0}")]
    MissingTranscript(String),

    /// A view switch named a view that does not exist.
    #[error("invalid view: {0:?}")]
    InvalidView(String),

    /// A serialized session breaks a store invariant.
    #[error("invalid session: {0}")]
    InvalidSession(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
