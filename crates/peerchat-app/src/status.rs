//! Status log processing and peer discovery.
//!
//! The network layer reports progress as free-form status lines. Every line
//! lands in the status log; lines announcing a new peer additionally register
//! that peer.

use crate::{EngineError, PeerId, SessionState};

/// Prefix of a peer-discovery announcement. The peer ID is the remainder.
pub const DISCOVERY_MARKER: &str = "New peer found: ";

/// Extract the peer ID from a discovery announcement.
///
/// Returns `Ok(None)` for lines that are not announcements.
pub fn parse_discovery(line: &str) -> Result<Option<PeerId>, EngineError> {
    let Some(rest) = line.strip_prefix(DISCOVERY_MARKER) else {
        return Ok(None);
    };

    let id = rest.trim_end_matches(['\r', '\n']);
    if id.is_empty() {
        return Err(EngineError::Parse(format!("discovery announcement without peer ID: {line:?}")));
    }
    Ok(Some(id.to_owned()))
}

/// Append a status line and register any peer it announces.
///
/// Returns the newly registered peer, if any. Parse failures are logged and
/// leave only the status log updated.
pub fn process_status(state: &mut SessionState, line: &str) -> Option<PeerId> {
    state.append_status(line);

    match parse_discovery(line) {
        Ok(Some(id)) => state.register_peer(id.clone()).then_some(id),
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(%err, "Ignoring malformed status line");
            None
        },
    }
}
