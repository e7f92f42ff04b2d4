//! Peer display names.

use crate::EngineError;

/// Directory record for a peer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerRecord {
    /// Name the peer advertises. `None` if it never announced one.
    pub name: Option<String>,
}

/// External directory of known peers, usually backed by the network layer.
pub trait PeerDirectory {
    /// Look up a peer's record. `Ok(None)` if the peer is unknown.
    fn peer_record(&self, id: &str) -> Result<Option<PeerRecord>, EngineError>;
}

/// Best-effort display name for a peer.
///
/// Falls back to the raw ID when the peer is unknown, has no usable name, or
/// the lookup fails.
pub fn resolve_display_name<D: PeerDirectory + ?Sized>(directory: &D, id: &str) -> String {
    match directory.peer_record(id) {
        Ok(Some(PeerRecord { name: Some(name) })) if !name.is_empty() => name,
        Ok(_) => id.to_owned(),
        Err(err) => {
            tracing::debug!(peer = %id, %err, "Falling back to raw peer ID");
            id.to_owned()
        },
    }
}
