//! Standard invariant checks.
//!
//! These invariants capture the session store's structural guarantees. They
//! verify WHAT must be true, not specific test scenarios.

use std::collections::HashSet;

use peerchat_app::Channel;

use super::{Invariant, InvariantKind, InvariantResult, SessionSnapshot, Violation};

/// The broadcast transcript must always exist.
pub struct AllChannelPresent;

impl Invariant for AllChannelPresent {
    fn kind(&self) -> InvariantKind {
        InvariantKind::AllChannelPresent
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.transcripts.contains_key(&Channel::All) {
            Ok(())
        } else {
            Err(Violation {
                invariant: self.kind(),
                message: "no transcript for the All channel".to_owned(),
            })
        }
    }
}

/// The connected channel must be `All` or a registered peer.
///
/// Prevents the UI from showing a conversation with a peer the session never
/// discovered.
pub struct ConnectedPeerKnown;

impl Invariant for ConnectedPeerKnown {
    fn kind(&self) -> InvariantKind {
        InvariantKind::ConnectedPeerKnown
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        match &state.connected {
            Channel::All => Ok(()),
            Channel::Peer(id) if state.peers.contains(id) => Ok(()),
            Channel::Peer(id) => Err(Violation {
                invariant: self.kind(),
                message: format!("connected peer {id:?} not in peers {:?}", state.peers),
            }),
        }
    }
}

/// No peer may be registered twice.
pub struct PeersUnique;

impl Invariant for PeersUnique {
    fn kind(&self) -> InvariantKind {
        InvariantKind::PeersUnique
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let mut seen = HashSet::new();
        for id in &state.peers {
            if !seen.insert(id) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("peer {id:?} registered twice"),
                });
            }
        }
        Ok(())
    }
}

/// Every registered peer must have a transcript.
pub struct PeerTranscriptsPresent;

impl Invariant for PeerTranscriptsPresent {
    fn kind(&self) -> InvariantKind {
        InvariantKind::PeerTranscriptsPresent
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let missing: Vec<_> = state
            .peers
            .iter()
            .filter(|id| !state.transcripts.contains_key(&Channel::Peer((*id).clone())))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Violation {
                invariant: self.kind(),
                message: format!("peers without transcript: {missing:?}"),
            })
        }
    }
}
