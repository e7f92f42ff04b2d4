//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a session at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks, and so that broken states can be built by hand
//! in tests.

use std::collections::BTreeMap;

use peerchat_app::{App, Channel, PeerId, SessionState};

/// Snapshot of a session's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Connected channel.
    pub connected: Channel,
    /// Registered peers, in discovery order.
    pub peers: Vec<PeerId>,
    /// Line count per transcript.
    pub transcripts: BTreeMap<Channel, usize>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl SessionSnapshot {
    /// Snapshot of a fresh session: broadcast channel only.
    pub fn empty() -> Self {
        Self {
            connected: Channel::All,
            peers: Vec::new(),
            transcripts: BTreeMap::from([(Channel::All, 0)]),
        }
    }

    /// Snapshot with no transcripts at all.
    pub fn bare() -> Self {
        Self { connected: Channel::All, peers: Vec::new(), transcripts: BTreeMap::new() }
    }

    /// Extract a snapshot from session state.
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            connected: state.connected().clone(),
            peers: state.peers().to_vec(),
            transcripts: state
                .transcripts()
                .iter()
                .map(|(channel, t)| (channel.clone(), t.lines().count()))
                .collect(),
        }
    }

    /// Extract a snapshot from an App.
    pub fn from_app(app: &App) -> Self {
        Self::from_state(app.state())
    }

    /// Set the connected channel.
    #[must_use]
    pub fn with_connected(mut self, channel: impl Into<Channel>) -> Self {
        self.connected = channel.into();
        self
    }

    /// Register a peer, without adding its transcript.
    #[must_use]
    pub fn with_peer(mut self, id: impl Into<PeerId>) -> Self {
        self.peers.push(id.into());
        self
    }

    /// Add a transcript with the given line count.
    #[must_use]
    pub fn with_transcript(mut self, channel: impl Into<Channel>, lines: usize) -> Self {
        self.transcripts.insert(channel.into(), lines);
        self
    }
}
