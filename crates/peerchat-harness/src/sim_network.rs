//! Simulated network layer.
//!
//! `SimNetwork` stands in for the peer-to-peer control library. It records
//! every start and send so tests can verify what the engine asked the network
//! to do, and serves a scripted peer directory for name resolution.

use std::collections::HashMap;

use peerchat_app::{EngineError, NetworkControl, PeerDirectory, PeerId, PeerRecord};
use thiserror::Error;

/// Simulated network failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Start was configured to fail.
    #[error("network start failed")]
    StartFailed,
    /// Sends were configured to fail.
    #[error("send to {0} failed")]
    SendFailed(String),
}

/// A message the engine handed to the network layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    /// Sent to every peer.
    Broadcast(String),
    /// Sent to one peer.
    Direct {
        /// Receiving peer.
        peer: PeerId,
        /// Message text.
        message: String,
    },
}

#[derive(Debug, Clone)]
enum DirectoryEntry {
    Record(PeerRecord),
    Malformed,
}

/// Recording network layer with a scripted peer directory.
#[derive(Debug, Clone, Default)]
pub struct SimNetwork {
    running: bool,
    start_calls: usize,
    fail_start: bool,
    fail_sends: bool,
    sent: Vec<SentMessage>,
    directory: HashMap<PeerId, DirectoryEntry>,
}

impl SimNetwork {
    /// Create a stopped network with an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every start attempt fail.
    #[must_use]
    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Make every send fail.
    #[must_use]
    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// Add a directory record carrying a display name.
    #[must_use]
    pub fn with_peer_name(mut self, id: impl Into<PeerId>, name: impl Into<String>) -> Self {
        let record = PeerRecord { name: Some(name.into()) };
        self.directory.insert(id.into(), DirectoryEntry::Record(record));
        self
    }

    /// Add a directory record without a display name.
    #[must_use]
    pub fn with_unnamed_peer(mut self, id: impl Into<PeerId>) -> Self {
        self.directory.insert(id.into(), DirectoryEntry::Record(PeerRecord::default()));
        self
    }

    /// Add a directory record that fails to load.
    #[must_use]
    pub fn with_malformed_peer(mut self, id: impl Into<PeerId>) -> Self {
        self.directory.insert(id.into(), DirectoryEntry::Malformed);
        self
    }

    /// Number of times start was called.
    pub fn start_calls(&self) -> usize {
        self.start_calls
    }

    /// Messages sent so far, in order.
    pub fn sent(&self) -> &[SentMessage] {
        &self.sent
    }

    /// Take all recorded messages.
    pub fn take_sent(&mut self) -> Vec<SentMessage> {
        std::mem::take(&mut self.sent)
    }
}

impl PeerDirectory for SimNetwork {
    fn peer_record(&self, id: &str) -> Result<Option<PeerRecord>, EngineError> {
        match self.directory.get(id) {
            None => Ok(None),
            Some(DirectoryEntry::Record(record)) => Ok(Some(record.clone())),
            Some(DirectoryEntry::Malformed) => {
                Err(EngineError::Lookup {
                    peer: id.to_owned(),
                    reason: "malformed directory record".to_owned(),
                })
            },
        }
    }
}

impl NetworkControl for SimNetwork {
    type Error = SimError;

    async fn start(&mut self) -> Result<(), SimError> {
        self.start_calls += 1;
        // Starting suspends in the real network layer.
        tokio::task::yield_now().await;

        if self.fail_start {
            return Err(SimError::StartFailed);
        }
        self.running = true;
        tracing::debug!(calls = self.start_calls, "Simulated network started");
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn send_broadcast(&mut self, message: &str) -> Result<(), SimError> {
        if self.fail_sends {
            return Err(SimError::SendFailed("All".to_owned()));
        }
        self.sent.push(SentMessage::Broadcast(message.to_owned()));
        Ok(())
    }

    fn send_direct(&mut self, peer: &str, message: &str) -> Result<(), SimError> {
        if self.fail_sends {
            return Err(SimError::SendFailed(peer.to_owned()));
        }
        self.sent.push(SentMessage::Direct { peer: peer.to_owned(), message: message.to_owned() });
        Ok(())
    }
}
