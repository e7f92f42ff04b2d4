//! Loopback network layer.
//!
//! Stands in for the peer-to-peer control library when the engine is driven
//! from a script: start always succeeds, sends are logged and counted but
//! never leave the process.

use std::{collections::HashMap, convert::Infallible};

use peerchat_app::{EngineError, NetworkControl, PeerDirectory, PeerId, PeerRecord};

/// Network layer that never leaves the process.
#[derive(Debug, Default)]
pub struct LoopbackNetwork {
    running: bool,
    sent: usize,
    names: HashMap<PeerId, String>,
}

impl LoopbackNetwork {
    /// Create a stopped loopback network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `name` as the display name of `id`.
    #[must_use]
    pub fn with_name(mut self, id: impl Into<PeerId>, name: impl Into<String>) -> Self {
        self.names.insert(id.into(), name.into());
        self
    }

    /// Number of messages sent.
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl PeerDirectory for LoopbackNetwork {
    fn peer_record(&self, id: &str) -> Result<Option<PeerRecord>, EngineError> {
        Ok(self.names.get(id).map(|name| PeerRecord { name: Some(name.clone()) }))
    }
}

impl NetworkControl for LoopbackNetwork {
    type Error = Infallible;

    async fn start(&mut self) -> Result<(), Infallible> {
        self.running = true;
        tracing::info!("Loopback network started");
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn send_broadcast(&mut self, message: &str) -> Result<(), Infallible> {
        self.sent += 1;
        tracing::info!(text = message, "Broadcast");
        Ok(())
    }

    fn send_direct(&mut self, peer: &str, message: &str) -> Result<(), Infallible> {
        self.sent += 1;
        tracing::info!(peer, text = message, "Direct message");
        Ok(())
    }
}
