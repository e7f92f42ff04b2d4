//! Session hand-off across activation boundaries.
//!
//! When the host deactivates the chat view, the whole session is captured
//! together with the network control handle and whether the network layer
//! was started. The next activation restores it verbatim and reuses the
//! handle, so peers, transcripts and a running network layer all survive.

use crate::{AppConfig, SessionState};

/// Session captured at deactivation.
///
/// Generic over the control handle type `H`, which the engine treats as
/// opaque.
#[derive(Debug, Clone)]
pub struct Snapshot<H> {
    /// Whether start was issued on the network layer.
    pub is_started: bool,
    /// Full session state.
    pub state: SessionState,
    /// Network control handle.
    pub control: H,
}

/// Outcome of restoring an optional snapshot.
#[derive(Debug, Clone)]
pub struct Restored<H> {
    /// Restored or fresh session state.
    pub state: SessionState,
    /// Control handle to reuse. `None` if the caller must create one.
    pub control: Option<H>,
    /// Whether the network layer is already running. When `false` the caller
    /// must start it.
    pub is_started: bool,
}

/// Capture a session for hand-off to the host.
pub fn capture<H>(state: SessionState, control: H, is_started: bool) -> Snapshot<H> {
    Snapshot { is_started, state, control }
}

/// Restore a session captured by [`capture`].
///
/// Without a snapshot, returns a fresh session built from `config` and
/// `is_started = false`.
pub fn restore<H>(snapshot: Option<Snapshot<H>>, config: &AppConfig) -> Restored<H> {
    match snapshot {
        Some(Snapshot { is_started, state, control }) => {
            tracing::debug!(peers = state.peers().len(), is_started, "Restoring captured session");
            Restored { state, control: Some(control), is_started }
        },
        None => Restored { state: SessionState::new(config), control: None, is_started: false },
    }
}
