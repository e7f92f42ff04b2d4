//! Engine-to-network translation layer.
//!
//! The [`Bridge`] owns the [`NetworkControl`] handle for the lifetime of one
//! activation and adapts it to the application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts [`crate::AppAction`] sends into network-layer calls.
//! - Starts the network layer at most once per handle, remembering that it
//!   was issued so a later activation can skip it.
//! - Converts network-layer failures into [`crate::AppEvent::NetworkError`]
//!   instead of propagating them.

use crate::{AppAction, AppEvent, NetworkControl};

/// Bridge between App actions and the network layer.
pub struct Bridge<N: NetworkControl> {
    control: N,
    started: bool,
}

impl<N: NetworkControl> Bridge<N> {
    /// Wrap a control handle. `started` records whether start was already
    /// issued on it.
    pub fn new(control: N, started: bool) -> Self {
        Self { control, started }
    }

    /// Whether start has been issued on the handle.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The wrapped control handle.
    pub fn control(&self) -> &N {
        &self.control
    }

    /// Start the network layer unless it is already running.
    ///
    /// Marked as started before the start call suspends, so a deactivation
    /// racing with a slow start never triggers a second one.
    pub async fn start(&mut self) -> Vec<AppEvent> {
        if self.started || self.control.is_running() {
            tracing::debug!("Network layer already running, skipping start");
            self.started = true;
            return vec![];
        }

        self.started = true;
        match self.control.start().await {
            Ok(()) => vec![AppEvent::NetworkStarted],
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start network layer");
                vec![AppEvent::NetworkError { message: e.to_string() }]
            },
        }
    }

    /// Process a send action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        let result = match &action {
            AppAction::SendBroadcast { message } => self.control.send_broadcast(message),
            AppAction::SendDirect { peer, message } => self.control.send_direct(peer, message),
            AppAction::Render | AppAction::StartNetwork => return vec![],
        };

        match result {
            Ok(()) => vec![],
            Err(e) => {
                tracing::warn!(error = %e, ?action, "Network send failed");
                vec![AppEvent::NetworkError { message: e.to_string() }]
            },
        }
    }

    /// Release the control handle and its started flag.
    pub fn into_parts(self) -> (N, bool) {
        (self.control, self.started)
    }
}
