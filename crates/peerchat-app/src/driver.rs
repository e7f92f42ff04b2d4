//! Traits for the engine's external collaborators.
//!
//! The [`Driver`] trait decouples the runtime from the presentation layer and
//! the source of events. The [`NetworkControl`] trait stands for the
//! peer-to-peer network layer the engine starts and sends through. Each host
//! implements both, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use crate::{App, AppEvent, PeerDirectory};

/// Event source and presentation layer for the application runtime.
///
/// # Implementations
///
/// - **CLI**: Replays a JSON-lines script and writes the session to stdout
/// - **Simulation**: Queued events for deterministic tests
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next event.
    ///
    /// Returns `None` once the host stops delivering events, which ends
    /// [`crate::Runtime::run`].
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Present the current application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Release presentation resources.
    fn stop(&mut self);
}

/// Control handle of the peer-to-peer network layer.
///
/// The handle outlives any single activation of the runtime: it is handed to
/// the host inside a [`crate::Snapshot`] on deactivation and reused on the
/// next activation. The engine never closes it.
pub trait NetworkControl: PeerDirectory + Send {
    /// Network-layer error type.
    type Error: std::error::Error + Send + 'static;

    /// Start the network layer. Idempotent if it is already running.
    fn start(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Whether the network layer is running.
    fn is_running(&self) -> bool;

    /// Send a message to every peer.
    fn send_broadcast(&mut self, message: &str) -> Result<(), Self::Error>;

    /// Send a message to a single peer.
    fn send_direct(&mut self, peer: &str, message: &str) -> Result<(), Self::Error>;
}
