//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use crate::PeerId;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// State changed; notify the presentation layer.
    Render,

    /// Start the network layer.
    StartNetwork,

    /// Send a message to every peer.
    SendBroadcast {
        /// Message text.
        message: String,
    },

    /// Send a message to one peer.
    SendDirect {
        /// Receiving peer.
        peer: PeerId,
        /// Message text.
        message: String,
    },
}
