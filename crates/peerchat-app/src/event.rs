//! Application input events.
//!
//! This module defines [`AppEvent`], the closed set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - Network-layer callbacks (status lines, chat and private messages).
//! - Local user actions (sending a message, switching views, command output).
//!
//! Loosely typed network payloads are validated into [`InboundChat`] at the
//! boundary, before they reach the router.

use serde::{Deserialize, Serialize};

use crate::{Channel, EngineError, PeerId, View};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Status line from the network layer.
    Status(String),

    /// Chat message from the network layer.
    Chat(InboundChat),

    /// Decrypted private message attributed to its sender.
    PrivateMessage {
        /// Sending peer.
        from: PeerId,
        /// Message text.
        text: String,
    },

    /// Peer reported directly by the network layer.
    PeerDiscovered(PeerId),

    /// Local user sends a message on the connected channel.
    SendMessage {
        /// Message text.
        message: String,
        /// Nickname the user is sending under.
        nickname: String,
    },

    /// Local user switches view, optionally selecting a channel.
    SwitchView {
        /// View to focus.
        view: View,
        /// Channel to connect. `None` keeps the current one.
        peer: Option<Channel>,
    },

    /// Output for the command terminal. `None` clears it.
    CommandLog(Option<String>),

    /// Network layer finished starting.
    NetworkStarted,

    /// Network layer reported a failure.
    NetworkError {
        /// Error description.
        message: String,
    },
}

/// Chat message as delivered by the network layer.
///
/// The origin tag tells broadcast traffic apart from direct traffic; see
/// [`crate::router::classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundChat {
    /// API name the message arrived on.
    #[serde(rename = "apiName", default)]
    pub origin_tag: String,
    /// Message body.
    #[serde(rename = "data")]
    pub payload: ChatPayload,
}

/// Body of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    /// Message text.
    pub message: String,
    /// Sender's display handle.
    pub handle: String,
}

impl InboundChat {
    /// Build an inbound chat message.
    pub fn new(
        origin_tag: impl Into<String>,
        handle: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            origin_tag: origin_tag.into(),
            payload: ChatPayload { message: message.into(), handle: handle.into() },
        }
    }

    /// Validate a raw JSON chat event.
    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Validate an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, EngineError> {
        Ok(serde_json::from_value(value)?)
    }
}
