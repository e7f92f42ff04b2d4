//! Message routing into transcripts.
//!
//! Inbound chat traffic is classified by its origin tag: anything on a `chat`
//! API is broadcast and lands in the `All` transcript. Everything else is
//! direct and lands in the transcript of the *currently connected* channel,
//! not the sender's. A direct message from peer B that arrives while the user
//! is looking at peer A is therefore shown under A, and the attribution is
//! logged at debug level.

use crate::{AppAction, Channel, InboundChat, PeerId, SessionState};

/// Substring of the origin tag that marks broadcast traffic.
pub const BROADCAST_TAG: &str = "chat";

/// Handle used for the local user's own lines.
pub const LOCAL_HANDLE: &str = "me";

/// Handle used for private messages from a peer.
pub const PRIVATE_HANDLE: &str = "peer";

/// Routing class of an inbound chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Shown on the broadcast channel.
    Broadcast,
    /// Shown on the connected peer's channel.
    Direct,
}

/// Classify an inbound message by its origin tag.
pub fn classify(event: &InboundChat) -> Delivery {
    if event.origin_tag.contains(BROADCAST_TAG) { Delivery::Broadcast } else { Delivery::Direct }
}

/// Append an inbound chat message to the transcript it belongs to.
///
/// Returns the channel that received the line.
pub fn route_incoming(state: &mut SessionState, event: &InboundChat) -> Channel {
    let line = format!("{}: {}", event.payload.handle, event.payload.message);

    let channel = match classify(event) {
        Delivery::Broadcast => Channel::All,
        Delivery::Direct => {
            let focused = state.connected().clone();
            tracing::debug!(
                focused = %focused,
                handle = %event.payload.handle,
                "Direct message attributed to the connected channel, not its sender"
            );
            focused
        },
    };

    state.transcript_mut(&channel).append_line(&line);
    channel
}

/// Append the local user's message to the connected channel.
///
/// Also records `nickname` as the user's display name. Returns the send
/// action for the network layer.
pub fn route_outgoing(state: &mut SessionState, message: &str, nickname: &str) -> AppAction {
    let channel = state.connected().clone();
    state.transcript_mut(&channel).append_line(&format!("{LOCAL_HANDLE}: {message}"));
    state.set_nickname(nickname);

    match channel {
        Channel::All => AppAction::SendBroadcast { message: message.to_owned() },
        Channel::Peer(peer) => AppAction::SendDirect { peer, message: message.to_owned() },
    }
}

/// Append a decrypted private message to its sender's transcript.
pub fn route_private(state: &mut SessionState, from: &PeerId, text: &str) {
    state
        .transcript_mut(&Channel::from(from.as_str()))
        .append_line(&format!("{PRIVATE_HANDLE}: {text}"));
}
