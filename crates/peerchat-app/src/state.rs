//! Session state store.
//!
//! [`SessionState`] is the aggregate root of a chat session: focused view,
//! connected channel, discovered peers, per-channel transcripts, and the
//! status and command logs. It exclusively owns its collections; every
//! mutation goes through its methods so the store invariants hold after each
//! call:
//!
//! 1. `transcripts` always contains [`Channel::All`].
//! 2. The connected channel is [`Channel::All`] or a registered peer.
//! 3. `peers` holds no duplicates, in discovery order.
//! 4. Every registered peer has a transcript.
//!
//! The focused view and the connected channel are independent: switching to
//! the status view does not forget which peer was selected.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{AppConfig, EngineError};

/// Opaque network peer identifier.
pub type PeerId = String;

/// Sentinel name of the broadcast channel.
pub const BROADCAST_CHANNEL: &str = "All";

/// Indentation prefixed to every status and command log line.
pub(crate) const LOG_INDENT: &str = "   ";

/// A conversation channel: the broadcast channel or a single peer.
///
/// Serialized as a plain string, where `"All"` always denotes the broadcast
/// channel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Channel {
    /// Broadcast channel visible to every peer.
    All,
    /// Direct channel with one peer.
    Peer(PeerId),
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(BROADCAST_CHANNEL),
            Self::Peer(id) => f.write_str(id),
        }
    }
}

impl From<String> for Channel {
    fn from(value: String) -> Self {
        if value == BROADCAST_CHANNEL { Self::All } else { Self::Peer(value) }
    }
}

impl From<&str> for Channel {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Channel> for String {
    fn from(value: Channel) -> Self {
        match value {
            Channel::All => BROADCAST_CHANNEL.to_owned(),
            Channel::Peer(id) => id,
        }
    }
}

/// The terminal view currently in focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    /// Chat transcript of the connected channel.
    #[default]
    Chat,
    /// Command terminal.
    Command,
    /// Network status log.
    Status,
}

impl View {
    /// All views, in display order.
    pub const ALL: [Self; 3] = [Self::Chat, Self::Command, Self::Status];

    /// Display name of the view.
    pub fn name(self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::Command => "Command",
            Self::Status => "Status",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for View {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|view| view.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::InvalidView(s.to_owned()))
    }
}

/// Append-only text log of one conversation channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Formatted lines, each terminated by `\n`.
    pub output: String,
    /// Display nickname for the channel. Empty if unknown.
    pub nickname: String,
}

impl Transcript {
    /// Create a transcript with pre-filled output.
    pub fn with_output(output: impl Into<String>) -> Self {
        Self { output: output.into(), nickname: String::new() }
    }

    /// Append a line followed by the line separator.
    pub fn append_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    /// Discard all output.
    pub fn clear(&mut self) {
        self.output.clear();
    }

    /// Lines of output, without separators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.output.lines()
    }

    /// Whether the transcript has no output.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }
}

/// Aggregate session state.
///
/// Deserialization checks the store invariants and rejects documents that
/// break them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSessionState")]
pub struct SessionState {
    focused_view: View,
    connected: Channel,
    peers: Vec<PeerId>,
    transcripts: BTreeMap<Channel, Transcript>,
    nickname: String,
    status_log: Transcript,
    command_log: Transcript,
}

/// Unchecked wire form of [`SessionState`].
#[derive(Deserialize)]
struct RawSessionState {
    focused_view: View,
    connected: Channel,
    peers: Vec<PeerId>,
    transcripts: BTreeMap<Channel, Transcript>,
    nickname: String,
    status_log: Transcript,
    command_log: Transcript,
}

impl TryFrom<RawSessionState> for SessionState {
    type Error = EngineError;

    fn try_from(raw: RawSessionState) -> Result<Self, Self::Error> {
        if !raw.transcripts.contains_key(&Channel::All) {
            return Err(EngineError::InvalidSession("no broadcast transcript".into()));
        }
        for (i, peer) in raw.peers.iter().enumerate() {
            if peer == BROADCAST_CHANNEL {
                return Err(EngineError::InvalidSession("peer aliases broadcast channel".into()));
            }
            if raw.peers[..i].contains(peer) {
                return Err(EngineError::InvalidSession(format!("duplicate peer {peer}")));
            }
            if !raw.transcripts.contains_key(&Channel::Peer(peer.clone())) {
                return Err(EngineError::InvalidSession(format!("no transcript for peer {peer}")));
            }
        }
        if let Channel::Peer(id) = &raw.connected {
            if !raw.peers.contains(id) {
                return Err(EngineError::InvalidSession(format!("connected to unknown peer {id}")));
            }
        }

        Ok(Self {
            focused_view: raw.focused_view,
            connected: raw.connected,
            peers: raw.peers,
            transcripts: raw.transcripts,
            nickname: raw.nickname,
            status_log: raw.status_log,
            command_log: raw.command_log,
        })
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl SessionState {
    /// Fresh session: chat view on the broadcast channel, no peers.
    pub fn new(config: &AppConfig) -> Self {
        let mut transcripts = BTreeMap::new();
        transcripts.insert(Channel::All, Transcript::default());
        Self {
            focused_view: View::Chat,
            connected: Channel::All,
            peers: Vec::new(),
            transcripts,
            nickname: config.nickname.clone(),
            status_log: Transcript::default(),
            command_log: Transcript::with_output(config.command_banner.clone()),
        }
    }

    /// Register a discovered peer.
    ///
    /// Idempotent: returns `false` and leaves the state untouched if the peer
    /// is already known. A transcript that already exists for the ID (created
    /// lazily by an earlier message) is kept. The ID `"All"` is refused
    /// because it aliases the broadcast channel.
    pub fn register_peer(&mut self, id: impl Into<PeerId>) -> bool {
        let id = id.into();
        if id == BROADCAST_CHANNEL {
            tracing::warn!(peer = %id, "Refusing peer ID that aliases the broadcast channel");
            return false;
        }
        if self.is_known(&id) {
            return false;
        }

        tracing::info!(peer = %id, "New peer discovered");
        self.transcripts.entry(Channel::Peer(id.clone())).or_default();
        self.peers.push(id);
        true
    }

    /// Whether the peer has been registered.
    pub fn is_known(&self, id: &str) -> bool {
        self.peers.iter().any(|peer| peer == id)
    }

    /// Mutable transcript for a channel.
    ///
    /// A missing transcript is an invariant violation; it is logged and an
    /// empty transcript is created in its place.
    pub fn transcript_mut(&mut self, channel: &Channel) -> &mut Transcript {
        if !self.transcripts.contains_key(channel) {
            let err = EngineError::MissingTranscript(channel.to_string());
            tracing::warn!(%err, "Recovering with an empty transcript");
        }
        self.transcripts.entry(channel.clone()).or_default()
    }

    /// Switch the connected channel, registering an unknown peer first.
    ///
    /// A peer that cannot be registered leaves the connection unchanged.
    pub fn set_connected(&mut self, channel: Channel) {
        if let Channel::Peer(id) = &channel {
            if !self.is_known(id) && !self.register_peer(id.clone()) {
                return;
            }
        }
        self.connected = channel;
    }

    /// Change the focused view.
    pub fn set_focused_view(&mut self, view: View) {
        self.focused_view = view;
    }

    /// Set the local user's display name.
    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    /// Append a raw line to the status log.
    pub fn append_status(&mut self, line: &str) {
        self.status_log.output.push_str(LOG_INDENT);
        self.status_log.append_line(line);
    }

    /// Append a line to the command log. `None` or empty text clears it.
    pub fn append_command(&mut self, text: Option<&str>) {
        match text {
            Some(text) if !text.is_empty() => {
                self.command_log.output.push_str(LOG_INDENT);
                self.command_log.append_line(text);
            },
            _ => self.command_log.clear(),
        }
    }

    /// View currently in focus.
    pub fn focused_view(&self) -> View {
        self.focused_view
    }

    /// Channel currently connected.
    pub fn connected(&self) -> &Channel {
        &self.connected
    }

    /// Registered peers, in discovery order.
    pub fn peers(&self) -> &[PeerId] {
        &self.peers
    }

    /// All transcripts keyed by channel.
    pub fn transcripts(&self) -> &BTreeMap<Channel, Transcript> {
        &self.transcripts
    }

    /// Transcript of a channel. `None` if absent.
    pub fn transcript(&self, channel: &Channel) -> Option<&Transcript> {
        self.transcripts.get(channel)
    }

    /// Output of the connected channel's transcript. Empty if absent.
    pub fn connected_output(&self) -> &str {
        self.transcript(&self.connected).map_or("", |t| t.output.as_str())
    }

    /// Local user's display name.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Network status log.
    pub fn status_log(&self) -> &Transcript {
        &self.status_log
    }

    /// Command terminal log.
    pub fn command_log(&self) -> &Transcript {
        &self.command_log
    }
}
