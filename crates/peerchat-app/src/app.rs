//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the chat
//! session completely decoupled from I/O and the network layer.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//! Handlers never fail: malformed input is logged and dropped, and the
//! session keeps whatever state was already valid.
//!
//! # Responsibilities
//!
//! - Routes status lines, chat and private messages into transcripts.
//! - Registers discovered peers.
//! - Tracks terminal focus (view and connected channel).
//! - Turns the user's own messages into network sends.

use crate::{
    AppAction, AppConfig, AppEvent, Channel, EngineError, PeerDirectory, PeerId, SessionState, View,
    focus, names, router, status,
};

/// Application state machine.
///
/// Owns the [`SessionState`]; all mutation happens through [`App::handle`]
/// and the user-action methods, one event at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    state: SessionState,
}

impl Default for App {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl App {
    /// Create an App with a fresh session.
    pub fn new(config: &AppConfig) -> Self {
        Self { state: SessionState::new(config) }
    }

    /// Create an App around a restored session.
    pub fn from_state(state: SessionState) -> Self {
        Self { state }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Status(line) => self.process_status(&line),
            AppEvent::Chat(chat) => {
                router::route_incoming(&mut self.state, &chat);
                vec![AppAction::Render]
            },
            AppEvent::PrivateMessage { from, text } => {
                router::route_private(&mut self.state, &from, &text);
                vec![AppAction::Render]
            },
            AppEvent::PeerDiscovered(id) => self.register_peer(id),
            AppEvent::SendMessage { message, nickname } => self.send_message(&message, &nickname),
            AppEvent::SwitchView { view, peer } => self.switch_view(view, peer),
            AppEvent::CommandLog(text) => self.command_log(text.as_deref()),
            AppEvent::NetworkStarted => {
                tracing::info!("Network layer started");
                vec![]
            },
            AppEvent::NetworkError { message } => {
                self.state.append_status(&format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Ask the runtime to start the network layer.
    pub fn start(&self) -> Vec<AppAction> {
        vec![AppAction::StartNetwork]
    }

    /// Append a status line, registering any peer it announces.
    pub fn process_status(&mut self, line: &str) -> Vec<AppAction> {
        let _ = status::process_status(&mut self.state, line);
        vec![AppAction::Render]
    }

    /// Validate a raw JSON chat event and route it.
    ///
    /// Malformed events are logged and dropped.
    pub fn process_chat_json(&mut self, raw: &str) -> Vec<AppAction> {
        match crate::InboundChat::from_json(raw) {
            Ok(chat) => self.handle(AppEvent::Chat(chat)),
            Err(err) => {
                tracing::warn!(%err, "Dropping malformed chat event");
                vec![]
            },
        }
    }

    /// Register a peer. Renders only if the peer was new.
    pub fn register_peer(&mut self, id: impl Into<PeerId>) -> Vec<AppAction> {
        if self.state.register_peer(id) { vec![AppAction::Render] } else { vec![] }
    }

    /// Send a message on the connected channel under `nickname`.
    pub fn send_message(&mut self, message: &str, nickname: &str) -> Vec<AppAction> {
        let send = router::route_outgoing(&mut self.state, message, nickname);
        vec![send, AppAction::Render]
    }

    /// Focus a view, optionally connecting a channel.
    pub fn switch_view(&mut self, view: View, peer: Option<Channel>) -> Vec<AppAction> {
        focus::switch_view(&mut self.state, view, peer);
        vec![AppAction::Render]
    }

    /// Focus a view given by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidView`] if the name is not a known view.
    pub fn switch_view_named(
        &mut self,
        view: &str,
        peer: Option<Channel>,
    ) -> Result<Vec<AppAction>, EngineError> {
        focus::switch_view_named(&mut self.state, view, peer)?;
        Ok(vec![AppAction::Render])
    }

    /// Append command output. `None` or empty text clears the command log.
    pub fn command_log(&mut self, text: Option<&str>) -> Vec<AppAction> {
        self.state.append_command(text);
        vec![AppAction::Render]
    }

    /// Display name for a peer, falling back to its ID.
    pub fn display_name<D: PeerDirectory + ?Sized>(&self, directory: &D, id: &str) -> String {
        names::resolve_display_name(directory, id)
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Release the session state for capture.
    pub fn into_state(self) -> SessionState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InboundChat;

    fn output<'a>(app: &'a App, channel: &str) -> &'a str {
        app.state().transcript(&Channel::from(channel)).map_or("", |t| t.output.as_str())
    }

    #[test]
    fn broadcast_and_back_scenario() {
        let mut app = App::default();

        let _ = app.send_message("hi", "Bob");
        let _ = app.send_message("bye", "Bob");

        assert_eq!(output(&app, "All"), "me: hi\nme: bye\n");
        assert_eq!(app.state().nickname(), "Bob");
    }

    #[test]
    fn direct_peer_scenario() {
        let mut app = App::default();

        let _ = app.register_peer("Qm1");
        let _ = app.switch_view(View::Chat, Some(Channel::from("Qm1")));
        let actions = app.send_message("yo", "Bob");

        assert_eq!(output(&app, "Qm1"), "me: yo\n");
        assert_eq!(output(&app, "All"), "");
        assert!(matches!(actions.as_slice(), [
            AppAction::SendDirect { peer, .. },
            AppAction::Render
        ] if peer == "Qm1"));
    }

    #[test]
    fn status_event_discovers_peer() {
        let mut app = App::default();

        let actions = app.handle(AppEvent::Status("New peer found: Qm123".into()));

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.state().peers(), ["Qm123"]);
    }

    #[test]
    fn duplicate_discovery_does_not_render() {
        let mut app = App::default();

        assert_eq!(app.handle(AppEvent::PeerDiscovered("Qm1".into())), vec![AppAction::Render]);
        assert!(app.handle(AppEvent::PeerDiscovered("Qm1".into())).is_empty());
    }

    #[test]
    fn malformed_chat_json_is_dropped() {
        let mut app = App::default();
        let before = app.clone();

        assert!(app.process_chat_json("{\"apiName\":\"chat\"}").is_empty());
        assert_eq!(app, before);
    }

    #[test]
    fn chat_json_is_routed() {
        let mut app = App::default();

        let actions =
            app.process_chat_json(r#"{"apiName":"chat","data":{"message":"gm","handle":"carol"}}"#);

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(output(&app, "All"), "carol: gm\n");
    }

    #[test]
    fn network_error_lands_in_status_log() {
        let mut app = App::default();

        let _ = app.handle(AppEvent::NetworkError { message: "relay unreachable".into() });

        assert_eq!(app.state().status_log().output, "   Error: relay unreachable\n");
    }

    #[test]
    fn switch_view_event_keeps_peer() {
        let mut app = App::default();
        let _ = app
            .handle(AppEvent::SwitchView { view: View::Chat, peer: Some(Channel::from("peerX")) });

        let _ = app.handle(AppEvent::SwitchView { view: View::Status, peer: None });

        assert_eq!(app.state().connected(), &Channel::from("peerX"));
        assert_eq!(app.state().focused_view(), View::Status);
    }

    #[test]
    fn switch_view_named_rejects_unknown() {
        let mut app = App::default();

        assert!(matches!(app.switch_view_named("Graph", None), Err(EngineError::InvalidView(_))));
        assert!(app.switch_view_named("command", None).is_ok());
        assert_eq!(app.state().focused_view(), View::Command);
    }

    #[test]
    fn direct_chat_follows_focus() {
        let mut app = App::default();
        let _ = app.switch_view(View::Chat, Some(Channel::from("QmA")));

        let _ = app.handle(AppEvent::Chat(InboundChat::new("pm", "bob", "hey")));

        assert_eq!(output(&app, "QmA"), "bob: hey\n");
    }

    #[test]
    fn start_requests_network() {
        assert_eq!(App::default().start(), vec![AppAction::StartNetwork]);
    }
}
