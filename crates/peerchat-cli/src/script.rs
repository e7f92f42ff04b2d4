//! JSON-lines session scripts.
//!
//! Each non-blank line of a script is one [`ScriptLine`]. Lines that fail to
//! parse, or that name an unknown view, are logged and skipped so one bad line
//! never ends the session.

use std::{collections::VecDeque, convert::Infallible};

use peerchat_app::{App, AppEvent, Channel, Driver, EngineError, InboundChat, View};
use serde::Deserialize;

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScriptLine {
    /// A line from the network layer's status feed.
    Status {
        /// Raw status text.
        line: String,
    },
    /// A chat event from the network layer, validated when replayed.
    Chat {
        /// Raw event object.
        event: serde_json::Value,
    },
    /// A private message.
    Private {
        /// Sending peer.
        from: String,
        /// Message text.
        text: String,
    },
    /// The user sends a message on the connected channel.
    Send {
        /// Message text.
        message: String,
        /// Nickname to send under.
        nickname: String,
    },
    /// The user focuses a view.
    Switch {
        /// View name, matched case-insensitively.
        view: String,
        /// Channel to connect.
        #[serde(default)]
        peer: Option<String>,
    },
    /// Output from the command interpreter.
    Command {
        /// Text to append. Absent or empty clears the log.
        #[serde(default)]
        text: Option<String>,
    },
    /// Deactivate the runtime and activate it again from the captured session.
    Remount,
}

/// What the host does with a script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Feed an event to the runtime.
    Event(AppEvent),
    /// Deactivate and re-activate the runtime.
    Remount,
}

impl ScriptLine {
    /// Parse one script line.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Parse`] if the line is not a valid script step.
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Convert into a host step.
    ///
    /// # Errors
    ///
    /// Returns an error if the chat event is malformed or the view is unknown.
    pub fn into_step(self) -> Result<Step, EngineError> {
        let event = match self {
            Self::Status { line } => AppEvent::Status(line),
            Self::Chat { event } => AppEvent::Chat(InboundChat::from_value(event)?),
            Self::Private { from, text } => AppEvent::PrivateMessage { from, text },
            Self::Send { message, nickname } => AppEvent::SendMessage { message, nickname },
            Self::Switch { view, peer } => {
                AppEvent::SwitchView { view: view.parse::<View>()?, peer: peer.map(Channel::from) }
            },
            Self::Command { text } => AppEvent::CommandLog(text),
            Self::Remount => return Ok(Step::Remount),
        };
        Ok(Step::Event(event))
    }
}

/// Parse a script, dropping blank and malformed lines.
pub fn parse_script(input: &str) -> VecDeque<Step> {
    input
        .lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .filter_map(|(index, raw)| match ScriptLine::parse(raw).and_then(ScriptLine::into_step) {
            Ok(step) => Some(step),
            Err(err) => {
                tracing::warn!(line = index + 1, %err, "Skipping malformed script line");
                None
            },
        })
        .collect()
}

/// Driver that replays a parsed script.
///
/// Stops delivering events at the end of the script and at every remount
/// step; [`ScriptDriver::take_remount`] tells the two apart.
#[derive(Debug, Default)]
pub struct ScriptDriver {
    steps: VecDeque<Step>,
    remount: bool,
    renders: usize,
}

impl ScriptDriver {
    /// Create a driver over `steps`.
    pub fn new(steps: VecDeque<Step>) -> Self {
        Self { steps, remount: false, renders: 0 }
    }

    /// Whether the last stop was a remount request. Clears the request.
    pub fn take_remount(&mut self) -> bool {
        std::mem::take(&mut self.remount)
    }

    /// Hand the unplayed steps to the next driver.
    pub fn take_steps(&mut self) -> VecDeque<Step> {
        std::mem::take(&mut self.steps)
    }

    /// Number of renders so far.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl Driver for ScriptDriver {
    type Error = Infallible;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Infallible> {
        match self.steps.pop_front() {
            Some(Step::Event(event)) => Ok(Some(event)),
            Some(Step::Remount) => {
                self.remount = true;
                Ok(None)
            },
            None => Ok(None),
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Infallible> {
        self.renders += 1;
        let state = app.state();
        tracing::debug!(
            view = %state.focused_view(),
            connected = %state.connected(),
            peers = state.peers().len(),
            "Render"
        );
        Ok(())
    }

    fn stop(&mut self) {
        tracing::debug!(renders = self.renders, "Script driver stopped");
    }
}
