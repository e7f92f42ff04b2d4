//! Fuzz target for session event sequences
//!
//! # Strategy
//!
//! - Peer IDs from a small pool, including the broadcast name and empty IDs
//! - Interleaved discovery, chat, private messages, sends and view switches
//!
//! # Invariants
//!
//! - The `All` transcript always exists
//! - The connected channel is `All` or a registered peer
//! - Peers are registered at most once, each with a transcript
//! - Switching to a view without a peer never changes the connection

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use peerchat_app::{App, AppEvent, Channel, InboundChat, View};
use peerchat_harness::{InvariantRegistry, SessionSnapshot};

const PEERS: [&str; 5] = ["QmA", "QmB", "QmC", "All", ""];

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Discover { peer: u8 },
    StatusLine { text: String },
    Chat { broadcast: bool, handle: String, message: String },
    Private { peer: u8, text: String },
    Send { message: String },
    Switch { view: u8, peer: Option<u8> },
    Command { text: Option<String> },
}

fn peer(index: u8) -> String {
    PEERS[usize::from(index) % PEERS.len()].to_owned()
}

fn view(index: u8) -> View {
    View::ALL[usize::from(index) % View::ALL.len()]
}

fuzz_target!(|ops: Vec<Op>| {
    let invariants = InvariantRegistry::standard();
    let mut app = App::default();

    for op in ops {
        let event = match op {
            Op::Discover { peer: index } => {
                AppEvent::Status(format!("New peer found: {}", peer(index)))
            },
            Op::StatusLine { text } => AppEvent::Status(text),
            Op::Chat { broadcast, handle, message } => {
                let tag = if broadcast { "chat" } else { "pm" };
                AppEvent::Chat(InboundChat::new(tag, handle, message))
            },
            Op::Private { peer: index, text } => {
                AppEvent::PrivateMessage { from: peer(index), text }
            },
            Op::Send { message } => AppEvent::SendMessage { message, nickname: "fuzz".to_owned() },
            Op::Switch { view: index, peer: target } => {
                let channel = target.map(|p| Channel::from(peer(p)));
                AppEvent::SwitchView { view: view(index), peer: channel }
            },
            Op::Command { text } => AppEvent::CommandLog(text),
        };

        let connected = app.state().connected().clone();
        let keeps_connection = matches!(event, AppEvent::SwitchView { peer: None, .. });

        let _ = app.handle(event);

        if keeps_connection {
            assert_eq!(app.state().connected(), &connected);
        }
        invariants.assert_all(&SessionSnapshot::from_app(&app), "after event");
    }
});
