//! Property-based tests for App state machine.
//!
//! Tests verify that routing rules and store invariants hold under arbitrary
//! event sequences.

use peerchat_app::{App, AppEvent, Channel, InboundChat, SessionState, View};
use proptest::prelude::*;

/// Small peer ID space so sequences revisit the same peers.
fn peer_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("QmA".to_owned()),
        Just("QmB".to_owned()),
        Just("QmC".to_owned()),
        "[a-z]{0,4}",
    ]
}

fn view_strategy() -> impl Strategy<Value = View> {
    prop_oneof![Just(View::Chat), Just(View::Command), Just(View::Status)]
}

fn channel_strategy() -> impl Strategy<Value = Channel> {
    prop_oneof![1 => Just(Channel::All), 3 => peer_strategy().prop_map(Channel::from)]
}

/// Generate random app events.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        2 => peer_strategy().prop_map(|id| AppEvent::Status(format!("New peer found: {id}"))),
        1 => ".{0,20}".prop_map(AppEvent::Status),
        2 => (prop_oneof![Just("chat"), Just("pm"), Just("")], "[a-z]{1,5}", ".{0,10}")
            .prop_map(|(tag, handle, msg)| AppEvent::Chat(InboundChat::new(tag, handle, msg))),
        1 => (peer_strategy(), ".{0,10}")
            .prop_map(|(from, text)| AppEvent::PrivateMessage { from, text }),
        1 => peer_strategy().prop_map(AppEvent::PeerDiscovered),
        2 => (".{0,10}", "[a-z]{1,5}")
            .prop_map(|(message, nickname)| AppEvent::SendMessage { message, nickname }),
        2 => (view_strategy(), proptest::option::of(channel_strategy()))
            .prop_map(|(view, peer)| AppEvent::SwitchView { view, peer }),
        1 => proptest::option::of(".{0,10}").prop_map(AppEvent::CommandLog),
    ]
}

/// Assert the store invariants.
fn check_invariants(state: &SessionState) -> Result<(), TestCaseError> {
    prop_assert!(state.transcript(&Channel::All).is_some(), "missing All transcript");

    if let Channel::Peer(id) = state.connected() {
        prop_assert!(state.is_known(id), "connected peer {id:?} not registered");
    }

    let mut seen = std::collections::HashSet::new();
    for id in state.peers() {
        prop_assert!(seen.insert(id), "duplicate peer {id:?}");
        prop_assert!(
            state.transcript(&Channel::Peer(id.clone())).is_some(),
            "peer {id:?} has no transcript"
        );
    }
    Ok(())
}

/// Transcript outputs keyed by channel, for before/after comparison.
fn outputs(state: &SessionState) -> Vec<(Channel, String)> {
    state.transcripts().iter().map(|(k, v)| (k.clone(), v.output.clone())).collect()
}

proptest! {
    #[test]
    fn prop_invariants_hold(events in prop::collection::vec(event_strategy(), 0..60)) {
        let mut app = App::default();

        for event in events {
            let _ = app.handle(event);
            check_invariants(app.state())?;
        }
    }

    #[test]
    fn prop_register_is_idempotent(ids in prop::collection::vec(peer_strategy(), 1..20)) {
        let mut app = App::default();

        for id in &ids {
            let _ = app.register_peer(id.clone());
        }
        let once = app.clone();
        for id in &ids {
            let _ = app.register_peer(id.clone());
        }

        prop_assert_eq!(app, once);
    }

    #[test]
    fn prop_broadcast_only_touches_all(
        setup in prop::collection::vec(event_strategy(), 0..30),
        prefix in "[a-z-]{0,4}",
        suffix in "[a-z-]{0,4}",
        msg in ".{0,10}",
    ) {
        let mut app = App::default();
        for event in setup {
            let _ = app.handle(event);
        }
        let before = outputs(app.state());

        let tag = format!("{prefix}chat{suffix}");
        let _ = app.handle(AppEvent::Chat(InboundChat::new(tag, "h", msg.clone())));

        for (channel, output) in before {
            let after =
                app.state().transcript(&channel).map(|t| t.output.clone()).unwrap_or_default();
            if channel == Channel::All {
                prop_assert_eq!(after, format!("{output}h: {msg}\n"));
            } else {
                prop_assert_eq!(after, output);
            }
        }
    }

    #[test]
    fn prop_direct_only_touches_connected(
        setup in prop::collection::vec(event_strategy(), 0..30),
        tag in "[a-bd-z]{0,6}",
        msg in ".{0,10}",
    ) {
        let mut app = App::default();
        for event in setup {
            let _ = app.handle(event);
        }
        let before = outputs(app.state());
        let connected = app.state().connected().clone();

        let _ = app.handle(AppEvent::Chat(InboundChat::new(tag, "h", msg.clone())));

        for (channel, output) in before {
            let after =
                app.state().transcript(&channel).map(|t| t.output.clone()).unwrap_or_default();
            if channel == connected {
                prop_assert_eq!(after, format!("{output}h: {msg}\n"));
            } else {
                prop_assert_eq!(after, output);
            }
        }
    }

    #[test]
    fn prop_view_switch_keeps_connection(
        setup in prop::collection::vec(event_strategy(), 0..30),
        view in view_strategy(),
    ) {
        let mut app = App::default();
        for event in setup {
            let _ = app.handle(event);
        }
        let connected = app.state().connected().clone();

        let _ = app.switch_view(view, None);

        prop_assert_eq!(app.state().connected(), &connected);
        prop_assert_eq!(app.state().focused_view(), view);
    }
}
