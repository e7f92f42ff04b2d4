//! Fuzz target for network-facing input
//!
//! Status lines and chat events arrive straight from the network layer.
//!
//! # Strategy
//!
//! - Raw bytes as a status line (discovery marker or not)
//! - Raw bytes as a chat event JSON document
//!
//! # Invariants
//!
//! - NEVER panic on malformed input
//! - Malformed chat events leave the session untouched
//! - Session store invariants hold after every input

#![no_main]

use libfuzzer_sys::fuzz_target;
use peerchat_app::App;
use peerchat_harness::{InvariantRegistry, SessionSnapshot};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let invariants = InvariantRegistry::standard();
    let mut app = App::default();

    let _ = app.process_status(text);
    let _ = app.process_status(&format!("New peer found: {text}"));
    invariants.assert_all(&SessionSnapshot::from_app(&app), "after status line");

    let before = app.clone();
    if app.process_chat_json(text).is_empty() {
        assert_eq!(app, before, "malformed chat event changed the session");
    }
    invariants.assert_all(&SessionSnapshot::from_app(&app), "after chat event");
});
