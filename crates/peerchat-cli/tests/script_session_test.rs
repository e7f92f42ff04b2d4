//! End-to-end tests for scripted sessions.
//!
//! Scripts run through the production runtime with the loopback network, the
//! same path the `peerchat` binary takes.

use peerchat_app::{AppConfig, Channel, SessionState, View};
use peerchat_cli::{LoopbackNetwork, render_session, run_script};

fn output<'a>(state: &'a SessionState, channel: &str) -> &'a str {
    state.transcript(&Channel::from(channel)).map_or("", |t| t.output.as_str())
}

#[tokio::test]
async fn discovery_and_private_conversation() {
    let script = r#"
{"kind":"status","line":"Connecting to swarm"}
{"kind":"status","line":"New peer found: QmAlice"}
{"kind":"chat","event":{"apiName":"chat","data":{"message":"gm all","handle":"alice"}}}
{"kind":"switch","view":"chat","peer":"QmAlice"}
{"kind":"send","message":"hey alice","nickname":"bob"}
{"kind":"private","from":"QmAlice","text":"hey bob"}
"#;

    let outcome = run_script(script, &AppConfig::default(), LoopbackNetwork::new()).await;
    let state = &outcome.state;

    assert_eq!(state.peers(), ["QmAlice"]);
    assert_eq!(state.connected(), &Channel::from("QmAlice"));
    assert_eq!(output(state, "All"), "alice: gm all\n");
    assert_eq!(output(state, "QmAlice"), "me: hey alice\npeer: hey bob\n");
    assert_eq!(state.status_log().output, "   Connecting to swarm\n   New peer found: QmAlice\n");
    assert_eq!(state.nickname(), "bob");
    assert!(outcome.network_started);
    assert_eq!(outcome.sent, 1);
}

#[tokio::test]
async fn remount_keeps_session_and_network() {
    let script = r#"
{"kind":"status","line":"New peer found: Qm1"}
{"kind":"send","message":"before","nickname":"bob"}
{"kind":"switch","view":"status"}
{"kind":"remount"}
{"kind":"send","message":"after","nickname":"bob"}
{"kind":"remount"}
"#;

    let outcome = run_script(script, &AppConfig::default(), LoopbackNetwork::new()).await;

    assert_eq!(outcome.remounts, 2);
    assert_eq!(outcome.sent, 2);
    assert_eq!(outcome.state.focused_view(), View::Status);
    assert_eq!(outcome.state.peers(), ["Qm1"]);
    assert_eq!(output(&outcome.state, "All"), "me: before\nme: after\n");
}

#[tokio::test]
async fn malformed_lines_do_not_end_session() {
    let script = r#"
{"kind":"status","line":"New peer found: Qm1"}
garbage
{"kind":"switch","view":"Graph","peer":"Qm1"}
{"kind":"chat","event":{"data":{"message":"no origin","handle":"eve"}}}
{"kind":"chat","event":{"apiName":"chat"}}
{"kind":"status","line":"New peer found: Qm2"}
"#;

    let outcome = run_script(script, &AppConfig::default(), LoopbackNetwork::new()).await;

    assert_eq!(outcome.state.peers(), ["Qm1", "Qm2"]);
    assert_eq!(outcome.state.connected(), &Channel::All);
    // A chat event without a tag is direct, so it lands on the connected channel
    assert_eq!(output(&outcome.state, "All"), "eve: no origin\n");
}

#[tokio::test]
async fn command_log_uses_configured_banner() {
    let script = r#"
{"kind":"command","text":"help"}
{"kind":"command","text":"peers"}
"#;
    let config = AppConfig { nickname: "alice".into(), command_banner: "Welcome".into() };

    let outcome = run_script(script, &config, LoopbackNetwork::new()).await;

    assert_eq!(outcome.state.command_log().output, "Welcome   help\n   peers\n");
    assert_eq!(outcome.state.nickname(), "alice");

    let clear = r#"{"kind":"command","text":""}"#;
    let cleared = run_script(clear, &config, LoopbackNetwork::new()).await;
    assert!(cleared.state.command_log().is_empty());
}

#[tokio::test]
async fn session_dump_round_trips() {
    let script = r#"{"kind":"status","line":"New peer found: Qm1"}
{"kind":"private","from":"Qm1","text":"hi"}"#;

    let outcome = run_script(script, &AppConfig::default(), LoopbackNetwork::new()).await;
    let json = match render_session(&outcome.state, true) {
        Ok(json) => json,
        Err(e) => panic!("render failed: {e}"),
    };
    let parsed: SessionState = match serde_json::from_str(&json) {
        Ok(state) => state,
        Err(e) => panic!("parse failed: {e}"),
    };

    assert_eq!(parsed, outcome.state);
}

#[tokio::test]
async fn empty_script_yields_fresh_session() {
    let outcome = run_script("", &AppConfig::default(), LoopbackNetwork::new()).await;

    assert_eq!(outcome.state, SessionState::default());
    assert!(outcome.network_started);
    assert_eq!(outcome.remounts, 0);
}

#[tokio::test]
async fn display_names_come_from_network_directory() {
    let script = r#"{"kind":"status","line":"New peer found: Qm1"}
{"kind":"status","line":"New peer found: Qm2"}"#;
    let network = LoopbackNetwork::new().with_name("Qm1", "alice");

    let outcome = run_script(script, &AppConfig::default(), network).await;

    assert_eq!(outcome.display_names, vec![
        ("Qm1".to_owned(), "alice".to_owned()),
        ("Qm2".to_owned(), "Qm2".to_owned()),
    ]);
}
