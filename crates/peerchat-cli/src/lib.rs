//! Scripted host for the peerchat engine.
//!
//! Replays a JSON-lines script against the production [`Runtime`] with a
//! loopback network layer, remounting the runtime wherever the script asks,
//! and hands back the final session.
//!
//! # Components
//!
//! - [`ScriptLine`]: one step of a session script
//! - [`ScriptDriver`]: driver replaying parsed steps
//! - [`LoopbackNetwork`]: network layer that never leaves the process

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod network;
mod script;

pub use error::CliError;
pub use network::LoopbackNetwork;
use peerchat_app::{AppConfig, PeerId, Runtime, SessionState, Snapshot};
pub use script::{ScriptDriver, ScriptLine, Step, parse_script};

/// Outcome of a scripted session.
#[derive(Debug)]
pub struct ScriptOutcome {
    /// Session at the end of the script.
    pub state: SessionState,
    /// Display name of every registered peer, in discovery order.
    pub display_names: Vec<(PeerId, String)>,
    /// Number of remounts performed.
    pub remounts: usize,
    /// Whether start was issued on the network layer.
    pub network_started: bool,
    /// Messages handed to the network layer.
    pub sent: usize,
}

/// Run a script to completion on `network`.
pub async fn run_script(
    input: &str,
    config: &AppConfig,
    network: LoopbackNetwork,
) -> ScriptOutcome {
    let driver = ScriptDriver::new(parse_script(input));
    let mut runtime = activate(driver, None, config, || network).await;
    let mut remounts = 0;

    loop {
        let Ok(()) = runtime.run().await;
        if !runtime.driver_mut().take_remount() {
            break;
        }

        remounts += 1;
        let steps = runtime.driver_mut().take_steps();
        let snapshot = runtime.deactivate();
        tracing::info!(remounts, remaining = steps.len(), "Remounting session");
        runtime =
            activate(ScriptDriver::new(steps), Some(snapshot), config, LoopbackNetwork::new).await;
    }

    let app = runtime.app();
    let display_names = app
        .state()
        .peers()
        .iter()
        .map(|id| (id.clone(), app.display_name(runtime.control(), id)))
        .collect();

    let outcome = ScriptOutcome {
        state: app.state().clone(),
        display_names,
        remounts,
        network_started: runtime.is_started(),
        sent: runtime.control().sent(),
    };
    let _ = runtime.deactivate();
    outcome
}

async fn activate<F>(
    driver: ScriptDriver,
    snapshot: Option<Snapshot<LoopbackNetwork>>,
    config: &AppConfig,
    make_network: F,
) -> Runtime<ScriptDriver, LoopbackNetwork>
where
    F: FnOnce() -> LoopbackNetwork,
{
    match Runtime::activate(driver, snapshot, config, make_network).await {
        Ok(runtime) => runtime,
        Err(err) => match err.error {},
    }
}

/// Parse an `ID=NAME` peer name argument.
///
/// # Errors
///
/// Returns [`CliError::PeerName`] if there is no `=` or the ID is empty.
pub fn parse_peer_name(arg: &str) -> Result<(PeerId, String), CliError> {
    match arg.split_once('=') {
        Some((id, name)) if !id.is_empty() => Ok((id.to_owned(), name.to_owned())),
        _ => Err(CliError::PeerName(arg.to_owned())),
    }
}

/// Serialize a session for output.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_session(state: &SessionState, pretty: bool) -> Result<String, CliError> {
    let json =
        if pretty { serde_json::to_string_pretty(state)? } else { serde_json::to_string(state)? };
    Ok(json)
}
