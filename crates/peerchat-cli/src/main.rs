//! Peerchat scripted session binary.
//!
//! # Usage
//!
//! ```bash
//! # Replay a script file and dump the final session
//! peerchat --script session.jsonl --pretty
//!
//! # Read the script from stdin, naming a known peer
//! cat session.jsonl | peerchat --nickname alice --peer-name QmBob=bob
//! ```

use std::io::{self, Read, Write};

use clap::Parser;
use peerchat_app::{AppConfig, DEFAULT_COMMAND_BANNER, DEFAULT_NICKNAME, PeerId};
use peerchat_cli::{CliError, LoopbackNetwork, parse_peer_name, render_session, run_script};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Peerchat session replay
#[derive(Parser, Debug)]
#[command(name = "peerchat")]
#[command(about = "Replay a peer-to-peer chat session script through the session engine")]
#[command(version)]
struct Args {
    /// Path to a JSON-lines script (reads stdin if omitted)
    #[arg(short, long)]
    script: Option<String>,

    /// Initial nickname
    #[arg(short, long, default_value = DEFAULT_NICKNAME)]
    nickname: String,

    /// Banner shown at the top of the command view
    #[arg(long, default_value = DEFAULT_COMMAND_BANNER)]
    banner: String,

    /// Display name served for a peer, as ID=NAME (repeatable)
    #[arg(long = "peer-name", value_parser = parse_peer_name)]
    peer_names: Vec<(PeerId, String)>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Pretty-print the session dump
    #[arg(long)]
    pretty: bool,
}

fn read_script(path: Option<&str>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let input = read_script(args.script.as_deref())?;
    let config = AppConfig { nickname: args.nickname, command_banner: args.banner };

    tracing::info!(nickname = %config.nickname, "Peerchat session starting");

    let network = args
        .peer_names
        .into_iter()
        .fold(LoopbackNetwork::new(), |network, (id, name)| network.with_name(id, name));

    let outcome = run_script(&input, &config, network).await;

    for (peer, name) in &outcome.display_names {
        tracing::info!(%peer, %name, "Known peer");
    }

    tracing::info!(
        peers = outcome.state.peers().len(),
        remounts = outcome.remounts,
        sent = outcome.sent,
        "Script finished"
    );

    let json = render_session(&outcome.state, args.pretty)?;
    writeln!(io::stdout().lock(), "{json}")?;

    Ok(())
}
