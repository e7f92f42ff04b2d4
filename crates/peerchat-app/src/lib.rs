//! Application layer for peerchat
//!
//! Session and message-routing engine for a peer-to-peer chat client, written
//! as a pure state machine plus a generic runtime so that the same code runs
//! under a real network layer and in deterministic simulation.
//!
//! # Components
//!
//! - [`SessionState`]: session store (peers, transcripts, focus, logs)
//! - [`App`]: state machine routing events into the store
//! - [`router`], [`status`], [`focus`]: routing, discovery and focus rules
//! - [`lifecycle`]: session capture and restore across activations
//! - [`Bridge`]: translates App actions into network-layer calls
//! - [`Driver`], [`NetworkControl`]: traits for host-specific I/O
//! - [`Runtime`]: generic orchestration loop

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod config;
mod driver;
mod error;
mod event;
pub mod focus;
pub mod lifecycle;
mod names;
pub mod router;
mod runtime;
mod state;
pub mod status;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use config::{AppConfig, DEFAULT_COMMAND_BANNER, DEFAULT_NICKNAME};
pub use driver::{Driver, NetworkControl};
pub use error::EngineError;
pub use event::{AppEvent, ChatPayload, InboundChat};
pub use lifecycle::{Restored, Snapshot};
pub use names::{PeerDirectory, PeerRecord, resolve_display_name};
pub use router::Delivery;
pub use runtime::{ActivationError, Runtime};
pub use state::{BROADCAST_CHANNEL, Channel, PeerId, SessionState, Transcript, View};
