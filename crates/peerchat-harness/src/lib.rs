//! Deterministic simulation harness for peerchat engine testing.
//!
//! Simulated implementations of the [`peerchat_app::Driver`] and
//! [`peerchat_app::NetworkControl`] traits, so the production
//! [`peerchat_app::Runtime`] can be exercised without a terminal or a real
//! peer-to-peer network.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the session
//! store invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_network;

pub use invariants::{
    AllChannelPresent, ConnectedPeerKnown, Invariant, InvariantKind, InvariantRegistry,
    InvariantResult, PeerTranscriptsPresent, PeersUnique, SessionSnapshot, Violation,
};
pub use sim_driver::{SimDriver, SimDriverError};
pub use sim_network::{SentMessage, SimError, SimNetwork};
