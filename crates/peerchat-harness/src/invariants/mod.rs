//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold during a session.
//! Unlike example-based tests that check specific scenarios, invariants
//! verify behavioral properties across all possible event sequences.
//!
//! # Architecture
//!
//! The invariant system extracts observable state from an App into a
//! [`SessionSnapshot`], then runs registered [`Invariant`] checks against it.
//! Violations trigger panics with detailed context for debugging.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SessionSnapshot::from_app(&app);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{AllChannelPresent, ConnectedPeerKnown, PeerTranscriptsPresent, PeersUnique};
pub use snapshot::SessionSnapshot;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Identifies which invariant was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// The `All` transcript exists.
    AllChannelPresent,
    /// The connected channel is `All` or a registered peer.
    ConnectedPeerKnown,
    /// Peers are registered at most once.
    PeersUnique,
    /// Every registered peer has a transcript.
    PeerTranscriptsPresent,
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AllChannelPresent => "all_channel_present",
            Self::ConnectedPeerKnown => "connected_peer_known",
            Self::PeersUnique => "peers_unique",
            Self::PeerTranscriptsPresent => "peer_transcripts_present",
        };
        f.write_str(name)
    }
}

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Which invariant was violated.
    pub invariant: InvariantKind,
    /// Description of what went wrong.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against session state.
///
/// Invariants are behavioral properties that must always hold.
/// They capture WHAT must be true, not specific test scenarios.
pub trait Invariant: Send + Sync {
    /// Invariant kind for error reporting.
    fn kind(&self) -> InvariantKind;

    /// Check the invariant against the current state.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &SessionSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
///
/// Collects multiple invariants and runs them all against session state.
/// Use [`InvariantRegistry::standard()`] for the session store invariants.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the session store invariants.
    ///
    /// Includes:
    /// - [`AllChannelPresent`]: the `All` transcript exists
    /// - [`ConnectedPeerKnown`]: connected channel is `All` or a known peer
    /// - [`PeersUnique`]: no duplicate peers
    /// - [`PeerTranscriptsPresent`]: every peer has a transcript
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(AllChannelPresent);
        registry.add(ConnectedPeerKnown);
        registry.add(PeersUnique);
        registry.add(PeerTranscriptsPresent);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given state.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &SessionSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking on first violation.
    ///
    /// Use this in tests where you want immediate failure with context.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &SessionSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_invariants() {
        let registry = InvariantRegistry::standard();
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn empty_snapshot_passes_invariants() {
        let registry = InvariantRegistry::standard();
        let snapshot = SessionSnapshot::empty();
        assert!(registry.check_all(&snapshot).is_ok());
    }

    #[test]
    fn all_violations_are_reported() {
        let registry = InvariantRegistry::standard();
        let snapshot =
            SessionSnapshot::bare().with_peer("Qm1").with_peer("Qm1").with_connected("Qm2");

        let violations = registry.check_all(&snapshot).err().unwrap_or_default();
        let kinds: Vec<_> = violations.iter().map(|v| v.invariant).collect();

        assert_eq!(kinds, vec![
            InvariantKind::AllChannelPresent,
            InvariantKind::ConnectedPeerKnown,
            InvariantKind::PeersUnique,
            InvariantKind::PeerTranscriptsPresent,
        ]);
    }
}
