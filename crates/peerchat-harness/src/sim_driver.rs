//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` stands in for the presentation layer and the event source in
//! deterministic tests. It implements [`Driver`] so the same
//! [`peerchat_app::Runtime`] orchestration code runs in both production and
//! simulation.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use peerchat_app::{App, AppEvent, Driver};
use thiserror::Error;

use crate::invariants::{InvariantRegistry, SessionSnapshot};

/// Error type for simulation driver.
#[derive(Debug, Clone, Error)]
#[error("SimDriverError: {0}")]
pub struct SimDriverError(pub String);

/// Shared state for event injection.
///
/// This allows injection from outside async contexts, and from a clone that
/// stays with the test while the driver moves into a runtime.
#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<AppEvent>,
    renders: usize,
    last_render: Option<SessionSnapshot>,
    stopped: bool,
    fail_render: bool,
}

/// Simulation driver for deterministic testing.
///
/// Clones share the same queue and render record.
#[derive(Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<Arc<InvariantRegistry>>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(SharedState::default())), invariants: None }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    /// Make every render fail.
    pub fn fail_renders(&self) {
        self.lock().fail_render = true;
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.lock().pending_events.push_back(event);
    }

    /// Inject several events in order.
    pub fn inject_events(&self, events: impl IntoIterator<Item = AppEvent>) {
        self.lock().pending_events.extend(events);
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        !self.lock().pending_events.is_empty()
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.lock().renders
    }

    /// Snapshot taken at the most recent render.
    pub fn last_render(&self) -> Option<SessionSnapshot> {
        self.lock().last_render.clone()
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Check invariants against App state.
    pub fn check_invariants(&self, app: &App, context: &str) {
        if let Some(registry) = &self.invariants {
            registry.assert_all(&SessionSnapshot::from_app(app), context);
        }
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        Ok(self.lock().pending_events.pop_front())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.check_invariants(app, "after render");

        let mut state = self.lock();
        if state.fail_render {
            return Err(SimDriverError("render failed".to_owned()));
        }
        state.renders += 1;
        state.last_render = Some(SessionSnapshot::from_app(app));
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}
