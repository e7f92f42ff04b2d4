//! Generic runtime for application orchestration.
//!
//! The Runtime owns one activation of the chat session, coordinating between:
//! - [`App`]: session state machine
//! - [`Bridge`]: network control handle
//! - [`Driver`]: event source and presentation
//!
//! Every state change that asks for a render is also published on a
//! [`tokio::sync::watch`] channel, so observers can follow the session
//! without polling the driver.

use std::collections::VecDeque;

use thiserror::Error;
use tokio::sync::watch;

use crate::{
    App, AppAction, AppConfig, AppEvent, Bridge, Driver, NetworkControl, SessionState, Snapshot,
    lifecycle,
};

/// Activation failed after the session was restored.
///
/// Holds the session and the control handle as they were when the driver
/// failed, so nothing captured at the previous deactivation is lost.
#[derive(Debug, Error)]
#[error("activation failed: {error}")]
pub struct ActivationError<E, H> {
    /// Driver error that stopped the activation.
    #[source]
    pub error: E,
    /// Session and control handle to pass to the next activation.
    pub snapshot: Snapshot<H>,
}

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific driver
/// - `N`: Network control handle
pub struct Runtime<D, N>
where
    D: Driver,
    N: NetworkControl,
{
    driver: D,
    app: App,
    bridge: Bridge<N>,
    updates: watch::Sender<SessionState>,
}

impl<D, N> Runtime<D, N>
where
    D: Driver,
    N: NetworkControl,
{
    /// Activate a session.
    ///
    /// Restores `snapshot` if one is given, otherwise starts from `config`.
    /// The snapshot's control handle is reused; `make_control` is only called
    /// when there is none. The network layer is started unless the snapshot
    /// says it already was.
    ///
    /// # Errors
    ///
    /// Returns an [`ActivationError`] if the driver fails to render. The error
    /// carries the session and control handle so the host can retry.
    pub async fn activate<F>(
        driver: D,
        snapshot: Option<Snapshot<N>>,
        config: &AppConfig,
        make_control: F,
    ) -> Result<Self, ActivationError<D::Error, N>>
    where
        F: FnOnce() -> N,
    {
        let restored = lifecycle::restore(snapshot, config);
        let control = restored.control.unwrap_or_else(make_control);
        let app = App::from_state(restored.state);
        let (updates, _) = watch::channel(app.state().clone());

        let mut runtime =
            Self { driver, app, bridge: Bridge::new(control, restored.is_started), updates };

        match runtime.bring_up(restored.is_started).await {
            Ok(()) => Ok(runtime),
            Err(error) => {
                tracing::warn!(%error, "Activation failed, handing session back");
                Err(ActivationError { error, snapshot: runtime.deactivate() })
            },
        }
    }

    async fn bring_up(&mut self, is_started: bool) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        if is_started {
            tracing::debug!("Reusing running network layer");
            return Ok(());
        }
        let actions = self.app.start();
        self.process_actions(actions).await
    }

    /// Run the event loop until the driver stops delivering events.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        while let Some(event) = self.driver.poll_event().await? {
            self.dispatch(event).await?;
        }
        Ok(())
    }

    /// Handle a single event and execute the resulting actions.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to render.
    pub async fn dispatch(&mut self, event: AppEvent) -> Result<(), D::Error> {
        let actions = self.app.handle(event);
        self.process_actions(actions).await
    }

    /// End the activation and hand the session back to the host.
    ///
    /// The control handle is returned inside the snapshot, never closed.
    pub fn deactivate(mut self) -> Snapshot<N> {
        self.driver.stop();
        let (control, started) = self.bridge.into_parts();
        tracing::debug!(started, "Capturing session at deactivation");
        lifecycle::capture(self.app.into_state(), control, started)
    }

    /// Execute actions returned by the App.
    ///
    /// Follow-up events are queued and handled after the current batch, never
    /// re-entrantly.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<(), D::Error> {
        let mut pending: VecDeque<AppAction> = initial_actions.into();

        while let Some(action) = pending.pop_front() {
            let events = match action {
                AppAction::Render => {
                    self.driver.render(&self.app)?;
                    self.updates.send_replace(self.app.state().clone());
                    continue;
                },
                AppAction::StartNetwork => self.bridge.start().await,
                AppAction::SendBroadcast { .. } | AppAction::SendDirect { .. } => {
                    self.bridge.process_app_action(action)
                },
            };

            for event in events {
                pending.extend(self.app.handle(event));
            }
        }
        Ok(())
    }

    /// Follow session state after every render.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.updates.subscribe()
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the Driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Get a reference to the network control handle
    pub fn control(&self) -> &N {
        self.bridge.control()
    }

    /// Whether start has been issued on the network layer
    pub fn is_started(&self) -> bool {
        self.bridge.is_started()
    }
}
