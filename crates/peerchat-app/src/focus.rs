//! Terminal focus state machine.
//!
//! Focus has two independent axes: the [`View`] on screen and the connected
//! [`Channel`]. Switching view never drops the selected peer; selecting a
//! peer always focuses the requested view.

use crate::{Channel, EngineError, SessionState, View};

/// Focus `view`, connecting `peer` first if it differs from the current one.
///
/// Unknown peers are registered before being connected.
pub fn switch_view(state: &mut SessionState, view: View, peer: Option<Channel>) {
    if let Some(peer) = peer {
        if &peer != state.connected() {
            state.set_connected(peer);
        }
    }
    state.set_focused_view(view);
}

/// Like [`switch_view`], with the view given by name.
///
/// Unknown view names are rejected and leave the state untouched.
pub fn switch_view_named(
    state: &mut SessionState,
    view: &str,
    peer: Option<Channel>,
) -> Result<(), EngineError> {
    let view = view.parse::<View>()?;
    switch_view(state, view, peer);
    Ok(())
}
