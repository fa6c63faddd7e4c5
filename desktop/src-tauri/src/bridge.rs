//! Front-end callable window commands
//!
//! The page invokes these through `window.__TAURI__.core.invoke`. None of them
//! report failure; the controller logs and swallows host errors.

use packlens_core::window::{HostWindow, WindowController};
use std::sync::{Mutex, PoisonError};
use tauri::State;

use crate::host_window::TauriWindow;

/// Managed state holding the single controller
///
/// The mutex only satisfies Tauri's `Sync` bound on managed state; commands
/// are delivered one at a time.
pub(crate) struct BridgeState<W: HostWindow = TauriWindow> {
    controller: Mutex<WindowController<W>>,
}

impl<W: HostWindow> Default for BridgeState<W> {
    fn default() -> Self {
        Self {
            controller: Mutex::new(WindowController::new()),
        }
    }
}

impl<W: HostWindow> BridgeState<W> {
    pub(crate) fn bind(&self, window: W) {
        self.with_controller(|controller| controller.set_window(window));
    }

    /// A command that panicked mid-call leaves the lock poisoned; the
    /// controller state is still valid, so later commands keep working.
    fn with_controller<F>(&self, f: F)
    where
        F: FnOnce(&mut WindowController<W>),
    {
        let mut guard = self
            .controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}

#[tauri::command]
pub(crate) fn resize(state: State<'_, BridgeState>, width: i32, height: i32) {
    state.with_controller(|controller| controller.resize(width, height));
}

#[tauri::command]
pub(crate) fn minimize(state: State<'_, BridgeState>) {
    state.with_controller(|controller| controller.minimize());
}

#[tauri::command]
pub(crate) fn toggle_maximize(state: State<'_, BridgeState>) {
    state.with_controller(|controller| controller.toggle_maximize());
}

#[tauri::command]
pub(crate) fn close(state: State<'_, BridgeState>) {
    state.with_controller(|controller| controller.close());
}
