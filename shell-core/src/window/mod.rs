//! Native window lifecycle
//!
//! `HostWindow` is the seam between the shell and whatever runtime owns the
//! real window. The desktop binary implements it over a Tauri webview window;
//! tests implement it with mocks.

mod controller;

pub use controller::WindowController;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Window operation '{operation}' failed: {reason}")]
    Operation {
        operation: &'static str,
        reason: String,
    },
}

impl WindowError {
    pub fn operation(operation: &'static str, reason: impl ToString) -> Self {
        Self::Operation {
            operation,
            reason: reason.to_string(),
        }
    }
}

/// Capabilities the controller needs from the native window.
///
/// Dimensions are forwarded exactly as received from the front-end, negative
/// values included. Bounds checking is left to the implementation.
#[cfg_attr(test, mockall::automock)]
pub trait HostWindow {
    fn resize(&self, width: i32, height: i32) -> Result<(), WindowError>;
    fn minimize(&self) -> Result<(), WindowError>;
    fn toggle_fullscreen(&self) -> Result<(), WindowError>;
    fn close(&self) -> Result<(), WindowError>;
}
