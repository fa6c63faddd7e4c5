use packlens_core::window::{HostWindow, WindowError};
use tauri::{LogicalSize, WebviewWindow};

/// Tauri webview window seen through the controller's `HostWindow` seam
pub(crate) struct TauriWindow(WebviewWindow);

impl TauriWindow {
    pub(crate) fn new(window: WebviewWindow) -> Self {
        Self(window)
    }
}

impl HostWindow for TauriWindow {
    fn resize(&self, width: i32, height: i32) -> Result<(), WindowError> {
        self.0
            .set_size(LogicalSize::new(f64::from(width), f64::from(height)))
            .map_err(|e| WindowError::operation("resize", e))
    }

    fn minimize(&self) -> Result<(), WindowError> {
        self.0
            .minimize()
            .map_err(|e| WindowError::operation("minimize", e))
    }

    fn toggle_fullscreen(&self) -> Result<(), WindowError> {
        let fullscreen = self
            .0
            .is_fullscreen()
            .map_err(|e| WindowError::operation("toggle_fullscreen", e))?;
        self.0
            .set_fullscreen(!fullscreen)
            .map_err(|e| WindowError::operation("toggle_fullscreen", e))
    }

    fn close(&self) -> Result<(), WindowError> {
        self.0.destroy().map_err(|e| WindowError::operation("close", e))
    }
}
