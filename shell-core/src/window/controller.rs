use super::{HostWindow, WindowError};

/// Mediates every window-lifecycle request coming from the front-end bridge.
///
/// The window is bound after construction because the bridge is registered
/// before the runtime hands out a window handle. Until `set_window` runs, every
/// operation is a silent no-op.
///
/// `is_maximized` records the last toggle this controller issued. It is not
/// read back from the window, so it drifts if fullscreen is changed by any
/// other path (keyboard shortcut, window manager) or if the host fails the
/// toggle. The flag flips regardless of the host result.
pub struct WindowController<W: HostWindow> {
    window: Option<W>,
    is_maximized: bool,
}

impl<W: HostWindow> Default for WindowController<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: HostWindow> WindowController<W> {
    pub fn new() -> Self {
        Self {
            window: None,
            is_maximized: false,
        }
    }

    /// Bind the controller to the created window. Later calls are ignored.
    pub fn set_window(&mut self, window: W) {
        if self.window.is_some() {
            tracing::warn!("set_window called twice, keeping the original window");
            return;
        }
        self.window = Some(window);
        tracing::debug!("Window bound to controller");
    }

    pub fn is_bound(&self) -> bool {
        self.window.is_some()
    }

    pub fn is_maximized(&self) -> bool {
        self.is_maximized
    }

    pub fn resize(&self, width: i32, height: i32) {
        let Some(window) = self.bound("resize") else {
            return;
        };
        report("resize", window.resize(width, height));
    }

    pub fn minimize(&self) {
        let Some(window) = self.bound("minimize") else {
            return;
        };
        report("minimize", window.minimize());
    }

    pub fn toggle_maximize(&mut self) {
        let Some(window) = self.bound("toggle_maximize") else {
            return;
        };
        report("toggle_maximize", window.toggle_fullscreen());
        self.is_maximized = !self.is_maximized;
        tracing::debug!(is_maximized = self.is_maximized, "Fullscreen toggled");
    }

    /// Destroy the window. The binding is released, so anything the
    /// front-end still sends afterwards is ignored.
    pub fn close(&mut self) {
        let Some(window) = self.window.take() else {
            tracing::debug!(operation = "close", "Ignored: no window bound");
            return;
        };
        tracing::info!("Closing main window");
        report("close", window.close());
    }

    fn bound(&self, operation: &'static str) -> Option<&W> {
        if self.window.is_none() {
            tracing::debug!(operation, "Ignored: no window bound");
        }
        self.window.as_ref()
    }
}

fn report(operation: &'static str, result: Result<(), WindowError>) {
    if let Err(e) = result {
        tracing::warn!(operation, "Host window rejected request: {}", e);
    }
}
