// Library interface for the PackLens desktop shell
// Shared by the Tauri bootstrapper and the integration tests

pub mod config;
pub mod content_host;
pub mod logging;
pub mod runtime_paths;
pub mod window;
