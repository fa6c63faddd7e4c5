//! Launch mode detection and asset path resolution
//!
//! Packaged builds read `config/` next to the executable and serve the web
//! assets compiled into it unless `web_dir` is set. Source checkouts use the
//! directories at the repository root.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::ContentConfig;

pub const WEB_DIR_NAME: &str = "web";
pub const CONFIG_DIR_NAME: &str = "config";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Packaged,
    SourceCheckout,
}

impl LaunchMode {
    /// Decide from the compile-time marker the packager sets
    /// (`PACKAGED_BUILD=1`). Absent, empty or "0" means a source checkout.
    pub fn from_build_marker(marker: Option<&str>) -> Self {
        match marker.map(str::trim) {
            Some("") | Some("0") | None => LaunchMode::SourceCheckout,
            Some(_) => LaunchMode::Packaged,
        }
    }

    pub fn is_packaged(self) -> bool {
        self == LaunchMode::Packaged
    }

    /// Source checkouts get developer diagnostics
    pub fn default_log_level(self) -> &'static str {
        match self {
            LaunchMode::Packaged => "info",
            LaunchMode::SourceCheckout => "debug",
        }
    }

    /// Directory that holds `config/` and any on-disk `web/`
    pub fn resource_root(self, source_root: &Path) -> Result<PathBuf> {
        match self {
            LaunchMode::SourceCheckout => Ok(source_root.to_path_buf()),
            LaunchMode::Packaged => executable_dir(),
        }
    }
}

fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to get executable path")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("Failed to get executable directory")
}

/// Web directory: explicit config override first, then the launch-mode default
pub fn resolve_web_dir(content: &ContentConfig, resource_root: &Path) -> PathBuf {
    match &content.web_dir {
        Some(dir) => PathBuf::from(dir),
        None => resource_root.join(WEB_DIR_NAME),
    }
}

/// Base name for the layered config files (`<root>/config/config`)
pub fn config_base(resource_root: &Path) -> PathBuf {
    resource_root.join(CONFIG_DIR_NAME).join("config")
}
