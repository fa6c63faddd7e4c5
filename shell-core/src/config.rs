use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_title")]
    pub title: String,
    #[serde(default = "default_window_width")]
    pub width: u32,
    #[serde(default = "default_window_height")]
    pub height: u32,
    #[serde(default = "default_min_width")]
    pub min_width: u32,
    #[serde(default = "default_min_height")]
    pub min_height: u32,
    #[serde(default = "default_resizable")]
    pub resizable: bool,
    #[serde(default)]
    pub fullscreen: bool,
}

fn default_window_title() -> String {
    "PackLens".to_string()
}
fn default_window_width() -> u32 {
    800
}
fn default_window_height() -> u32 {
    600
}
fn default_min_width() -> u32 {
    400
}
fn default_min_height() -> u32 {
    300
}
fn default_resizable() -> bool {
    true
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_window_title(),
            width: default_window_width(),
            height: default_window_height(),
            min_width: default_min_width(),
            min_height: default_min_height(),
            resizable: default_resizable(),
            fullscreen: false,
        }
    }
}

/// Content host listener settings
///
/// The host address is always 127.0.0.1 and cannot be configured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Set to 0 for an OS-assigned port
    #[serde(default)]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Override for the web asset directory (absolute, or relative to the
    /// working directory). When unset the launch mode decides.
    #[serde(default)]
    pub web_dir: Option<String>,
    /// Host page template inside the web directory
    #[serde(default = "default_entry_page")]
    pub entry_page: String,
}

fn default_entry_page() -> String {
    "frame.html".to_string()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            web_dir: None,
            entry_page: default_entry_page(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable file logging
    #[serde(default)]
    pub enabled: bool,
    /// Directory for log files (relative to the working directory or absolute)
    #[serde(default = "default_log_directory")]
    pub directory: String,
    /// Prefix for log file names
    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,
    /// Rotation strategy: "daily", "hourly", or "never"
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
    /// Maximum number of log files to keep (0 = unlimited)
    #[serde(default = "default_max_files")]
    pub max_files: u32,
    /// Maximum age of log files in days (0 = unlimited)
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,
}

fn default_log_directory() -> String {
    "logs".to_string()
}
fn default_log_file_prefix() -> String {
    "packlens".to_string()
}
fn default_log_rotation() -> String {
    "daily".to_string()
}
fn default_max_files() -> u32 {
    10
}
fn default_max_age_days() -> u32 {
    30
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: default_log_directory(),
            file_prefix: default_log_file_prefix(),
            rotation: default_log_rotation(),
            max_files: default_max_files(),
            max_age_days: default_max_age_days(),
        }
    }
}

impl AppConfig {
    /// Load config from layered TOML files
    ///
    /// Files are merged in this order (later files override earlier):
    /// 1. {base_name}.toml (required, e.g., config.toml)
    /// 2. {base_name}.{CONFIG_ENV}.toml (optional, only if CONFIG_ENV is set)
    /// 3. {base_name}.local.toml (optional, personal overrides)
    pub fn from_file<P: AsRef<Path>>(base_name: P) -> Result<Self> {
        let base_path = base_name.as_ref();
        let base_str = base_path.to_str().context("Invalid base path")?;

        let mut builder =
            config::Config::builder().add_source(config::File::with_name(base_str));

        if let Ok(env) = std::env::var("CONFIG_ENV") {
            let env_config = format!("{}.{}", base_str, env);
            builder = builder.add_source(config::File::with_name(&env_config).required(false));
        }

        let local_config = format!("{}.local", base_str);
        builder = builder.add_source(config::File::with_name(&local_config).required(false));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Like `from_file`, but falls back to defaults when loading fails
    ///
    /// The load error is handed back instead of printed so the caller can
    /// report it once logging is running.
    pub fn load_or_default<P: AsRef<Path>>(base_name: P) -> (Self, Option<anyhow::Error>) {
        match Self::from_file(base_name) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
}
