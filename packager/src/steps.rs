//! Packaging steps
//!
//! Each step either completes or returns an error; `Packager::run` stops at
//! the first failure so later steps never see partial output.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::build_config::BuildConfig;
use crate::format::format_size;
use crate::metadata;

pub const DIST_DIR: &str = "dist";
pub const BUILD_DIR: &str = "build";
pub const VERSION_INFO_FILE: &str = "version-info.json";

const STAGING_DIR: &str = "staging";
const WEB_DIR: &str = "web";

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Leave `build/` in place after a successful run
    pub skip_cleanup: bool,
}

pub struct Packager {
    config: BuildConfig,
    project_root: PathBuf,
    target_dir: Option<PathBuf>,
}

impl Packager {
    pub fn new(config: BuildConfig, project_root: PathBuf) -> Self {
        Self {
            config,
            project_root,
            target_dir: std::env::var_os("CARGO_TARGET_DIR").map(PathBuf::from),
        }
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.project_root.join(DIST_DIR)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.project_root.join(BUILD_DIR)
    }

    /// Run every step and return the location of the published executable
    pub fn run(&self, options: RunOptions) -> Result<PathBuf> {
        tracing::info!("[1/6] Cleaning previous output");
        self.clean()?;

        tracing::info!("[2/6] Rendering version metadata");
        let tauri_config = self.render_metadata()?;

        tracing::info!("[3/6] Building {}", self.config.binary);
        self.build(&tauri_config)?;

        tracing::info!("[4/6] Staging {}", self.config.executable_name());
        let executable = self.stage()?;

        if options.skip_cleanup {
            tracing::info!("[5/6] Keeping {}", self.build_dir().display());
        } else {
            tracing::info!("[5/6] Removing build directory");
            self.post_clean()?;
        }

        tracing::info!("[6/6] Done");
        Ok(executable)
    }

    pub fn clean(&self) -> Result<()> {
        for dir in [self.dist_dir(), self.build_dir()] {
            if remove_dir_if_exists(&dir)? {
                tracing::info!("Removed {}", dir.display());
            }
        }
        Ok(())
    }

    /// Write `build/version-info.json` and return the override it holds
    pub fn render_metadata(&self) -> Result<Value> {
        let tauri_config = metadata::tauri_config_override(&self.config);

        let build_dir = self.build_dir();
        fs::create_dir_all(&build_dir)
            .with_context(|| format!("Failed to create {}", build_dir.display()))?;

        let path = build_dir.join(VERSION_INFO_FILE);
        let content = serde_json::to_string_pretty(&tauri_config)?;
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!(
            "Version {} (file {})",
            self.config.version.package_version(),
            self.config.version.file_version()
        );
        Ok(tauri_config)
    }

    pub fn build(&self, tauri_config: &Value) -> Result<()> {
        let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
        let manifest = self.config.manifest_path(&self.project_root);
        if !manifest.is_file() {
            bail!("Desktop manifest not found: {}", manifest.display());
        }
        // Compiled into the executable by the desktop build
        let web = self.project_root.join(WEB_DIR);
        if !web.is_dir() {
            bail!("Web directory not found: {}", web.display());
        }

        let args = [
            "build".to_string(),
            "--release".to_string(),
            "--manifest-path".to_string(),
            manifest.display().to_string(),
        ];
        let env = metadata::build_env(&self.config, tauri_config);

        println!("Running: {} {}", cargo, args.join(" "));
        for (name, value) in &env {
            println!("  {}={}", name, value);
        }

        let status = Command::new(&cargo)
            .args(&args)
            .envs(env)
            .current_dir(&self.project_root)
            .status()
            .with_context(|| format!("Failed to launch {}", cargo))?;

        if !status.success() {
            bail!("Build failed with {}", status);
        }
        Ok(())
    }

    fn built_binary(&self) -> PathBuf {
        self.config
            .built_binary_path(&self.project_root, self.target_dir.as_deref())
    }

    /// Stage the executable under `build/staging`, then move it to `dist/`
    ///
    /// The web assets are embedded in the binary, so the executable is the
    /// only file published.
    pub fn stage(&self) -> Result<PathBuf> {
        let binary = self.built_binary();
        if !binary.is_file() {
            bail!("Executable not found: {}", binary.display());
        }

        let staging = self.build_dir().join(STAGING_DIR);
        remove_dir_if_exists(&staging)?;
        fs::create_dir_all(&staging)
            .with_context(|| format!("Failed to create {}", staging.display()))?;

        let executable_name = self.config.executable_name();
        fs::copy(&binary, staging.join(&executable_name))
            .with_context(|| format!("Failed to copy {}", binary.display()))?;

        let dist = self.dist_dir();
        remove_dir_if_exists(&dist)?;
        fs::rename(&staging, &dist)
            .with_context(|| format!("Failed to move staging to {}", dist.display()))?;

        Ok(dist.join(executable_name))
    }

    pub fn post_clean(&self) -> Result<()> {
        remove_dir_if_exists(&self.build_dir())?;
        Ok(())
    }

    pub fn summary(&self, executable: &Path) -> Result<Vec<String>> {
        let location = fs::canonicalize(executable)
            .with_context(|| format!("Executable not found: {}", executable.display()))?;
        let size = fs::metadata(&location)?.len();

        Ok(vec![
            format!("Application: {}", self.config.app_name),
            format!(
                "Platform: {} ({})",
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
            format!(
                "Version: {} (file {})",
                self.config.version.package_version(),
                self.config.version.file_version()
            ),
            format!("SSL support: {}", if self.config.include_ssl { "yes" } else { "no" }),
            format!("Location: {}", location.display()),
            format!("Size: {}", format_size(size)),
        ])
    }
}

fn remove_dir_if_exists(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
    Ok(true)
}
