use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::version::VersionQuad;

/// Naming and versioning fields for one packaging run
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    pub app_name: String,
    /// Directory holding the desktop crate's Cargo.toml, relative to the
    /// config file
    pub main_entry: String,
    /// Cargo binary name produced by `main_entry`
    pub binary: String,
    #[serde(default)]
    pub include_ssl: bool,
    pub version: VersionQuad,
    pub company_name: String,
    pub product_name: String,
    #[serde(default)]
    pub file_description: String,
    #[serde(default)]
    pub copyright: String,
}

impl BuildConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read build config {}", path.display()))?;
        let config: BuildConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse build config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            bail!("app_name must not be empty");
        }
        if self.app_name.contains(['/', '\\']) {
            bail!("app_name must not contain path separators: {}", self.app_name);
        }
        if self.binary.trim().is_empty() {
            bail!("binary must not be empty");
        }
        Ok(())
    }

    pub fn manifest_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.main_entry).join("Cargo.toml")
    }

    /// Where cargo leaves the release binary
    pub fn built_binary_path(&self, project_root: &Path, target_dir: Option<&Path>) -> PathBuf {
        let target_dir = match target_dir {
            Some(dir) => project_root.join(dir),
            None => project_root.join(&self.main_entry).join("target"),
        };
        target_dir
            .join("release")
            .join(format!("{}{}", self.binary, std::env::consts::EXE_SUFFIX))
    }

    /// File name of the published executable
    pub fn executable_name(&self) -> String {
        format!("{}{}", self.app_name, std::env::consts::EXE_SUFFIX)
    }
}
