//! Version metadata handed to the desktop build
//!
//! Tauri merges the JSON in `TAURI_CONFIG` over `tauri.conf.json`, which is
//! where the executable's product name, version and publisher fields come
//! from. The desktop build script reads the remaining variables.

use serde_json::{json, Value};

use crate::build_config::BuildConfig;

pub const PACKAGED_BUILD_MARKER: &str = "1";

/// Tauri configuration override for this build
pub fn tauri_config_override(config: &BuildConfig) -> Value {
    json!({
        "productName": config.product_name,
        "version": config.version.package_version(),
        "bundle": {
            "publisher": config.company_name,
            "copyright": config.copyright,
            "shortDescription": config.file_description,
        }
    })
}

pub fn build_info(config: &BuildConfig) -> String {
    format!("{}+packaged", config.version.file_version())
}

/// Environment for the release build, in the order it is printed
pub fn build_env(config: &BuildConfig, tauri_config: &Value) -> Vec<(&'static str, String)> {
    vec![
        ("TAURI_CONFIG", tauri_config.to_string()),
        ("PACKAGE_VERSION", config.version.package_version()),
        ("FILE_VERSION", config.version.file_version()),
        ("BUILD_INFO", build_info(config)),
        ("PACKAGED_BUILD", PACKAGED_BUILD_MARKER.to_string()),
    ]
}
