// PackLens Desktop Application
// Starts the loopback content host and shows it in a single undecorated
// webview window whose controls call back into the window bridge

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod bridge;
mod embedded_assets;
mod host_window;
#[cfg(test)]
mod version_resource;

use anyhow::{Context, Result};
use packlens_core::config::{AppConfig, WindowConfig};
use packlens_core::content_host::{ContentHost, WebRoot};
use packlens_core::logging;
use packlens_core::runtime_paths::{self, LaunchMode};
use std::path::{Path, PathBuf};
use tauri::{Manager, RunEvent, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use bridge::BridgeState;
use embedded_assets::TauriAssets;
use host_window::TauriWindow;

// Version information from build environment
const PACKAGE_VERSION: &str = env!("PACKAGE_VERSION");
const FILE_VERSION: &str = env!("FILE_VERSION");
const BUILD_INFO: &str = env!("BUILD_INFO");

const MAIN_WINDOW_LABEL: &str = "main";

fn main() {
    let launch_mode = LaunchMode::from_build_marker(option_env!("PACKAGED_BUILD"));

    let resource_root = match launch_mode.resource_root(&source_root()) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Failed to resolve resource directory: {:#}", e);
            std::process::exit(1);
        }
    };

    let config_base = runtime_paths::config_base(&resource_root);
    let (config, config_error) = AppConfig::load_or_default(&config_base);
    let _log_guard = logging::init(&config.logging, launch_mode.default_log_level());

    match config_error {
        Some(e) => tracing::warn!(
            "Failed to load configuration from {}: {:#}, using defaults",
            config_base.display(),
            e
        ),
        None => tracing::info!("Configuration loaded from {}", config_base.display()),
    }

    tracing::info!("Starting PackLens Desktop...");
    tracing::info!(
        "Version: {} (file {}, build {})",
        PACKAGE_VERSION,
        FILE_VERSION,
        BUILD_INFO
    );
    tracing::info!(
        ?launch_mode,
        "Resource directory: {}",
        resource_root.display()
    );

    if let Err(e) = run(config, launch_mode, &resource_root) {
        tracing::error!("Failed to start desktop shell: {:#}", e);
        std::process::exit(1);
    }
}

/// Repository root when running from a source checkout
fn source_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn run(config: AppConfig, launch_mode: LaunchMode, resource_root: &Path) -> Result<()> {
    let web_dir = runtime_paths::resolve_web_dir(&config.content, resource_root);
    // Packaged builds serve the copy compiled into the executable unless the
    // config points at a directory
    let serve_embedded = launch_mode.is_packaged() && config.content.web_dir.is_none();
    if !serve_embedded {
        tracing::debug!("Web directory: {}", web_dir.display());
    }

    let app = tauri::Builder::default()
        .manage(BridgeState::<TauriWindow>::default())
        .invoke_handler(tauri::generate_handler![
            bridge::resize,
            bridge::minimize,
            bridge::toggle_maximize,
            bridge::close,
        ])
        .setup(move |app| {
            let web_root = if serve_embedded {
                WebRoot::embedded(TauriAssets::new(app.asset_resolver()))
            } else {
                WebRoot::from(web_dir.clone())
            };

            let host = tauri::async_runtime::block_on(ContentHost::start(
                &config.server,
                web_root,
                &config.content.entry_page,
            ))?;

            let window = create_main_window(app, &config.window, &host.url())?;

            #[cfg(debug_assertions)]
            if !launch_mode.is_packaged() {
                window.open_devtools();
            }

            app.state::<BridgeState>().bind(TauriWindow::new(window));
            app.manage(host);
            Ok(())
        })
        .build(tauri::generate_context!())
        .context("Failed to build tauri application")?;

    app.run(|_app_handle, event| {
        if let RunEvent::Exit = event {
            tracing::info!("Main window closed, exiting");
        }
    });

    Ok(())
}

fn create_main_window(
    app: &tauri::App,
    config: &WindowConfig,
    content_url: &str,
) -> Result<WebviewWindow> {
    let url: tauri::Url = content_url
        .parse()
        .with_context(|| format!("Invalid content host URL: {}", content_url))?;

    tracing::info!("Loading URL: {}", url);

    WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::External(url))
        .title(format!("{} v{}", config.title, PACKAGE_VERSION))
        .inner_size(f64::from(config.width), f64::from(config.height))
        .min_inner_size(f64::from(config.min_width), f64::from(config.min_height))
        .resizable(config.resizable)
        .fullscreen(config.fullscreen)
        .decorations(false)
        .build()
        .context("Failed to create main window")
}
