// PackLens packaging tool
// Builds the desktop shell in release mode with version metadata and
// publishes the single executable under dist/

mod build_config;
mod format;
mod metadata;
mod steps;
mod version;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use build_config::BuildConfig;
use steps::{Packager, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "packlens-build", version, about = "Package the PackLens desktop shell")]
struct Cli {
    /// Build configuration file; its directory is the project root
    #[arg(short, long, default_value = "build.toml")]
    config: PathBuf,

    /// Keep the build/ directory after packaging
    #[arg(long)]
    skip_cleanup: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match package(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            eprintln!("Packaging failed");
            ExitCode::FAILURE
        }
    }
}

fn package(cli: &Cli) -> Result<()> {
    let config = BuildConfig::load(&cli.config)?;
    let project_root = project_root(&cli.config)?;

    tracing::info!(
        "Packaging {} from {}",
        config.app_name,
        project_root.display()
    );

    let packager = Packager::new(config, project_root);
    let executable = packager.run(RunOptions {
        skip_cleanup: cli.skip_cleanup,
    })?;

    println!("╔════════════════════════════════════════════════════════════════");
    println!("║ Build completed");
    for line in packager.summary(&executable)? {
        println!("║ {}", line);
    }
    println!("╚════════════════════════════════════════════════════════════════");
    Ok(())
}

fn project_root(config_path: &Path) -> Result<PathBuf> {
    let config_path = std::fs::canonicalize(config_path)
        .with_context(|| format!("Failed to resolve {}", config_path.display()))?;
    config_path
        .parent()
        .map(Path::to_path_buf)
        .with_context(|| format!("{} has no parent directory", config_path.display()))
}
