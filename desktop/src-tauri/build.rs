// Build script for PackLens Desktop
// Forwards version and packaging metadata set by packlens-build, runs the
// Tauri build, then writes the full four part version into the Windows
// VERSIONINFO that tauri-build generated

use std::process::Command;

#[cfg_attr(not(windows), allow(dead_code))]
#[path = "src/version_resource.rs"]
mod version_resource;

fn main() {
    println!("cargo:rerun-if-env-changed=PACKAGE_VERSION");
    println!("cargo:rerun-if-env-changed=FILE_VERSION");
    println!("cargo:rerun-if-env-changed=BUILD_INFO");
    println!("cargo:rerun-if-env-changed=PACKAGED_BUILD");

    let (package_version, file_version, build_info) = generate_version_info();

    println!("cargo:rustc-env=PACKAGE_VERSION={}", package_version);
    println!("cargo:rustc-env=FILE_VERSION={}", file_version);
    println!("cargo:rustc-env=BUILD_INFO={}", build_info);

    // Only packaged builds get the marker; source builds leave it unset
    if let Ok(marker) = std::env::var("PACKAGED_BUILD") {
        println!("cargo:rustc-env=PACKAGED_BUILD={}", marker);
    }

    let attributes = tauri_build::Attributes::new().app_manifest(
        tauri_build::AppManifest::new().commands(&["resize", "minimize", "toggle_maximize", "close"]),
    );
    tauri_build::try_build(attributes).expect("failed to run tauri build");

    #[cfg(windows)]
    {
        if let Err(err) = patch_windows_resource(&package_version, &file_version) {
            panic!("Failed to patch Windows VERSIONINFO: {err}");
        }
    }

    println!("cargo:rerun-if-changed=../../.git/HEAD");
}

#[cfg(windows)]
fn patch_windows_resource(
    package_version: &str,
    file_version: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    use std::{env, fs, path::PathBuf};

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let rc_path = out_dir.join("resource.rc");
    if !rc_path.exists() {
        return Err(format!("resource.rc not found at {}", rc_path.display()).into());
    }

    let original = fs::read_to_string(&rc_path)?;
    let patched = version_resource::patch_version_info(&original, package_version, file_version)?;
    fs::write(&rc_path, patched)?;
    recompile_resource(&rc_path, &out_dir)?;

    println!(
        "cargo:warning=Patched Windows VERSIONINFO to package={} file={}",
        package_version, file_version
    );
    Ok(())
}

#[cfg(windows)]
fn recompile_resource(
    rc_path: &std::path::Path,
    out_dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let rc_exe =
        find_rc_executable().ok_or("Unable to locate rc.exe. Set RC_EXE_PATH to override.")?;

    let mut command = Command::new(&rc_exe);
    command.arg("/nologo");
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        command.arg(format!("/I{}", manifest_dir));
    }

    let status = command
        .arg(format!("/fo{}", out_dir.join("resource.lib").display()))
        .arg(rc_path)
        .status()?;
    if !status.success() {
        return Err(format!("rc.exe failed with status {}", status).into());
    }
    Ok(())
}

/// Newest `rc.exe` from the installed Windows 10 SDKs
#[cfg(windows)]
fn find_rc_executable() -> Option<std::path::PathBuf> {
    use std::path::PathBuf;

    if let Ok(custom) = std::env::var("RC_EXE_PATH") {
        let candidate = PathBuf::from(custom);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    let mut roots = vec![
        PathBuf::from(r"C:\Program Files (x86)\Windows Kits\10\bin"),
        PathBuf::from(r"C:\Program Files\Windows Kits\10\bin"),
    ];
    if let Ok(sdk_dir) = std::env::var("WindowsSdkDir") {
        roots.push(PathBuf::from(sdk_dir).join("bin"));
    }

    let mut candidates = Vec::new();
    for root in roots.iter().filter(|root| root.exists()) {
        let direct = root.join("x64").join("rc.exe");
        if direct.exists() {
            candidates.push((sdk_version_key(&direct), direct));
        }
        if let Ok(entries) = std::fs::read_dir(root) {
            for entry in entries.flatten() {
                let rc = entry.path().join("x64").join("rc.exe");
                if rc.exists() {
                    candidates.push((sdk_version_key(&rc), rc));
                }
            }
        }
    }

    candidates.sort_by(|a, b| a.0.cmp(&b.0));
    candidates.pop().map(|(_, path)| path)
}

/// SDK version from `<root>/<version>/x64/rc.exe`
#[cfg(windows)]
fn sdk_version_key(rc_path: &std::path::Path) -> [u32; 4] {
    let mut parts = [0u32; 4];
    if let Some(version_dir) = rc_path
        .parent()
        .and_then(|p| p.parent())
        .and_then(|p| p.file_name())
    {
        for (idx, part) in version_dir
            .to_string_lossy()
            .split('.')
            .filter_map(|s| s.parse::<u32>().ok())
            .take(4)
            .enumerate()
        {
            parts[idx] = part;
        }
    }
    parts
}

fn generate_version_info() -> (String, String, String) {
    // Values from packlens-build take precedence
    if let (Ok(pkg_ver), Ok(file_ver)) = (
        std::env::var("PACKAGE_VERSION"),
        std::env::var("FILE_VERSION"),
    ) {
        let build_info =
            std::env::var("BUILD_INFO").unwrap_or_else(|_| format!("{}+packaged", file_ver));
        return (pkg_ver, file_ver, build_info);
    }

    // Fallback: derive from Git
    let base_version =
        get_tag_version().unwrap_or_else(|| std::env::var("CARGO_PKG_VERSION").unwrap_or_default());
    let commit_count = get_commit_count().unwrap_or(0);
    let commit_hash = get_commit_hash().unwrap_or_else(|| "unknown".to_string());
    let dirty_suffix = if is_dirty() { "-dirty" } else { "" };

    let package_version = base_version.clone();
    let file_version = format!("{}.{}", base_version, commit_count);
    let build_info = format!(
        "{}+build.{}.{}{}",
        base_version, commit_count, commit_hash, dirty_suffix
    );

    (package_version, file_version, build_info)
}

fn git_output(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
}

fn get_tag_version() -> Option<String> {
    git_output(&["describe", "--tags", "--abbrev=0", "--match", "v[0-9]*"])
        .map(|s| s.trim_start_matches('v').to_string())
}

fn get_commit_count() -> Option<u32> {
    git_output(&["rev-list", "--count", "HEAD"]).and_then(|s| s.parse().ok())
}

fn get_commit_hash() -> Option<String> {
    git_output(&["rev-parse", "--short", "HEAD"])
}

fn is_dirty() -> bool {
    Command::new("git")
        .args(["diff", "--quiet"])
        .status()
        .map(|status| !status.success())
        .unwrap_or(false)
}
