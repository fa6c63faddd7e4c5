//! Windows VERSIONINFO rewriting
//!
//! Shared by `build.rs`, which patches the `resource.rc` that tauri-build
//! generates, and by the crate's unit tests. Tauri only knows a three part
//! semver, so the build component of the file version is written here.

/// `1.2.3.4` as the comma separated tuple `rc.exe` expects. Missing or
/// non-numeric components become 0.
pub fn file_version_tuple(file_version: &str) -> String {
    let mut parts = [0u16; 4];
    for (idx, part) in file_version.split('.').take(4).enumerate() {
        parts[idx] = part.trim().parse().unwrap_or(0);
    }
    format!("{}, {}, {}, {}", parts[0], parts[1], parts[2], parts[3])
}

/// Replace the numeric and string version fields of a resource script.
///
/// Fails when any of the four fields is missing, since a partial patch would
/// leave mismatched versions in the executable.
pub fn patch_version_info(
    original: &str,
    package_version: &str,
    file_version: &str,
) -> Result<String, String> {
    let newline = if original.contains("\r\n") { "\r\n" } else { "\n" };
    let file_tuple = file_version_tuple(file_version);

    let mut replaced = [false; 4];
    let mut lines = Vec::new();
    for line in original.lines() {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];

        let updated = if trimmed.starts_with("FILEVERSION") {
            replaced[0] = true;
            format!("{}FILEVERSION {}", indent, file_tuple)
        } else if trimmed.starts_with("PRODUCTVERSION") {
            replaced[1] = true;
            format!("{}PRODUCTVERSION {}", indent, file_tuple)
        } else if trimmed.starts_with("VALUE \"FileVersion\"") {
            replaced[2] = true;
            format!("{}VALUE \"FileVersion\", \"{}\"", indent, file_version)
        } else if trimmed.starts_with("VALUE \"ProductVersion\"") {
            replaced[3] = true;
            format!("{}VALUE \"ProductVersion\", \"{}\"", indent, package_version)
        } else {
            line.to_string()
        };
        lines.push(updated);
    }

    if replaced.contains(&false) {
        return Err("VERSIONINFO fields missing from resource script".to_string());
    }

    let mut patched = lines.join(newline);
    if original.ends_with('\n') {
        patched.push_str(newline);
    }
    Ok(patched)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCE: &str = concat!(
        "1 VERSIONINFO\n",
        "FILEVERSION 1,0,0,0\n",
        "PRODUCTVERSION 1,0,0,0\n",
        "BEGIN\n",
        "  BLOCK \"StringFileInfo\"\n",
        "  BEGIN\n",
        "    BLOCK \"040904b0\"\n",
        "    BEGIN\n",
        "      VALUE \"FileVersion\", \"1.0.0\"\n",
        "      VALUE \"ProductVersion\", \"1.0.0\"\n",
        "    END\n",
        "  END\n",
        "END\n",
    );

    #[test]
    fn test_file_version_tuple() {
        assert_eq!(file_version_tuple("2.1.0.7"), "2, 1, 0, 7");
        assert_eq!(file_version_tuple("2.1"), "2, 1, 0, 0");
        assert_eq!(file_version_tuple("2.x.3.4.5"), "2, 0, 3, 4");
    }

    #[test]
    fn test_patch_writes_full_quad() {
        let patched = patch_version_info(RESOURCE, "2.1.0", "2.1.0.7").unwrap();

        assert!(patched.contains("FILEVERSION 2, 1, 0, 7\n"));
        assert!(patched.contains("PRODUCTVERSION 2, 1, 0, 7\n"));
        assert!(patched.contains("      VALUE \"FileVersion\", \"2.1.0.7\"\n"));
        assert!(patched.contains("      VALUE \"ProductVersion\", \"2.1.0\"\n"));
        assert!(patched.ends_with("END\n"));
    }

    #[test]
    fn test_patch_keeps_crlf() {
        let crlf = RESOURCE.replace('\n', "\r\n");
        let patched = patch_version_info(&crlf, "2.1.0", "2.1.0.7").unwrap();

        assert!(patched.contains("FILEVERSION 2, 1, 0, 7\r\n"));
        assert!(patched.ends_with("END\r\n"));
        assert!(!patched.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_patch_rejects_incomplete_script() {
        let without_product = RESOURCE.replace("PRODUCTVERSION 1,0,0,0\n", "");
        assert!(patch_version_info(&without_product, "2.1.0", "2.1.0.7").is_err());
    }
}
