const KB: u64 = 1024;
const MB: u64 = KB * 1024;

/// Human readable file size for the build summary
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}
