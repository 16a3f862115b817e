//! Database file presence.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseStatus {
    pub path: PathBuf,
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// Check each database file relative to `root`.
pub fn check_databases(root: &Path, files: &[PathBuf]) -> Vec<DatabaseStatus> {
    files
        .iter()
        .map(|rel| {
            let size_bytes = fs::metadata(root.join(rel))
                .ok()
                .filter(|m| m.is_file())
                .map(|m| m.len());
            DatabaseStatus {
                path: rel.clone(),
                present: size_bytes.is_some(),
                size_bytes,
            }
        })
        .collect()
}

/// Human-readable byte size (`512 B`, `1.5 KB`, `3.2 MB`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit + 1 < UNITS.len() {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reports_present_file_with_size() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("autoblitz.db"), vec![0u8; 2048]).unwrap();

        let status = check_databases(temp.path(), &[PathBuf::from("autoblitz.db")]);

        assert!(status[0].present);
        assert_eq!(status[0].size_bytes, Some(2048));
    }

    #[test]
    fn reports_missing_file() {
        let temp = TempDir::new().unwrap();
        let status = check_databases(temp.path(), &[PathBuf::from("autoblitz.db")]);

        assert!(!status[0].present);
        assert_eq!(status[0].size_bytes, None);
    }

    #[test]
    fn directory_is_not_a_database() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("data.db")).unwrap();

        let status = check_databases(temp.path(), &[PathBuf::from("data.db")]);
        assert!(!status[0].present);
    }

    #[test]
    fn sizes_are_humanized() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
