//! Config file listing.

use serde::Serialize;
use std::fs;
use std::path::Path;

use super::pattern::GlobPattern;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigFile {
    pub name: String,
    pub size_bytes: u64,
}

/// Files in `root` matching any pattern, sorted by name, each listed once.
pub fn find_config_files(root: &Path, patterns: &[String]) -> Vec<ConfigFile> {
    let patterns = GlobPattern::compile_all(patterns);
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    let mut files: Vec<ConfigFile> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let meta = e.metadata().ok().filter(|m| m.is_file())?;
            let name = e.file_name().to_string_lossy().to_string();
            patterns
                .iter()
                .any(|p| p.matches(&name))
                .then_some(ConfigFile {
                    name,
                    size_bytes: meta.len(),
                })
        })
        .collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}
