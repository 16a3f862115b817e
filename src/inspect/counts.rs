//! File counts by pattern.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::pattern::GlobPattern;
use super::tree::is_noise_dir;

/// How many files one pattern matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternCount {
    pub pattern: String,
    /// Matches directly in the project root.
    pub in_root: usize,
    /// Matches anywhere below the recursive subtree, if one is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_subtree: Option<usize>,
}

/// Count files per pattern in `root` and, recursively, in `subtree`.
///
/// Missing directories count as zero.
pub fn count_files(root: &Path, patterns: &[String], subtree: Option<&Path>) -> Vec<PatternCount> {
    let root_files = file_names(root);
    let subtree_files = subtree.map(|sub| {
        let mut names = Vec::new();
        collect_recursive(&root.join(sub), &mut names);
        names
    });

    GlobPattern::compile_all(patterns)
        .into_iter()
        .map(|pattern| PatternCount {
            pattern: pattern.as_str().to_string(),
            in_root: root_files.iter().filter(|n| pattern.matches(n)).count(),
            in_subtree: subtree_files
                .as_ref()
                .map(|names| names.iter().filter(|n| pattern.matches(n)).count()),
        })
        .collect()
}

/// Names of regular files directly in `dir`.
fn file_names(dir: &Path) -> Vec<String> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn collect_recursive(dir: &Path, names: &mut Vec<String>) {
    names.extend(file_names(dir));

    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let subdirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|e| !is_noise_dir(&e.file_name().to_string_lossy()))
        .map(|e| e.path())
        .collect();
    for sub in subdirs {
        collect_recursive(&sub, names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn patterns() -> Vec<String> {
        vec!["*.py".into(), "*bot*".into(), "*okx*".into()]
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn empty_project_counts_zero() {
        let temp = TempDir::new().unwrap();
        let counts = count_files(temp.path(), &patterns(), Some(Path::new("app")));

        assert_eq!(counts.len(), 3);
        assert!(counts.iter().all(|c| c.in_root == 0));
        assert!(counts.iter().all(|c| c.in_subtree == Some(0)));
    }

    #[test]
    fn root_count_is_not_recursive() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "main.py");
        touch(temp.path(), "scripts/deploy.py");

        let counts = count_files(temp.path(), &patterns(), None);

        assert_eq!(counts[0].in_root, 1);
        assert_eq!(counts[0].in_subtree, None);
    }

    #[test]
    fn subtree_count_is_recursive() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "app/main.py");
        touch(temp.path(), "app/exchanges/okx/okx_client.py");
        touch(temp.path(), "app/bot_engine/bot_runner.py");
        touch(temp.path(), "app/__pycache__/main.cpython-311.py");

        let counts = count_files(temp.path(), &patterns(), Some(Path::new("app")));

        assert_eq!(counts[0].in_subtree, Some(3));
        assert_eq!(counts[1].in_subtree, Some(1));
        assert_eq!(counts[2].in_subtree, Some(1));
        assert_eq!(counts[0].in_root, 0);
    }

    #[test]
    fn directories_are_not_counted() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("bot_engine")).unwrap();

        let counts = count_files(temp.path(), &patterns(), None);
        assert_eq!(counts[1].in_root, 0);
    }
}
