//! Directory structure listing.
//!
//! Prefers the external `tree` tool and falls back to a built-in walk that
//! renders the same shape.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::shell::{execute_quiet, quote_arg, ToolLocator};

/// Directory names never descended into.
pub const NOISE_DIRS: &[&str] = &["node_modules", "__pycache__", ".git", "venv"];

/// Whether a directory is skipped by the walkers.
pub fn is_noise_dir(name: &str) -> bool {
    name.starts_with('.') || NOISE_DIRS.contains(&name)
}

/// How the listing gets produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStrategy {
    /// The `tree` executable at this path.
    TreeTool(PathBuf),
    BuiltinWalk,
}

impl ListingStrategy {
    /// Pick the tree tool when it is on PATH.
    pub fn detect(locator: &ToolLocator) -> Self {
        match locator.resolve("tree") {
            Some(path) => Self::TreeTool(path),
            None => Self::BuiltinWalk,
        }
    }
}

/// Rendered directory listing.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryListing {
    /// `tree` or `builtin`.
    pub source: &'static str,
    pub lines: Vec<String>,
}

/// List directories below `root` down to `depth` levels.
///
/// A failing `tree` invocation falls back to the built-in walk.
pub fn list_directories(root: &Path, depth: usize, strategy: &ListingStrategy) -> DirectoryListing {
    if let ListingStrategy::TreeTool(tool) = strategy {
        match run_tree_tool(tool, root, depth) {
            Some(lines) => {
                return DirectoryListing {
                    source: "tree",
                    lines,
                }
            }
            None => tracing::debug!("tree failed, using built-in walk"),
        }
    }

    DirectoryListing {
        source: "builtin",
        lines: walk(root, depth),
    }
}

fn run_tree_tool(tool: &Path, root: &Path, depth: usize) -> Option<Vec<String>> {
    let command = format!(
        "{} -d -L {} --noreport -I {}",
        quote_arg(&tool.to_string_lossy()),
        depth,
        quote_arg(&NOISE_DIRS.join("|"))
    );
    let result = execute_quiet(&command, Some(root)).ok()?;
    if !result.success {
        return None;
    }
    Some(
        result
            .stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Built-in equivalent of `tree -d -L depth`.
pub fn walk(root: &Path, depth: usize) -> Vec<String> {
    let mut lines = vec![".".to_string()];
    walk_into(root, depth, "", &mut lines);
    lines
}

fn walk_into(dir: &Path, remaining: usize, prefix: &str, lines: &mut Vec<String>) {
    if remaining == 0 {
        return;
    }

    let children = subdirectories(dir);
    let count = children.len();
    for (i, (name, path)) in children.into_iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", prefix, branch, name));

        let next_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
        walk_into(&path, remaining - 1, &next_prefix, lines);
    }
}

/// Visible subdirectories sorted by name.
fn subdirectories(dir: &Path) -> Vec<(String, PathBuf)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut dirs: Vec<(String, PathBuf)> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            (!is_noise_dir(&name)).then(|| (name, e.path()))
        })
        .collect();
    dirs.sort();
    dirs
}
