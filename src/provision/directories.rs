//! Directory skeleton creation.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of ensuring one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum DirectoryOutcome {
    Created,
    Exists,
    /// Dry run: the directory would be created.
    Planned,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryResult {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: DirectoryOutcome,
}

impl DirectoryResult {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, DirectoryOutcome::Failed { .. })
    }
}

/// Create one skeleton directory below `project_root`.
///
/// Existing directories are left alone. A regular file in the way is a
/// failure, never replaced.
pub fn ensure_directory(project_root: &Path, relative: &Path, dry_run: bool) -> DirectoryResult {
    let full_path = project_root.join(relative);

    let outcome = if full_path.is_dir() {
        DirectoryOutcome::Exists
    } else if full_path.exists() {
        DirectoryOutcome::Failed {
            reason: "a file with this name already exists".to_string(),
        }
    } else if dry_run {
        DirectoryOutcome::Planned
    } else {
        match fs::create_dir_all(&full_path) {
            Ok(()) => {
                tracing::info!("Created directory {}", relative.display());
                DirectoryOutcome::Created
            }
            Err(e) => DirectoryOutcome::Failed {
                reason: e.to_string(),
            },
        }
    };

    DirectoryResult {
        path: relative.to_path_buf(),
        outcome,
    }
}
