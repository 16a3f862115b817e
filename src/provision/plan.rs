//! Per-file write decisions.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DevkitError, Result};
use crate::manifest::{template, FileEntry};

use super::state::ProvisionState;

/// What the provisioner will do with one file entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    /// File does not exist yet.
    Create,
    /// File already holds the rendered content.
    Unchanged,
    /// File holds what devkit wrote last time, but the template moved on.
    Update,
    /// File was edited outside devkit.
    Conflict,
}

impl FileAction {
    /// Whether this action writes without asking.
    pub fn writes(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Create => "create",
            Self::Unchanged => "unchanged",
            Self::Update => "update",
            Self::Conflict => "conflict",
        };
        f.write_str(label)
    }
}

/// The planned action for one file together with the content to write.
#[derive(Debug, Clone)]
pub struct FilePlan {
    /// Path relative to the project root.
    pub path: PathBuf,
    pub action: FileAction,
    pub content: String,
}

impl FilePlan {
    /// Hash of the content this plan writes.
    pub fn content_hash(&self) -> String {
        content_hash(self.content.as_bytes())
    }
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Resolve the text a file entry should contain.
pub fn render(entry: &FileEntry) -> Result<String> {
    match (&entry.template, &entry.content) {
        (Some(name), _) => template(name)
            .map(str::to_string)
            .ok_or_else(|| DevkitError::UnknownTemplate { name: name.clone() }),
        (None, Some(content)) => Ok(content.clone()),
        (None, None) => Err(DevkitError::ManifestValidationError {
            message: format!("{} has neither template nor content", entry.path.display()),
        }),
    }
}

/// Decide what to do with one file entry.
pub fn plan_file(project_root: &Path, entry: &FileEntry, state: &ProvisionState) -> Result<FilePlan> {
    let content = render(entry)?;
    let full_path = project_root.join(&entry.path);

    let existing = match fs::read(&full_path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let action = match existing {
        None => FileAction::Create,
        Some(bytes) if bytes == content.as_bytes() => FileAction::Unchanged,
        Some(bytes) => {
            let current = content_hash(&bytes);
            match state.recorded_hash(&entry.path) {
                Some(recorded) if recorded == current => FileAction::Update,
                _ => FileAction::Conflict,
            }
        }
    };

    tracing::debug!("{}: {}", entry.path.display(), action);

    Ok(FilePlan {
        path: entry.path.clone(),
        action,
        content,
    })
}

/// Write a planned file, creating parent directories.
pub fn write_file(project_root: &Path, plan: &FilePlan) -> Result<()> {
    let full_path = project_root.join(&plan.path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&full_path, &plan.content)?;
    tracing::info!("Wrote {}", plan.path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn literal(path: &str, content: &str) -> FileEntry {
        FileEntry {
            path: PathBuf::from(path),
            template: None,
            content: Some(content.to_string()),
        }
    }

    #[test]
    fn hash_is_hex_sha256() {
        assert_eq!(
            content_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn render_reads_embedded_template() {
        let entry = FileEntry {
            path: PathBuf::from("requirements.txt"),
            template: Some("requirements.txt".to_string()),
            content: None,
        };
        assert!(render(&entry).unwrap().contains("fastapi"));
    }

    #[test]
    fn render_rejects_unknown_template() {
        let entry = FileEntry {
            path: PathBuf::from("x"),
            template: Some("nope.txt".to_string()),
            content: None,
        };
        assert!(matches!(
            render(&entry),
            Err(DevkitError::UnknownTemplate { .. })
        ));
    }

    #[test]
    fn absent_file_is_created() {
        let temp = TempDir::new().unwrap();
        let plan = plan_file(temp.path(), &literal("a.txt", "hi"), &ProvisionState::default())
            .unwrap();
        assert_eq!(plan.action, FileAction::Create);
    }

    #[test]
    fn identical_file_is_unchanged() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "hi").unwrap();

        let plan = plan_file(temp.path(), &literal("a.txt", "hi"), &ProvisionState::default())
            .unwrap();
        assert_eq!(plan.action, FileAction::Unchanged);
    }

    #[test]
    fn file_matching_recorded_hash_is_updated() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "old template").unwrap();
        let mut state = ProvisionState::default();
        state.record(Path::new("a.txt"), content_hash(b"old template"));

        let plan = plan_file(temp.path(), &literal("a.txt", "new template"), &state).unwrap();
        assert_eq!(plan.action, FileAction::Update);
    }

    #[test]
    fn edited_file_is_conflict() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "user edit").unwrap();
        let mut state = ProvisionState::default();
        state.record(Path::new("a.txt"), content_hash(b"template"));

        let plan = plan_file(temp.path(), &literal("a.txt", "template"), &state).unwrap();
        assert_eq!(plan.action, FileAction::Conflict);
    }

    #[test]
    fn unrecorded_differing_file_is_conflict() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "preexisting").unwrap();

        let plan = plan_file(temp.path(), &literal("a.txt", "template"), &ProvisionState::default())
            .unwrap();
        assert_eq!(plan.action, FileAction::Conflict);
    }

    #[test]
    fn write_creates_parents() {
        let temp = TempDir::new().unwrap();
        let plan = FilePlan {
            path: PathBuf::from("deep/nested/file.txt"),
            action: FileAction::Create,
            content: "x".to_string(),
        };

        write_file(temp.path(), &plan).unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("deep/nested/file.txt")).unwrap(),
            "x"
        );
    }

    #[test]
    fn only_create_and_update_write_unprompted() {
        assert!(FileAction::Create.writes());
        assert!(FileAction::Update.writes());
        assert!(!FileAction::Unchanged.writes());
        assert!(!FileAction::Conflict.writes());
    }
}
