//! Record of what the provisioner wrote.
//!
//! Stored as `.devkit/state.json`. The recorded hash of each written file is
//! what distinguishes "template changed" from "user edited the file".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::manifest::DEVKIT_DIR;

/// File name of the provision state inside `.devkit/`.
pub const STATE_FILE: &str = "state.json";

/// Persistent provision state for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionState {
    /// Schema version for migration.
    pub version: u32,

    /// Time of the last non-dry run.
    pub last_run: Option<DateTime<Utc>>,

    /// Written files keyed by their manifest path.
    #[serde(default)]
    pub files: BTreeMap<String, FileRecord>,
}

/// What devkit last wrote to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Hex SHA-256 of the written content.
    pub sha256: String,
    pub written_at: DateTime<Utc>,
}

impl Default for ProvisionState {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            last_run: None,
            files: BTreeMap::new(),
        }
    }
}

impl ProvisionState {
    /// Current schema version.
    pub const CURRENT_VERSION: u32 = 1;

    /// Location of the state file for a project.
    pub fn path(project_root: &Path) -> PathBuf {
        project_root.join(DEVKIT_DIR).join(STATE_FILE)
    }

    /// Load state for a project.
    ///
    /// A missing file yields empty state. An unreadable or corrupt file also
    /// yields empty state, which makes every differing file a conflict.
    pub fn load(project_root: &Path) -> Self {
        let path = Self::path(project_root);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Ignoring corrupt state file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write state to `.devkit/state.json`, creating the directory.
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let path = Self::path(project_root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(anyhow::Error::from)?;
        fs::write(&path, json)?;
        tracing::debug!("Saved provision state to {}", path.display());
        Ok(())
    }

    /// Hash recorded for the last write of `path`.
    pub fn recorded_hash(&self, path: &Path) -> Option<&str> {
        self.files.get(&state_key(path)).map(|r| r.sha256.as_str())
    }

    /// Record that `path` now holds content with this hash.
    pub fn record(&mut self, path: &Path, sha256: String) {
        self.files.insert(
            state_key(path),
            FileRecord {
                sha256,
                written_at: Utc::now(),
            },
        );
    }

    /// Stamp the run time.
    pub fn mark_run(&mut self) {
        self.last_run = Some(Utc::now());
    }
}

/// Platform-independent key for a manifest path.
fn state_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
