//! Manifest command implementation.
//!
//! The `devkit manifest` command shows the resolved manifest or its schema.

use std::path::{Path, PathBuf};

use crate::cli::args::ManifestArgs;
use crate::error::{DevkitError, Result};
use crate::manifest::Manifest;
use crate::ui::UserInterface;

use super::dispatcher::{load_or_report, Command, CommandResult, EXIT_MANIFEST_ERROR};

/// The manifest command implementation.
pub struct ManifestCommand {
    project_root: PathBuf,
    manifest: Option<PathBuf>,
    args: ManifestArgs,
}

impl ManifestCommand {
    /// Create a new manifest command.
    pub fn new(project_root: &Path, manifest: Option<&Path>, args: ManifestArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            manifest: manifest.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for ManifestCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.schema {
            let schema = schemars::schema_for!(Manifest);
            let json = serde_json::to_string_pretty(&schema)
                .map_err(|e| DevkitError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let Some(loaded) = load_or_report(&self.project_root, self.manifest.as_deref(), ui) else {
            return Ok(CommandResult::failure(EXIT_MANIFEST_ERROR));
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&loaded.manifest)
                .map_err(|e| DevkitError::Other(e.into()))?;
            ui.message(&json);
        } else {
            ui.message(&format!("# {}", loaded.source));
            let yaml =
                serde_yaml::to_string(&loaded.manifest).map_err(|e| DevkitError::Other(e.into()))?;
            ui.message(&yaml);
        }

        Ok(CommandResult::success())
    }
}
