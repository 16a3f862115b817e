//! Inspect command implementation.
//!
//! The `devkit inspect` command reports on the project without changing it.

use std::path::{Path, PathBuf};

use crate::cli::args::InspectArgs;
use crate::error::{DevkitError, Result};
use crate::inspect::{render_report, Inspector};
use crate::ui::UserInterface;

use super::dispatcher::{load_or_report, Command, CommandResult, EXIT_MANIFEST_ERROR};

/// The inspect command implementation.
pub struct InspectCommand {
    project_root: PathBuf,
    manifest: Option<PathBuf>,
    args: InspectArgs,
}

impl InspectCommand {
    /// Create a new inspect command.
    pub fn new(project_root: &Path, manifest: Option<&Path>, args: InspectArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            manifest: manifest.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for InspectCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(loaded) = load_or_report(&self.project_root, self.manifest.as_deref(), ui) else {
            return Ok(CommandResult::failure(EXIT_MANIFEST_ERROR));
        };
        let manifest = &loaded.manifest;

        let report = Inspector::new(&self.project_root, &manifest.inspect)
            .with_health_probe(!self.args.no_health)
            .run(manifest.display_name());

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| DevkitError::Other(e.into()))?;
            ui.message(&json);
        } else {
            render_report(&report, ui);
        }

        Ok(CommandResult::success())
    }
}
