//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::manifest::{load_manifest, LoadedManifest};
use crate::ui::UserInterface;

/// Exit code for a provisioning failure or unexpected error.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for a manifest that cannot be loaded or is invalid.
pub const EXIT_MANIFEST_ERROR: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Load the manifest, reporting a load error to the user.
///
/// `None` means the error was shown and the command should exit with
/// [`EXIT_MANIFEST_ERROR`].
pub fn load_or_report(
    project_root: &Path,
    explicit: Option<&Path>,
    ui: &mut dyn UserInterface,
) -> Option<LoadedManifest> {
    match load_manifest(project_root, explicit) {
        Ok(loaded) => {
            tracing::debug!("Using {}", loaded.source);
            Some(loaded)
        }
        Err(e) => {
            ui.error(&e.to_string());
            None
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    manifest: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            manifest: None,
        }
    }

    /// Use an explicit manifest file instead of discovery.
    pub fn with_manifest(mut self, manifest: Option<PathBuf>) -> Self {
        self.manifest = manifest;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let manifest = self.manifest.as_deref();
        match &cli.command {
            Commands::Provision(args) => {
                let cmd =
                    super::provision::ProvisionCommand::new(&self.project_root, manifest, args.clone());
                cmd.execute(ui)
            }
            Commands::Inspect(args) => {
                let cmd =
                    super::inspect::InspectCommand::new(&self.project_root, manifest, args.clone());
                cmd.execute(ui)
            }
            Commands::Manifest(args) => {
                let cmd =
                    super::manifest::ManifestCommand::new(&self.project_root, manifest, args.clone());
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}
