//! Environment provisioning.
//!
//! Runs the manifest in three steps: directory skeleton, template files,
//! packages. Each step reports per-item outcomes through the
//! [`UserInterface`] and into a [`ProvisionReport`].
//!
//! Files are never overwritten silently. A file that differs both from the
//! template and from what devkit last wrote is a [`FileAction::Conflict`]
//! and is only replaced with `force` or a confirmed overwrite prompt.

pub mod directories;
pub mod packages;
pub mod plan;
pub mod state;

pub use directories::{ensure_directory, DirectoryOutcome, DirectoryResult};
pub use packages::{
    build_install_command, install_group, PackageGroupResult, PackageHost, PackageOutcome,
    SystemHost,
};
pub use plan::{content_hash, plan_file, render, write_file, FileAction, FilePlan};
pub use state::{FileRecord, ProvisionState, STATE_FILE};

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::manifest::Manifest;
use crate::ui::{Prompt, StatusKind, UserInterface};

/// What to do when a step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Keep going and report every failure at the end.
    #[default]
    Collect,
    /// Stop at the first failure.
    FailFast,
}

/// Flags for one provisioning run.
#[derive(Debug, Clone, Default)]
pub struct ProvisionOptions {
    /// Overwrite files edited outside devkit.
    pub force: bool,
    /// Compute and show the plan without changing anything.
    pub dry_run: bool,
    /// Skip the package step.
    pub skip_packages: bool,
    pub policy: FailurePolicy,
}

/// Outcome for one file entry.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: PathBuf,
    pub action: FileAction,
    pub written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    /// A conflict that was left in place.
    pub fn is_kept_conflict(&self) -> bool {
        self.action == FileAction::Conflict && !self.written
    }
}

/// Everything a provisioning run did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProvisionReport {
    pub dry_run: bool,
    pub directories: Vec<DirectoryResult>,
    pub files: Vec<FileResult>,
    pub packages: Vec<PackageGroupResult>,
    /// Set when fail-fast stopped the run early.
    pub aborted: bool,
}

impl ProvisionReport {
    /// One line per failed item.
    pub fn failures(&self) -> Vec<String> {
        let dirs = self.directories.iter().filter_map(|d| match &d.outcome {
            DirectoryOutcome::Failed { reason } => {
                Some(format!("directory {}: {}", d.path.display(), reason))
            }
            _ => None,
        });
        let files = self.files.iter().filter_map(|f| {
            f.error
                .as_ref()
                .map(|e| format!("file {}: {}", f.path.display(), e))
        });
        let packages = self.packages.iter().filter_map(|p| match &p.outcome {
            PackageOutcome::Failed { reason } => Some(format!("{} packages: {}", p.manager, reason)),
            _ => None,
        });
        dirs.chain(files).chain(packages).collect()
    }

    pub fn is_success(&self) -> bool {
        !self.aborted && self.failures().is_empty()
    }

    /// Files left untouched because they have local edits.
    pub fn kept_conflicts(&self) -> Vec<&Path> {
        self.files
            .iter()
            .filter(|f| f.is_kept_conflict())
            .map(|f| f.path.as_path())
            .collect()
    }
}

/// Applies a manifest to a project directory.
pub struct Provisioner<'a> {
    project_root: &'a Path,
    manifest: &'a Manifest,
    options: ProvisionOptions,
}

impl<'a> Provisioner<'a> {
    pub fn new(project_root: &'a Path, manifest: &'a Manifest, options: ProvisionOptions) -> Self {
        Self {
            project_root,
            manifest,
            options,
        }
    }

    /// Run all steps.
    ///
    /// Item failures land in the report; `Err` is reserved for failures that
    /// leave the run in an unknown state, such as being unable to save state.
    pub fn run(&self, ui: &mut dyn UserInterface, host: &dyn PackageHost) -> Result<ProvisionReport> {
        let mut report = ProvisionReport {
            dry_run: self.options.dry_run,
            ..Default::default()
        };

        self.provision_directories(ui, &mut report);
        if self.should_stop(&report) {
            report.aborted = true;
            return Ok(report);
        }

        self.provision_files(ui, &mut report)?;
        if self.should_stop(&report) {
            report.aborted = true;
            return Ok(report);
        }

        if self.options.skip_packages {
            tracing::debug!("Package step skipped");
        } else {
            self.provision_packages(ui, host, &mut report);
            if self.should_stop(&report) {
                report.aborted = true;
            }
        }

        Ok(report)
    }

    fn should_stop(&self, report: &ProvisionReport) -> bool {
        self.options.policy == FailurePolicy::FailFast && !report.failures().is_empty()
    }

    fn provision_directories(&self, ui: &mut dyn UserInterface, report: &mut ProvisionReport) {
        if self.manifest.directories.is_empty() {
            return;
        }
        ui.message(&format!("Directories ({})", self.manifest.directories.len()));

        for dir in &self.manifest.directories {
            let result = ensure_directory(self.project_root, dir, self.options.dry_run);
            let shown = dir.display();
            let (kind, line) = match &result.outcome {
                DirectoryOutcome::Created => (StatusKind::Success, format!("created {}", shown)),
                DirectoryOutcome::Exists => (StatusKind::Skipped, format!("exists {}", shown)),
                DirectoryOutcome::Planned => (StatusKind::Skipped, format!("would create {}", shown)),
                DirectoryOutcome::Failed { reason } => {
                    (StatusKind::Failed, format!("{}: {}", shown, reason))
                }
            };
            ui.status(kind, &line);
            let failed = result.is_failure();
            report.directories.push(result);
            if failed && self.options.policy == FailurePolicy::FailFast {
                return;
            }
        }
    }

    fn provision_files(&self, ui: &mut dyn UserInterface, report: &mut ProvisionReport) -> Result<()> {
        if self.manifest.files.is_empty() {
            return Ok(());
        }
        ui.message(&format!("Files ({})", self.manifest.files.len()));

        let mut state = ProvisionState::load(self.project_root);

        for entry in &self.manifest.files {
            let result = match plan_file(self.project_root, entry, &state) {
                Ok(plan) => self.apply_plan(ui, &plan, &mut state),
                Err(e) => {
                    ui.status(StatusKind::Failed, &format!("{}: {}", entry.path.display(), e));
                    FileResult {
                        path: entry.path.clone(),
                        action: FileAction::Create,
                        written: false,
                        error: Some(e.to_string()),
                    }
                }
            };
            let failed = result.error.is_some();
            report.files.push(result);
            if failed && self.options.policy == FailurePolicy::FailFast {
                break;
            }
        }

        if !self.options.dry_run {
            state.mark_run();
            state.save(self.project_root)?;
        }
        Ok(())
    }

    fn apply_plan(
        &self,
        ui: &mut dyn UserInterface,
        plan: &FilePlan,
        state: &mut ProvisionState,
    ) -> FileResult {
        let shown = plan.path.display().to_string();
        let mut result = FileResult {
            path: plan.path.clone(),
            action: plan.action,
            written: false,
            error: None,
        };

        let write = match plan.action {
            action if action.writes() => true,
            FileAction::Unchanged => {
                ui.status(StatusKind::Skipped, &format!("unchanged {}", shown));
                // The record must match the file so later template changes update it.
                let hash = plan.content_hash();
                if !self.options.dry_run
                    && state.recorded_hash(&plan.path) != Some(hash.as_str())
                {
                    state.record(&plan.path, hash);
                }
                false
            }
            _ => self.resolve_conflict(ui, &shown),
        };

        if !write {
            return result;
        }

        let (verb, done) = match plan.action {
            FileAction::Create => ("create", "created"),
            FileAction::Update => ("update", "updated"),
            _ => ("overwrite", "overwrote"),
        };

        if self.options.dry_run {
            ui.status(StatusKind::Skipped, &format!("would {} {}", verb, shown));
            return result;
        }

        match write_file(self.project_root, plan) {
            Ok(()) => {
                state.record(&plan.path, plan.content_hash());
                result.written = true;
                ui.status(StatusKind::Success, &format!("{} {}", done, shown));
            }
            Err(e) => {
                ui.status(StatusKind::Failed, &format!("{}: {}", shown, e));
                result.error = Some(e.to_string());
            }
        }
        result
    }

    /// Decide whether a locally edited file gets replaced.
    fn resolve_conflict(&self, ui: &mut dyn UserInterface, shown: &str) -> bool {
        if self.options.force {
            tracing::info!("Overwriting {} (forced)", shown);
            return true;
        }

        // Non-interactive UIs answer from DEVKIT_PROMPT_OVERWRITE or the default.
        if !self.options.dry_run {
            let prompt = Prompt::confirm(
                "overwrite",
                &format!("{} has local changes. Overwrite with the template?", shown),
                false,
            );
            match ui.confirm(&prompt) {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => ui.warning(&e.to_string()),
            }
        }

        tracing::warn!("Keeping {}: it has local changes", shown);
        ui.status(
            StatusKind::Warning,
            &format!("kept {} (local changes, use --force to overwrite)", shown),
        );
        false
    }

    fn provision_packages(
        &self,
        ui: &mut dyn UserInterface,
        host: &dyn PackageHost,
        report: &mut ProvisionReport,
    ) {
        if self.manifest.packages.is_empty() {
            return;
        }
        ui.message(&format!("Packages ({})", self.manifest.package_count()));

        for group in &self.manifest.packages {
            let verb = if self.options.dry_run { "Checking" } else { "Installing" };
            let mut spinner = ui.start_spinner(&format!("{} {} packages", verb, group.manager));
            let result = install_group(group, host, self.options.dry_run);
            match &result.outcome {
                PackageOutcome::Installed { names } => {
                    spinner.finish_success(&format!("{}: installed {}", group.manager, names.join(" ")))
                }
                PackageOutcome::AlreadyInstalled => {
                    spinner.finish_skipped(&format!("{}: already installed", group.manager))
                }
                PackageOutcome::Planned { command } => {
                    spinner.finish_skipped(&format!("{}: would run {}", group.manager, command))
                }
                PackageOutcome::Failed { reason } => {
                    spinner.finish_error(&format!("{}: {}", group.manager, reason))
                }
            }
            let failed = result.is_failure();
            report.packages.push(result);
            if failed && self.options.policy == FailurePolicy::FailFast {
                return;
            }
        }
    }
}
