//! Provision command implementation.
//!
//! The `devkit provision` command applies the manifest to the project.

use std::path::{Path, PathBuf};

use crate::cli::args::ProvisionArgs;
use crate::error::Result;
use crate::provision::{
    DirectoryOutcome, FailurePolicy, FileAction, PackageHost, PackageOutcome, ProvisionOptions,
    ProvisionReport, Provisioner, SystemHost,
};
use crate::ui::{OutputMode, Table, UserInterface};

use super::dispatcher::{load_or_report, Command, CommandResult, EXIT_FAILURE, EXIT_MANIFEST_ERROR};

/// The provision command implementation.
pub struct ProvisionCommand {
    project_root: PathBuf,
    manifest: Option<PathBuf>,
    args: ProvisionArgs,
}

impl ProvisionCommand {
    /// Create a new provision command.
    pub fn new(project_root: &Path, manifest: Option<&Path>, args: ProvisionArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            manifest: manifest.map(Path::to_path_buf),
            args,
        }
    }

    fn options(&self) -> ProvisionOptions {
        ProvisionOptions {
            force: self.args.force,
            dry_run: self.args.dry_run,
            skip_packages: self.args.skip_packages,
            policy: if self.args.fail_fast {
                FailurePolicy::FailFast
            } else {
                FailurePolicy::Collect
            },
        }
    }

    /// Run against a specific package host.
    pub fn execute_with_host(
        &self,
        ui: &mut dyn UserInterface,
        host: &dyn PackageHost,
    ) -> Result<CommandResult> {
        let Some(loaded) = load_or_report(&self.project_root, self.manifest.as_deref(), ui) else {
            return Ok(CommandResult::failure(EXIT_MANIFEST_ERROR));
        };
        let manifest = &loaded.manifest;

        let title = if self.args.dry_run {
            format!("Provisioning {} (dry run)", manifest.display_name())
        } else {
            format!("Provisioning {}", manifest.display_name())
        };
        ui.show_header(&title);
        if ui.output_mode() == OutputMode::Verbose {
            ui.message(&format!("Manifest: {}", loaded.source));
        }

        let report = Provisioner::new(&self.project_root, manifest, self.options()).run(ui, host)?;

        show_summary(&report, ui);

        if report.is_success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(EXIT_FAILURE))
        }
    }
}

impl Command for ProvisionCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let host = SystemHost::new(ui.output_mode().shows_command_output());
        self.execute_with_host(ui, &host)
    }
}

fn show_summary(report: &ProvisionReport, ui: &mut dyn UserInterface) {
    let created = report
        .directories
        .iter()
        .filter(|d| matches!(d.outcome, DirectoryOutcome::Created | DirectoryOutcome::Planned))
        .count();
    let written = report.files.iter().filter(|f| f.written).count();
    let unchanged = report
        .files
        .iter()
        .filter(|f| f.action == FileAction::Unchanged)
        .count();
    let installed: usize = report
        .packages
        .iter()
        .map(|p| match &p.outcome {
            PackageOutcome::Installed { names } => names.len(),
            _ => 0,
        })
        .sum();

    let mut table = Table::new();
    table.add_row([
        "directories".to_string(),
        format!("{} new, {} total", created, report.directories.len()),
    ]);
    table.add_row([
        "files".to_string(),
        format!(
            "{} written, {} unchanged, {} kept",
            written,
            unchanged,
            report.kept_conflicts().len()
        ),
    ]);
    if !report.packages.is_empty() {
        table.add_row([
            "packages".to_string(),
            format!("{} installed in {} groups", installed, report.packages.len()),
        ]);
    }

    ui.message("");
    for line in table.render_lines(2) {
        ui.message(&line);
    }
    ui.message("");

    let failures = report.failures();
    if failures.is_empty() && !report.aborted {
        if report.dry_run {
            ui.success("Dry run complete, nothing was changed");
        } else {
            ui.success("Provisioning complete");
        }
    } else {
        for failure in &failures {
            ui.error(failure);
        }
        if report.aborted {
            ui.error("Stopped at the first failure (--fail-fast)");
        } else {
            ui.error(&format!("Provisioning finished with {} failure(s)", failures.len()));
        }
    }

    if !report.kept_conflicts().is_empty() {
        ui.show_hint("Edited files were kept. Re-run with --force to replace them with the templates.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::packages::testing::FakeHost;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn args() -> ProvisionArgs {
        ProvisionArgs {
            skip_packages: true,
            ..Default::default()
        }
    }

    #[test]
    fn provisions_builtin_manifest() {
        let temp = TempDir::new().unwrap();
        let cmd = ProvisionCommand::new(temp.path(), None, args());
        let mut ui = MockUI::new();

        let result = cmd.execute_with_host(&mut ui, &FakeHost::default()).unwrap();

        assert!(result.success);
        assert!(temp.path().join("autoblitz-backend/app/exchanges/okx").is_dir());
        assert!(temp.path().join(".env.example").is_file());
        assert_eq!(ui.headers(), &["Provisioning AutoBlitz".to_string()]);
        assert!(ui.has_success("Provisioning complete"));
    }

    #[test]
    fn kept_conflict_shows_force_hint() {
        let temp = TempDir::new().unwrap();
        let cmd = ProvisionCommand::new(temp.path(), None, args());
        cmd.execute_with_host(&mut MockUI::new(), &FakeHost::default())
            .unwrap();
        fs::write(temp.path().join(".env.example"), "OKX_API_KEY=mine\n").unwrap();

        let mut ui = MockUI::new();
        let result = cmd.execute_with_host(&mut ui, &FakeHost::default()).unwrap();

        assert!(result.success);
        assert!(ui.hints().iter().any(|h| h.contains("--force")));
        assert!(ui.has_message("1 kept"));
    }

    #[test]
    fn failed_package_group_exits_1() {
        let temp = TempDir::new().unwrap();
        let cmd = ProvisionCommand::new(temp.path(), None, ProvisionArgs::default());
        let mut ui = MockUI::new();

        let result = cmd
            .execute_with_host(&mut ui, &FakeHost::with_tools(&[]))
            .unwrap();

        assert_eq!(result.exit_code, EXIT_FAILURE);
        assert!(ui.has_error("not found on PATH"));
        assert!(ui.has_error("failure(s)"));
    }

    #[test]
    fn invalid_manifest_exits_2() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yml");
        fs::write(&path, "directories: [\"../outside\"]\n").unwrap();
        let cmd = ProvisionCommand::new(temp.path(), Some(&path), args());
        let mut ui = MockUI::new();

        let result = cmd.execute_with_host(&mut ui, &FakeHost::default()).unwrap();

        assert_eq!(result.exit_code, EXIT_MANIFEST_ERROR);
        assert!(ui.has_error("Invalid manifest"));
        assert!(!temp.path().join("../outside").exists());
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let temp = TempDir::new().unwrap();
        let cmd = ProvisionCommand::new(
            temp.path(),
            None,
            ProvisionArgs {
                dry_run: true,
                ..args()
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute_with_host(&mut ui, &FakeHost::default()).unwrap();

        assert!(result.success);
        assert!(ui.has_success("Dry run complete"));
        assert!(!temp.path().join(".env.example").exists());
    }
}
