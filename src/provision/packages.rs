//! System, Python and Node package installation.

use serde::Serialize;

use crate::error::{DevkitError, Result};
use crate::manifest::{PackageGroup, PackageManager};
use crate::shell::{
    execute_check, execute_quiet, execute_streaming, is_elevated, CommandOptions, CommandResult,
    OutputLine, ToolLocator,
};

/// Everything the installer needs from the host.
///
/// Split out so tests can drive installs without touching the system.
pub trait PackageHost {
    /// Whether an executable is on PATH.
    fn has_tool(&self, tool: &str) -> bool;

    /// Whether the process runs as root.
    fn is_elevated(&self) -> bool;

    /// Run a check command, returning true on exit code 0.
    fn check(&self, command: &str) -> bool;

    /// Run an install command.
    fn run(&self, command: &str) -> Result<CommandResult>;
}

/// The real host: PATH lookup, `geteuid` and `/bin/sh`.
pub struct SystemHost {
    locator: ToolLocator,
    stream_output: bool,
}

impl SystemHost {
    /// Create a host. With `stream_output`, install output is echoed line by line.
    pub fn new(stream_output: bool) -> Self {
        Self {
            locator: ToolLocator::from_env(),
            stream_output,
        }
    }
}

impl PackageHost for SystemHost {
    fn has_tool(&self, tool: &str) -> bool {
        self.locator.has(tool)
    }

    fn is_elevated(&self) -> bool {
        is_elevated()
    }

    fn check(&self, command: &str) -> bool {
        execute_check(command, None)
    }

    fn run(&self, command: &str) -> Result<CommandResult> {
        if !self.stream_output {
            return execute_quiet(command, None);
        }
        let callback = Box::new(|line: OutputLine| match line {
            OutputLine::Stdout(l) => println!("    │ {}", l),
            OutputLine::Stderr(l) => eprintln!("    │ {}", l),
        });
        execute_streaming(command, &CommandOptions::default(), callback)
    }
}

/// Result of installing one package group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PackageOutcome {
    /// The listed packages were installed.
    Installed { names: Vec<String> },
    /// Every package was already present.
    AlreadyInstalled,
    /// Dry run: this command would run.
    Planned { command: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageGroupResult {
    pub manager: PackageManager,
    /// Packages found already installed and left alone.
    pub present: Vec<String>,
    #[serde(flatten)]
    pub outcome: PackageOutcome,
}

impl PackageGroupResult {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, PackageOutcome::Failed { .. })
    }
}

/// Build the full shell command for installing `names`.
///
/// Root-only managers get a `sudo` prefix when the process is not root and
/// `sudo` exists; otherwise the command runs as-is and may fail on
/// permissions.
pub fn build_install_command(
    manager: PackageManager,
    names: &[String],
    host: &dyn PackageHost,
) -> String {
    let prefix = if manager.needs_root() && !host.is_elevated() && host.has_tool("sudo") {
        "sudo "
    } else {
        ""
    };

    let install = format!("{}{}", prefix, manager.install_command(names));
    match manager.refresh_command() {
        Some(refresh) => format!("{}{} && {}", prefix, refresh, install),
        None => install,
    }
}

/// Install one package group, skipping packages that are already present.
pub fn install_group(group: &PackageGroup, host: &dyn PackageHost, dry_run: bool) -> PackageGroupResult {
    let manager = group.manager;

    if !host.has_tool(manager.executable()) {
        let err = DevkitError::ManagerNotFound {
            manager: manager.executable().to_string(),
        };
        return PackageGroupResult {
            manager,
            present: Vec::new(),
            outcome: PackageOutcome::Failed {
                reason: err.to_string(),
            },
        };
    }

    let (present, pending): (Vec<String>, Vec<String>) = group
        .names
        .iter()
        .cloned()
        .partition(|name| host.check(&manager.installed_check(name)));

    tracing::debug!(
        "{}: {} present, {} to install",
        manager,
        present.len(),
        pending.len()
    );

    if pending.is_empty() {
        return PackageGroupResult {
            manager,
            present,
            outcome: PackageOutcome::AlreadyInstalled,
        };
    }

    let command = build_install_command(manager, &pending, host);
    if dry_run {
        return PackageGroupResult {
            manager,
            present,
            outcome: PackageOutcome::Planned { command },
        };
    }

    tracing::info!("Installing {} packages: {}", manager, pending.join(" "));
    let outcome = match host.run(&command) {
        Ok(result) if result.success => PackageOutcome::Installed { names: pending },
        Ok(result) => {
            let err = DevkitError::CommandFailed {
                command: manager.to_string(),
                code: result.exit_code,
            };
            let reason = match result.last_output_line() {
                Some(line) => format!("{}: {}", err, line),
                None => err.to_string(),
            };
            PackageOutcome::Failed { reason }
        }
        Err(e) => PackageOutcome::Failed {
            reason: e.to_string(),
        },
    };

    PackageGroupResult {
        manager,
        present,
        outcome,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeHost;
    use super::*;

    fn group(manager: PackageManager, names: &[&str]) -> PackageGroup {
        PackageGroup {
            manager,
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn missing_manager_fails_group() {
        let host = FakeHost::with_tools(&[]);
        let result = install_group(&group(PackageManager::Npm, &["pm2"]), &host, false);

        assert!(result.is_failure());
        match result.outcome {
            PackageOutcome::Failed { reason } => assert!(reason.contains("npm")),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(host.ran.borrow().is_empty());
    }

    #[test]
    fn present_packages_are_skipped() {
        let mut host = FakeHost::with_tools(&["python3"]);
        host.installed.insert("wheel".to_string());

        let result = install_group(&group(PackageManager::Pip, &["wheel", "pip"]), &host, false);

        assert_eq!(result.present, vec!["wheel".to_string()]);
        assert_eq!(
            result.outcome,
            PackageOutcome::Installed {
                names: vec!["pip".to_string()]
            }
        );
        assert_eq!(host.ran.borrow()[0], "python3 -m pip install pip");
    }

    #[test]
    fn all_present_runs_nothing() {
        let mut host = FakeHost::with_tools(&["npm"]);
        host.installed.insert("pm2".to_string());

        let result = install_group(&group(PackageManager::Npm, &["pm2"]), &host, false);

        assert_eq!(result.outcome, PackageOutcome::AlreadyInstalled);
        assert!(host.ran.borrow().is_empty());
    }

    #[test]
    fn apt_uses_sudo_when_not_root() {
        let host = FakeHost::with_tools(&["apt-get", "sudo"]);
        let command = build_install_command(PackageManager::Apt, &["curl".to_string()], &host);

        assert_eq!(
            command,
            "sudo apt-get update -qq && sudo DEBIAN_FRONTEND=noninteractive apt-get install -y curl"
        );
    }

    #[test]
    fn apt_skips_sudo_as_root() {
        let mut host = FakeHost::with_tools(&["apt-get", "sudo"]);
        host.elevated = true;
        let command = build_install_command(PackageManager::Apt, &["curl".to_string()], &host);

        assert!(!command.contains("sudo"));
    }

    #[test]
    fn apt_without_sudo_runs_plain() {
        let host = FakeHost::with_tools(&["apt-get"]);
        let command = build_install_command(PackageManager::Apt, &["git".to_string()], &host);

        assert!(command.starts_with("apt-get update"));
    }

    #[test]
    fn dry_run_plans_without_running() {
        let host = FakeHost::with_tools(&["npm"]);
        let result = install_group(&group(PackageManager::Npm, &["pm2"]), &host, true);

        assert_eq!(
            result.outcome,
            PackageOutcome::Planned {
                command: "npm install -g pm2".to_string()
            }
        );
        assert!(host.ran.borrow().is_empty());
    }

    #[test]
    fn failed_install_reports_last_line() {
        let mut host = FakeHost::with_tools(&["apt-get"]);
        host.elevated = true;
        host.fail_installs = true;

        let result = install_group(&group(PackageManager::Apt, &["nosuchpkg"]), &host, false);

        match result.outcome {
            PackageOutcome::Failed { reason } => {
                assert!(reason.contains("Unable to locate package"));
                assert!(reason.contains("100"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
