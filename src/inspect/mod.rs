//! Read-only project inspection.
//!
//! Collects an [`InspectionReport`]: directory structure, file counts,
//! database files, a liveness probe and config files. Nothing here fails
//! the run; a missing file, tool or service becomes part of the report.

pub mod config_files;
pub mod counts;
pub mod database;
pub mod health;
pub mod pattern;
pub mod tree;

pub use config_files::{find_config_files, ConfigFile};
pub use counts::{count_files, PatternCount};
pub use database::{check_databases, format_size, DatabaseStatus};
pub use health::{probe, HealthReport, ProbeOutcome};
pub use pattern::GlobPattern;
pub use tree::{list_directories, DirectoryListing, ListingStrategy};

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::manifest::InspectSettings;
use crate::shell::ToolLocator;
use crate::ui::{StatusKind, Table, UserInterface};

/// Everything the inspector found.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub project: String,
    pub root: PathBuf,
    pub structure: DirectoryListing,
    pub counts: Vec<PatternCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtree: Option<PathBuf>,
    pub databases: Vec<DatabaseStatus>,
    /// `None` when the probe was skipped.
    pub health: Option<HealthReport>,
    pub config_files: Vec<ConfigFile>,
}

/// Runs the inspection steps against one project.
pub struct Inspector<'a> {
    project_root: &'a Path,
    settings: &'a InspectSettings,
    locator: ToolLocator,
    probe_health: bool,
}

impl<'a> Inspector<'a> {
    pub fn new(project_root: &'a Path, settings: &'a InspectSettings) -> Self {
        Self {
            project_root,
            settings,
            locator: ToolLocator::from_env(),
            probe_health: true,
        }
    }

    /// Use a specific PATH for tool detection.
    pub fn with_locator(mut self, locator: ToolLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Enable or disable the liveness probe.
    pub fn with_health_probe(mut self, enabled: bool) -> Self {
        self.probe_health = enabled;
        self
    }

    pub fn run(&self, project: &str) -> InspectionReport {
        let settings = self.settings;
        let strategy = ListingStrategy::detect(&self.locator);
        tracing::debug!("Directory listing strategy: {:?}", strategy);

        let health = self.probe_health.then(|| {
            let timeout = Duration::from_millis(settings.health_timeout_ms);
            HealthReport::new(&settings.health_url, probe(&settings.health_url, timeout))
        });

        InspectionReport {
            project: project.to_string(),
            root: self.project_root.to_path_buf(),
            structure: list_directories(self.project_root, settings.tree_depth, &strategy),
            counts: count_files(
                self.project_root,
                &settings.count_patterns,
                settings.recursive_subtree.as_deref(),
            ),
            subtree: settings.recursive_subtree.clone(),
            databases: check_databases(self.project_root, &settings.database_files),
            health,
            config_files: find_config_files(self.project_root, &settings.config_patterns),
        }
    }
}

/// Print a report section by section.
pub fn render_report(report: &InspectionReport, ui: &mut dyn UserInterface) {
    ui.show_header(&format!("{} project inspection", report.project));

    ui.message(&format!("Directory structure ({})", report.structure.source));
    for line in &report.structure.lines {
        ui.message(&format!("  {}", line));
    }

    ui.message("");
    ui.message("File counts");
    let mut table = Table::new();
    for count in &report.counts {
        let mut row = vec![count.pattern.clone(), format!("{} in root", count.in_root)];
        if let (Some(n), Some(sub)) = (count.in_subtree, &report.subtree) {
            row.push(format!("{} in {}/", n, sub.display()));
        }
        table.add_row(row);
    }
    for line in table.render_lines(2) {
        ui.message(&line);
    }

    ui.message("");
    ui.message("Database");
    for db in &report.databases {
        match db.size_bytes {
            Some(size) => ui.status(
                StatusKind::Success,
                &format!("{} ({})", db.path.display(), format_size(size)),
            ),
            None => ui.status(
                StatusKind::Missing,
                &format!("{} not found", db.path.display()),
            ),
        }
    }

    ui.message("");
    ui.message("Service");
    match &report.health {
        Some(health) => {
            let detail = match &health.outcome {
                ProbeOutcome::Reachable { status } => format!("HTTP {}", status),
                ProbeOutcome::Unreachable { reason } => reason.clone(),
                ProbeOutcome::TimedOut => "timed out".to_string(),
            };
            let kind = if health.outcome.is_running() {
                StatusKind::Success
            } else {
                StatusKind::Missing
            };
            ui.status(kind, &format!("{} {} ({})", health.state, health.url, detail));
        }
        None => ui.status(StatusKind::Skipped, "health check skipped"),
    }

    ui.message("");
    ui.message("Config files");
    if report.config_files.is_empty() {
        ui.status(StatusKind::Missing, "none found");
    }
    for file in &report.config_files {
        ui.status(
            StatusKind::Success,
            &format!("{} ({})", file.name, format_size(file.size_bytes)),
        );
    }
}
