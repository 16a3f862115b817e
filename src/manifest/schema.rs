//! Manifest schema definitions.
//!
//! This module contains the struct definitions that map to the
//! `.devkit/manifest.yml` file format.

use crate::shell::quote_arg;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Root manifest structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Manifest {
    /// Application name (for display purposes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Packages to install, grouped by package manager
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<PackageGroup>,

    /// Directory skeleton, relative to the project root
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub directories: Vec<PathBuf>,

    /// Template files to materialize
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileEntry>,

    /// Inspector settings
    pub inspect: InspectSettings,
}

impl Manifest {
    /// Display name, falling back to a generic label.
    pub fn display_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or("Project")
    }

    /// Total number of package names across all groups.
    pub fn package_count(&self) -> usize {
        self.packages.iter().map(|g| g.names.len()).sum()
    }
}

/// A set of packages installed through one package manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PackageGroup {
    pub manager: PackageManager,
    #[serde(default)]
    pub names: Vec<String>,
}

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Apt,
    Pip,
    Npm,
}

impl PackageManager {
    /// Executable that must be on PATH for this manager to be usable.
    pub fn executable(self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Pip => "python3",
            Self::Npm => "npm",
        }
    }

    /// Whether installs through this manager need root privileges.
    pub fn needs_root(self) -> bool {
        matches!(self, Self::Apt)
    }

    /// Command that installs the given packages.
    pub fn install_command(self, names: &[String]) -> String {
        let names: Vec<String> = names.iter().map(|n| quote_arg(n)).collect();
        let names = names.join(" ");
        match self {
            Self::Apt => format!("DEBIAN_FRONTEND=noninteractive apt-get install -y {}", names),
            Self::Pip => format!("python3 -m pip install {}", names),
            Self::Npm => format!("npm install -g {}", names),
        }
    }

    /// Index refresh run once before installing, if the manager needs one.
    pub fn refresh_command(self) -> Option<&'static str> {
        match self {
            Self::Apt => Some("apt-get update -qq"),
            Self::Pip | Self::Npm => None,
        }
    }

    /// Command that succeeds when the package is already installed.
    pub fn installed_check(self, name: &str) -> String {
        let name = quote_arg(package_base_name(name));
        match self {
            Self::Apt => format!("dpkg -s {}", name),
            Self::Pip => format!("python3 -m pip show {}", name),
            Self::Npm => format!("npm ls -g --depth=0 {}", name),
        }
    }
}

/// Package name without version pins or extras (`uvicorn[standard]==0.24.0` -> `uvicorn`).
pub fn package_base_name(name: &str) -> &str {
    let end = name
        .find(|c: char| "[=<>~!".contains(c))
        .unwrap_or(name.len());
    let base = &name[..end];
    // npm pins follow an '@'; a leading '@' marks a scope.
    match base.get(1..).and_then(|rest| rest.find('@')) {
        Some(at) => &base[..at + 1],
        None => base,
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Apt => "apt",
            Self::Pip => "pip",
            Self::Npm => "npm",
        };
        f.write_str(name)
    }
}

/// A file the provisioner writes.
///
/// Exactly one of `template` (an embedded template name) or `content`
/// (literal text) must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileEntry {
    /// Destination path, relative to the project root
    pub path: PathBuf,

    /// Name of an embedded template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Literal file content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Settings for `devkit inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InspectSettings {
    /// Maximum depth of the directory listing
    pub tree_depth: usize,

    /// Glob patterns counted in the project root
    pub count_patterns: Vec<String>,

    /// Subtree counted recursively instead of only its top level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive_subtree: Option<PathBuf>,

    /// Database files whose presence is reported
    pub database_files: Vec<PathBuf>,

    /// URL hit by the liveness probe
    pub health_url: String,

    /// Liveness probe timeout in milliseconds
    pub health_timeout_ms: u64,

    /// Glob patterns of config files listed in the report
    pub config_patterns: Vec<String>,
}

impl Default for InspectSettings {
    fn default() -> Self {
        Self {
            tree_depth: 2,
            count_patterns: vec!["*.py".into(), "*bot*".into(), "*okx*".into()],
            recursive_subtree: Some(PathBuf::from("app")),
            database_files: vec![PathBuf::from("autoblitz.db")],
            health_url: "http://localhost:8000/health".to_string(),
            health_timeout_ms: 3000,
            config_patterns: vec![
                ".env*".into(),
                "requirements.txt".into(),
                "package.json".into(),
                "*.toml".into(),
                "*.ini".into(),
                "*.yml".into(),
                "*.yaml".into(),
            ],
        }
    }
}
