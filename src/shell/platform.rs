//! Platform checks: CI detection, privilege level and executable lookup.

use std::path::{Path, PathBuf};

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()`. Checks common CI
/// environment variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`, `CIRCLECI`,
/// `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root/admin.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(windows)]
    {
        std::env::var("ADMIN").is_ok()
    }

    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Resolves executables against a fixed list of directories.
///
/// Does NOT shell out to `which`: its behavior varies across systems and
/// it is sometimes a builtin with inconsistent exit codes. Construct with
/// [`ToolLocator::with_paths`] to simulate a machine where a tool is absent.
#[derive(Debug, Clone)]
pub struct ToolLocator {
    path_entries: Vec<PathBuf>,
}

impl ToolLocator {
    /// Locator over the current process PATH.
    pub fn from_env() -> Self {
        Self {
            path_entries: parse_system_path(),
        }
    }

    /// Locator over an explicit list of directories.
    pub fn with_paths(path_entries: Vec<PathBuf>) -> Self {
        Self { path_entries }
    }

    /// Directories searched, in order.
    pub fn path_entries(&self) -> &[PathBuf] {
        &self.path_entries
    }

    /// First executable named `tool` on the search path.
    pub fn resolve(&self, tool: &str) -> Option<PathBuf> {
        for dir in &self.path_entries {
            let candidate = dir.join(tool);
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
            #[cfg(windows)]
            {
                let candidate = dir.join(format!("{}.exe", tool));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Whether `tool` is available.
    pub fn has(&self, tool: &str) -> bool {
        self.resolve(tool).is_some()
    }
}

impl Default for ToolLocator {
    fn default() -> Self {
        Self::from_env()
    }
}
