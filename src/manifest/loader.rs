//! Manifest discovery and loading.
//!
//! Lookup order, first match wins:
//! 1. An explicit path (`--manifest`)
//! 2. The project manifest (`.devkit/manifest.yml`)
//! 3. The built-in manifest embedded in the binary

use crate::error::{DevkitError, Result};
use crate::manifest::builtin;
use crate::manifest::schema::Manifest;
use crate::manifest::validator::validate;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding devkit files inside a project.
pub const DEVKIT_DIR: &str = ".devkit";

/// Manifest file name inside [`DEVKIT_DIR`].
pub const MANIFEST_FILE: &str = "manifest.yml";

/// Environment variable overriding the liveness probe URL.
pub const HEALTH_URL_ENV: &str = "DEVKIT_HEALTH_URL";

/// Where a manifest was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// Path given on the command line.
    Explicit(PathBuf),
    /// Project manifest at `.devkit/manifest.yml`.
    Project(PathBuf),
    /// Built-in default.
    Builtin,
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) | Self::Project(p) => write!(f, "{}", p.display()),
            Self::Builtin => f.write_str("built-in manifest"),
        }
    }
}

/// A validated manifest and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub manifest: Manifest,
    pub source: ManifestSource,
}

/// Path of the project manifest for a project root.
pub fn project_manifest_path(project_root: &Path) -> PathBuf {
    project_root.join(DEVKIT_DIR).join(MANIFEST_FILE)
}

/// Decide which manifest to load without reading it.
pub fn discover(project_root: &Path, explicit: Option<&Path>) -> ManifestSource {
    if let Some(path) = explicit {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_root.join(path)
        };
        return ManifestSource::Explicit(path);
    }

    let project = project_manifest_path(project_root);
    if project.exists() {
        ManifestSource::Project(project)
    } else {
        ManifestSource::Builtin
    }
}

/// Parse manifest YAML.
pub fn parse_manifest(content: &str, path: &Path) -> Result<Manifest> {
    serde_yaml::from_str(content).map_err(|e| DevkitError::ManifestParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single manifest file.
///
/// # Errors
///
/// Returns `ManifestNotFound` if the file doesn't exist.
/// Returns `ManifestParseError` if the YAML is invalid.
pub fn load_manifest_file(path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DevkitError::ManifestNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DevkitError::Io(e)
        }
    })?;

    parse_manifest(&content, path)
}

/// Apply environment overrides using a custom lookup function.
pub fn apply_env_overrides<F>(manifest: &mut Manifest, env_fn: F)
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    if let Ok(url) = env_fn(HEALTH_URL_ENV) {
        if !url.trim().is_empty() {
            tracing::debug!("Health URL overridden by {}: {}", HEALTH_URL_ENV, url);
            manifest.inspect.health_url = url.trim().to_string();
        }
    }
}

/// Discover, load, apply environment overrides and validate.
pub fn load_manifest(project_root: &Path, explicit: Option<&Path>) -> Result<LoadedManifest> {
    load_manifest_with_env(project_root, explicit, |key: &str| std::env::var(key))
}

/// Like [`load_manifest`] with a custom environment lookup.
pub fn load_manifest_with_env<F>(
    project_root: &Path,
    explicit: Option<&Path>,
    env_fn: F,
) -> Result<LoadedManifest>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    let source = discover(project_root, explicit);
    tracing::debug!("Loading manifest from {}", source);

    let mut manifest = match &source {
        ManifestSource::Explicit(path) | ManifestSource::Project(path) => {
            load_manifest_file(path)?
        }
        ManifestSource::Builtin => builtin::default_manifest()?,
    };

    apply_env_overrides(&mut manifest, env_fn);
    validate(&manifest)?;

    Ok(LoadedManifest { manifest, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::VarError;
    use tempfile::TempDir;

    fn no_env(_: &str) -> std::result::Result<String, VarError> {
        Err(VarError::NotPresent)
    }

    fn write_project_manifest(root: &Path, content: &str) {
        let dir = root.join(DEVKIT_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), content).unwrap();
    }

    #[test]
    fn falls_back_to_builtin() {
        let temp = TempDir::new().unwrap();
        let loaded = load_manifest_with_env(temp.path(), None, no_env).unwrap();

        assert_eq!(loaded.source, ManifestSource::Builtin);
        assert_eq!(loaded.manifest.display_name(), "AutoBlitz");
    }

    #[test]
    fn prefers_project_manifest() {
        let temp = TempDir::new().unwrap();
        write_project_manifest(temp.path(), "app_name: Local\ndirectories: [logs]");

        let loaded = load_manifest_with_env(temp.path(), None, no_env).unwrap();

        assert!(matches!(loaded.source, ManifestSource::Project(_)));
        assert_eq!(loaded.manifest.display_name(), "Local");
    }

    #[test]
    fn explicit_path_wins_and_is_relative_to_project() {
        let temp = TempDir::new().unwrap();
        write_project_manifest(temp.path(), "app_name: Local");
        fs::write(temp.path().join("other.yml"), "app_name: Other").unwrap();

        let loaded =
            load_manifest_with_env(temp.path(), Some(Path::new("other.yml")), no_env).unwrap();

        assert_eq!(
            loaded.source,
            ManifestSource::Explicit(temp.path().join("other.yml"))
        );
        assert_eq!(loaded.manifest.display_name(), "Other");
    }

    #[test]
    fn missing_explicit_manifest_is_not_found() {
        let temp = TempDir::new().unwrap();
        let result = load_manifest_with_env(temp.path(), Some(Path::new("nope.yml")), no_env);

        assert!(matches!(result, Err(DevkitError::ManifestNotFound { .. })));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        write_project_manifest(temp.path(), "directories: [unclosed");

        let result = load_manifest_with_env(temp.path(), None, no_env);

        assert!(matches!(result, Err(DevkitError::ManifestParseError { .. })));
    }

    #[test]
    fn invalid_manifest_fails_validation() {
        let temp = TempDir::new().unwrap();
        write_project_manifest(temp.path(), "directories: [/abs]");

        let result = load_manifest_with_env(temp.path(), None, no_env);

        assert!(matches!(
            result,
            Err(DevkitError::ManifestValidationError { .. })
        ));
    }

    #[test]
    fn health_url_env_override() {
        let temp = TempDir::new().unwrap();
        let loaded = load_manifest_with_env(temp.path(), None, |key: &str| {
            if key == HEALTH_URL_ENV {
                Ok("http://127.0.0.1:9999/ping".to_string())
            } else {
                Err(VarError::NotPresent)
            }
        })
        .unwrap();

        assert_eq!(
            loaded.manifest.inspect.health_url,
            "http://127.0.0.1:9999/ping"
        );
    }

    #[test]
    fn source_display() {
        assert_eq!(ManifestSource::Builtin.to_string(), "built-in manifest");
        assert_eq!(
            ManifestSource::Project(PathBuf::from(".devkit/manifest.yml")).to_string(),
            ".devkit/manifest.yml"
        );
    }
}
