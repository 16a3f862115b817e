//! Manifest validation rules.
//!
//! This module validates a manifest for correctness:
//! - Paths must be relative and stay inside the project root
//! - File entries must have exactly one of `template` or `content`
//! - Template references must name an embedded template
//! - File paths must be unique

use crate::error::{DevkitError, Result};
use crate::manifest::builtin;
use crate::manifest::schema::Manifest;
use std::collections::HashSet;
use std::path::{Component, Path};

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
        }
    }
}

/// Validate a manifest and return all errors.
///
/// Collects every error rather than stopping at the first one.
pub fn validate_manifest(manifest: &Manifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_directories(manifest));
    errors.extend(validate_files(manifest));
    errors.extend(validate_packages(manifest));

    if manifest.inspect.tree_depth == 0 {
        errors.push(ValidationError::new(
            "zero-depth",
            "inspect.tree_depth must be greater than zero".to_string(),
        ));
    }

    if manifest.inspect.health_timeout_ms == 0 {
        errors.push(ValidationError::new(
            "zero-timeout",
            "inspect.health_timeout_ms must be greater than zero".to_string(),
        ));
    }

    errors
}

/// Validate a manifest, failing with all messages joined.
pub fn validate(manifest: &Manifest) -> Result<()> {
    let errors = validate_manifest(manifest);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(DevkitError::ManifestValidationError {
            message: messages.join("; "),
        })
    }
}

/// Whether a path is relative and never climbs out of its root.
pub fn is_contained(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn validate_directories(manifest: &Manifest) -> Vec<ValidationError> {
    manifest
        .directories
        .iter()
        .filter(|dir| !is_contained(dir))
        .map(|dir| {
            ValidationError::new(
                "path-escapes-root",
                format!(
                    "Directory '{}' must be a relative path inside the project",
                    dir.display()
                ),
            )
        })
        .collect()
}

fn validate_files(manifest: &Manifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for file in &manifest.files {
        let shown = file.path.display();

        if !is_contained(&file.path) {
            errors.push(ValidationError::new(
                "path-escapes-root",
                format!("File '{}' must be a relative path inside the project", shown),
            ));
        }

        if !seen.insert(file.path.clone()) {
            errors.push(ValidationError::new(
                "duplicate-file",
                format!("File '{}' is listed more than once", shown),
            ));
        }

        match (&file.template, &file.content) {
            (Some(_), Some(_)) => errors.push(ValidationError::new(
                "ambiguous-source",
                format!("File '{}' has both 'template' and 'content'", shown),
            )),
            (None, None) => errors.push(ValidationError::new(
                "missing-source",
                format!("File '{}' must have either 'template' or 'content'", shown),
            )),
            (Some(name), None) if !builtin::has_template(name) => {
                errors.push(ValidationError::new(
                    "unknown-template",
                    format!("File '{}' references unknown template '{}'", shown, name),
                ))
            }
            _ => {}
        }
    }

    errors
}

fn validate_packages(manifest: &Manifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for group in &manifest.packages {
        for name in &group.names {
            // Version ranges are allowed; commands quote each name.
            let valid = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_.+@/=[],<>~!^".contains(c));
            if !valid {
                errors.push(ValidationError::new(
                    "invalid-package",
                    format!("Package '{}' ({}) has an invalid name", name, group.manager),
                ));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::schema::{FileEntry, PackageGroup, PackageManager};
    use std::path::PathBuf;

    fn file(path: &str, template: Option<&str>, content: Option<&str>) -> FileEntry {
        FileEntry {
            path: PathBuf::from(path),
            template: template.map(String::from),
            content: content.map(String::from),
        }
    }

    #[test]
    fn default_manifest_is_valid() {
        let manifest = builtin::default_manifest().unwrap();
        assert!(validate_manifest(&manifest).is_empty());
    }

    #[test]
    fn rejects_absolute_directory() {
        let manifest = Manifest {
            directories: vec![PathBuf::from("/etc/devkit")],
            ..Default::default()
        };
        let errors = validate_manifest(&manifest);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "path-escapes-root");
    }

    #[test]
    fn rejects_parent_traversal() {
        let manifest = Manifest {
            files: vec![file("../outside.txt", None, Some("x"))],
            ..Default::default()
        };
        let errors = validate_manifest(&manifest);
        assert!(errors.iter().any(|e| e.rule == "path-escapes-root"));
    }

    #[test]
    fn rejects_file_without_source() {
        let manifest = Manifest {
            files: vec![file("notes.txt", None, None)],
            ..Default::default()
        };
        let errors = validate_manifest(&manifest);
        assert_eq!(errors[0].rule, "missing-source");
    }

    #[test]
    fn rejects_file_with_both_sources() {
        let manifest = Manifest {
            files: vec![file("notes.txt", Some("env.example"), Some("x"))],
            ..Default::default()
        };
        let errors = validate_manifest(&manifest);
        assert_eq!(errors[0].rule, "ambiguous-source");
    }

    #[test]
    fn rejects_unknown_template() {
        let manifest = Manifest {
            files: vec![file("Gemfile", Some("Gemfile"), None)],
            ..Default::default()
        };
        let errors = validate_manifest(&manifest);
        assert_eq!(errors[0].rule, "unknown-template");
    }

    #[test]
    fn rejects_duplicate_files() {
        let manifest = Manifest {
            files: vec![
                file("a.txt", None, Some("1")),
                file("a.txt", None, Some("2")),
            ],
            ..Default::default()
        };
        let errors = validate_manifest(&manifest);
        assert!(errors.iter().any(|e| e.rule == "duplicate-file"));
    }

    #[test]
    fn rejects_shell_metacharacters_in_package_names() {
        let manifest = Manifest {
            packages: vec![PackageGroup {
                manager: PackageManager::Apt,
                names: vec!["curl; rm -rf /".to_string()],
            }],
            ..Default::default()
        };
        let errors = validate_manifest(&manifest);
        assert_eq!(errors[0].rule, "invalid-package");
    }

    #[test]
    fn accepts_extras_and_pins() {
        let manifest = Manifest {
            packages: vec![PackageGroup {
                manager: PackageManager::Pip,
                names: vec!["uvicorn[standard]==0.24.0".to_string()],
            }],
            ..Default::default()
        };
        assert!(validate_manifest(&manifest).is_empty());
    }

    #[test]
    fn accepts_version_ranges() {
        let manifest = Manifest {
            packages: vec![
                PackageGroup {
                    manager: PackageManager::Pip,
                    names: vec!["numpy>=1.26".to_string(), "pandas~=2.1,!=2.1.1".to_string()],
                },
                PackageGroup {
                    manager: PackageManager::Npm,
                    names: vec!["react@^18.2.0".to_string(), "@types/node@~20".to_string()],
                },
            ],
            ..Default::default()
        };
        assert!(validate_manifest(&manifest).is_empty());
    }

    #[test]
    fn rejects_zero_tree_depth() {
        let mut manifest = Manifest::default();
        manifest.inspect.tree_depth = 0;
        let errors = validate_manifest(&manifest);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "zero-depth");
    }

    #[test]
    fn validate_joins_messages() {
        let manifest = Manifest {
            directories: vec![PathBuf::from("/abs")],
            files: vec![file("x", None, None)],
            ..Default::default()
        };
        let err = validate(&manifest).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/abs"));
        assert!(msg.contains("'x'"));
    }
}
