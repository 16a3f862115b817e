//! Built-in manifest and file templates embedded at compile time.

use crate::error::{DevkitError, Result};
use crate::manifest::schema::Manifest;
use include_dir::{include_dir, Dir};

/// Embedded templates directory.
static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

const MANIFEST_PATH: &str = "manifest.yml";
const FILES_PREFIX: &str = "files";

/// Raw YAML of the built-in manifest.
pub fn default_manifest_source() -> Result<&'static str> {
    let file = TEMPLATES_DIR
        .get_file(MANIFEST_PATH)
        .ok_or_else(|| DevkitError::ManifestNotFound {
            path: "templates/manifest.yml".into(),
        })?;

    file.contents_utf8()
        .ok_or_else(|| DevkitError::ManifestParseError {
            path: "templates/manifest.yml".into(),
            message: "Invalid UTF-8".to_string(),
        })
}

/// Load the built-in manifest.
pub fn default_manifest() -> Result<Manifest> {
    let content = default_manifest_source()?;
    serde_yaml::from_str(content).map_err(|e| DevkitError::ManifestParseError {
        path: "templates/manifest.yml".into(),
        message: e.to_string(),
    })
}

/// Content of an embedded file template, if one exists under that name.
pub fn template(name: &str) -> Option<&'static str> {
    TEMPLATES_DIR
        .get_file(format!("{}/{}", FILES_PREFIX, name))
        .and_then(|f| f.contents_utf8())
}

/// Check if an embedded template exists.
pub fn has_template(name: &str) -> bool {
    template(name).is_some()
}

/// Names of all embedded file templates, sorted.
pub fn template_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TEMPLATES_DIR
        .get_dir(FILES_PREFIX)
        .map(|dir| {
            dir.files()
                .filter_map(|f| f.path().file_name().and_then(|n| n.to_str()))
                .collect()
        })
        .unwrap_or_default();
    names.sort_unstable();
    names
}
