//! Declarative manifest of packages, directories and template files.
//!
//! - Schema definitions in [`schema`]
//! - Embedded default manifest and file templates in [`builtin`]
//! - Discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use devkit::manifest::{load_manifest, ManifestSource};
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let loaded = load_manifest(temp.path(), None).unwrap();
//! assert_eq!(loaded.source, ManifestSource::Builtin);
//! assert!(!loaded.manifest.files.is_empty());
//! ```

pub mod builtin;
pub mod loader;
pub mod schema;
pub mod validator;

pub use builtin::{default_manifest, has_template, template, template_names};
pub use loader::{
    discover, load_manifest, load_manifest_file, load_manifest_with_env, parse_manifest,
    project_manifest_path, LoadedManifest, ManifestSource, DEVKIT_DIR, MANIFEST_FILE,
};
pub use schema::{FileEntry, InspectSettings, Manifest, PackageGroup, PackageManager};
pub use validator::{validate, validate_manifest, ValidationError};
