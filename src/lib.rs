//! devkit - Declarative development environment provisioning.
//!
//! devkit replaces one-off container bootstrap scripts with a YAML manifest
//! of packages, directories and template files, plus a read-only inspector
//! that reports on the resulting project.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`inspect`] - Project inspection and reporting
//! - [`manifest`] - Manifest schema, loading and validation
//! - [`provision`] - Directory, file and package provisioning
//! - [`shell`] - Shell command execution and platform checks
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use devkit::manifest::default_manifest;
//! use devkit::provision::{ProvisionOptions, Provisioner, SystemHost};
//! use devkit::ui::MockUI;
//! use tempfile::TempDir;
//!
//! let project = TempDir::new().unwrap();
//! let manifest = default_manifest().unwrap();
//! let options = ProvisionOptions {
//!     skip_packages: true,
//!     ..Default::default()
//! };
//!
//! let mut ui = MockUI::new();
//! let report = Provisioner::new(project.path(), &manifest, options)
//!     .run(&mut ui, &SystemHost::new(false))
//!     .unwrap();
//! assert!(report.is_success());
//! assert!(project.path().join(".env.example").exists());
//! ```

pub mod cli;
pub mod error;
pub mod inspect;
pub mod manifest;
pub mod provision;
pub mod shell;
pub mod ui;

pub use error::{DevkitError, Result};
