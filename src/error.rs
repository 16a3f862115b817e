//! Error types for devkit operations.
//!
//! This module defines [`DevkitError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `DevkitError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `DevkitError::Other`) for unexpected errors
//! - Inspection never surfaces errors for missing files or tools; those are
//!   folded into the report as informational entries

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for devkit operations.
#[derive(Debug, Error)]
pub enum DevkitError {
    /// Manifest file not found at expected location.
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Failed to parse manifest file.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParseError { path: PathBuf, message: String },

    /// Invalid manifest structure or values.
    #[error("Invalid manifest: {message}")]
    ManifestValidationError { message: String },

    /// Referenced embedded template does not exist.
    #[error("Unknown template: {name}")]
    UnknownTemplate { name: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A package manager executable is not on PATH.
    #[error("Package manager '{manager}' not found on PATH")]
    ManagerNotFound { manager: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for devkit operations.
pub type Result<T> = std::result::Result<T, DevkitError>;
