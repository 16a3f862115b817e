//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// devkit - Development environment provisioning and project inspection.
#[derive(Debug, Parser)]
#[command(name = "devkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to manifest file (overrides .devkit/manifest.yml)
    #[arg(short, long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install packages, create directories and write template files
    Provision(ProvisionArgs),

    /// Report on the project tree, database, service and config files
    Inspect(InspectArgs),

    /// Show the resolved manifest
    Manifest(ManifestArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `provision` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProvisionArgs {
    /// Overwrite files that were edited since devkit wrote them
    #[arg(short, long)]
    pub force: bool,

    /// Show what would change without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Do not install packages
    #[arg(long)]
    pub skip_packages: bool,

    /// Stop at the first failed step
    #[arg(long)]
    pub fail_fast: bool,

    /// Never prompt; keep edited files unless --force is given
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `inspect` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InspectArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the HTTP liveness probe
    #[arg(long)]
    pub no_health: bool,
}

/// Arguments for the `manifest` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ManifestArgs {
    /// Output as JSON instead of YAML
    #[arg(long, conflicts_with = "schema")]
    pub json: bool,

    /// Print the JSON schema of the manifest format
    #[arg(long)]
    pub schema: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
