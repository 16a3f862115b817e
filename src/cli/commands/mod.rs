//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`devkit provision`, `devkit inspect`)
//! - Shared manifest loading and exit codes
//! - Consistent global flag handling

pub mod completions;
pub mod dispatcher;
pub mod inspect;
pub mod manifest;
pub mod provision;

pub use dispatcher::{
    load_or_report, Command, CommandDispatcher, CommandResult, EXIT_FAILURE, EXIT_MANIFEST_ERROR,
};
