//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{DevkitError, Result};

use super::{parse_bool_answer, OutputMode, Prompt, SpinnerHandle, StatusKind, UserInterface};

/// Prefix of environment variables that answer prompts without a TTY.
pub const PROMPT_ENV_PREFIX: &str = "DEVKIT_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Output is plain text with bracketed status labels. Prompts are answered
/// from `DEVKIT_PROMPT_<KEY>` variables, then from the prompt default.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("✓ {}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn status(&mut self, kind: StatusKind, msg: &str) {
        if self.mode.shows_details() {
            println!("  {}", kind.format_plain(msg));
        }
    }

    fn show_header(&mut self, title: &str) {
        println!("\n{}\n", title);
    }

    fn show_hint(&mut self, hint: &str) {
        println!("  {}", hint);
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        match self.env_overrides.get(&env_key) {
            Some(value) => parse_bool_answer(value).ok_or_else(|| {
                DevkitError::Other(anyhow::anyhow!(
                    "{} must be yes or no, got '{}'",
                    env_key,
                    value
                ))
            }),
            None => Ok(prompt.default),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints only its final line.
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        println!("  {}", StatusKind::Success.format_plain(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  {}", StatusKind::Failed.format_plain(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        println!("  {}", StatusKind::Skipped.format_plain(msg));
    }
}
