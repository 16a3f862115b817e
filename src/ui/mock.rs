//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use devkit::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("overwrite", true);
//!
//! ui.message("Creating directories");
//! assert!(ui.confirm(&Prompt::confirm("overwrite", "Overwrite?", false)).unwrap());
//! assert!(ui.has_message("Creating"));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Result;

use super::{OutputMode, Prompt, SpinnerHandle, StatusKind, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    statuses: Vec<(StatusKind, String)>,
    headers: Vec<String>,
    hints: Vec<String>,
    spinners: Vec<String>,
    spinner_results: Rc<RefCell<Vec<(SpinnerStatus, String)>>>,
    prompt_responses: HashMap<String, bool>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set the answer for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, answer: bool) {
        self.prompt_responses.insert(key.to_string(), answer);
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// All status lines in emission order.
    pub fn statuses(&self) -> &[(StatusKind, String)] {
        &self.statuses
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Messages of every spinner that was started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// How each spinner finished, in order.
    pub fn spinner_results(&self) -> Vec<(SpinnerStatus, String)> {
        self.spinner_results.borrow().clone()
    }

    /// Keys of all prompts that were asked.
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check whether a status line of this kind mentions `msg`.
    pub fn has_status(&self, kind: StatusKind, msg: &str) -> bool {
        self.statuses
            .iter()
            .any(|(k, m)| *k == kind && m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn status(&mut self, kind: StatusKind, msg: &str) {
        self.statuses.push((kind, msg.to_string()));
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        self.prompts_shown.push(prompt.key.clone());
        Ok(self
            .prompt_responses
            .get(&prompt.key)
            .copied()
            .unwrap_or(prompt.default))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner {
            results: Rc::clone(&self.spinner_results),
        })
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// How a mock spinner was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    Success,
    Error,
    Skipped,
}

/// Spinner handle that records its final state into the owning [`MockUI`].
#[derive(Debug)]
pub struct MockSpinner {
    results: Rc<RefCell<Vec<(SpinnerStatus, String)>>>,
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        self.results
            .borrow_mut()
            .push((SpinnerStatus::Success, msg.to_string()));
    }

    fn finish_error(&mut self, msg: &str) {
        self.results
            .borrow_mut()
            .push((SpinnerStatus::Error, msg.to_string()));
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.results
            .borrow_mut()
            .push((SpinnerStatus::Skipped, msg.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_messages() {
        let mut ui = MockUI::new();
        ui.message("one");
        ui.success("two");
        ui.warning("three");
        ui.error("four");

        assert_eq!(ui.messages(), &["one".to_string()]);
        assert!(ui.has_success("two"));
        assert!(ui.has_warning("three"));
        assert!(ui.has_error("four"));
    }

    #[test]
    fn captures_statuses() {
        let mut ui = MockUI::new();
        ui.status(StatusKind::Missing, "autoblitz.db");

        assert!(ui.has_status(StatusKind::Missing, "autoblitz"));
        assert!(!ui.has_status(StatusKind::Success, "autoblitz"));
    }

    #[test]
    fn confirm_falls_back_to_default() {
        let mut ui = MockUI::new();
        let prompt = Prompt::confirm("overwrite", "Overwrite?", true);

        assert!(ui.confirm(&prompt).unwrap());
        assert_eq!(ui.prompts_shown(), &["overwrite".to_string()]);
    }

    #[test]
    fn confirm_uses_configured_answer() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("overwrite", false);
        let prompt = Prompt::confirm("overwrite", "Overwrite?", true);

        assert!(!ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn spinner_results_are_recorded() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("apt");
        spinner.finish_error("apt failed");
        let mut spinner = ui.start_spinner("pip");
        spinner.finish_skipped("pip skipped");

        assert_eq!(ui.spinners(), &["apt".to_string(), "pip".to_string()]);
        assert_eq!(
            ui.spinner_results(),
            vec![
                (SpinnerStatus::Error, "apt failed".to_string()),
                (SpinnerStatus::Skipped, "pip skipped".to_string()),
            ]
        );
    }

    #[test]
    fn with_mode_sets_mode() {
        let ui = MockUI::with_mode(OutputMode::Verbose);
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
        assert!(!ui.is_interactive());
    }
}
