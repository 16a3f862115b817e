//! Shell-style file name patterns.

use regex::Regex;
use std::fmt;

use crate::error::{DevkitError, Result};

/// A compiled `*` / `?` file name pattern.
///
/// Like a shell glob, a pattern that does not start with `.` never matches
/// hidden names.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    raw: String,
    regex: Regex,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let mut source = String::from("^");
        for c in pattern.chars() {
            match c {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                other => source.push_str(&regex::escape(&other.to_string())),
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| DevkitError::ManifestValidationError {
            message: format!("invalid pattern '{}': {}", pattern, e),
        })?;

        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    /// Compile a list of patterns, skipping invalid ones with a warning.
    pub fn compile_all(patterns: &[String]) -> Vec<Self> {
        patterns
            .iter()
            .filter_map(|p| match Self::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            })
            .collect()
    }

    /// Check a bare file name (no directory part).
    pub fn matches(&self, name: &str) -> bool {
        if name.starts_with('.') && !self.raw.starts_with('.') {
            return false;
        }
        self.regex.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_matches_extension() {
        let p = GlobPattern::new("*.py").unwrap();
        assert!(p.matches("main.py"));
        assert!(!p.matches("main.pyc"));
        assert!(!p.matches("py"));
    }

    #[test]
    fn star_on_both_sides_matches_substring() {
        let p = GlobPattern::new("*okx*").unwrap();
        assert!(p.matches("okx_client.py"));
        assert!(p.matches("test_okx.py"));
        assert!(!p.matches("upbit.py"));
    }

    #[test]
    fn dots_are_literal() {
        let p = GlobPattern::new("requirements.txt").unwrap();
        assert!(p.matches("requirements.txt"));
        assert!(!p.matches("requirementsXtxt"));
    }

    #[test]
    fn hidden_names_need_explicit_dot() {
        assert!(!GlobPattern::new("*.yml").unwrap().matches(".travis.yml"));
        assert!(GlobPattern::new(".env*").unwrap().matches(".env.example"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        let p = GlobPattern::new("v?.ini").unwrap();
        assert!(p.matches("v1.ini"));
        assert!(!p.matches("v10.ini"));
    }

    #[test]
    fn regex_metacharacters_are_escaped() {
        let p = GlobPattern::new("a+b(c).txt").unwrap();
        assert!(p.matches("a+b(c).txt"));
        assert!(!p.matches("aab(c).txt"));
    }
}
