//! # Report Formatting
//!
//! Turns a [`ValidationOutcome`] into report lines and an exit code.
//!
//! ```text
//!   [root] "status" is a required property
//!   [schema -> 0 -> properties -> 1 -> logicalType] "uuid" is not one of [...]
//! ```

use std::fmt;

use crate::outcome::{PathSegment, ValidationOutcome, Violation};

/// Rendered in place of an empty path.
pub const ROOT_SENTINEL: &str = "root";

/// Joins path segments.
pub const PATH_SEPARATOR: &str = " -> ";

/// Exit code for a valid contract.
pub const EXIT_VALID: u8 = 0;

/// Exit code for an invalid contract or any failure before validation.
pub const EXIT_INVALID: u8 = 1;

/// Render a path, or [`ROOT_SENTINEL`] when it is empty.
pub fn render_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return ROOT_SENTINEL.to_string();
    }
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// One report line: `  [<path>] <message>`.
pub fn render_violation(violation: &Violation) -> String {
    format!("  [{}] {}", render_path(&violation.path), violation.message)
}

/// Exit code for an outcome.
pub fn exit_code(outcome: &ValidationOutcome) -> u8 {
    if outcome.is_valid() {
        EXIT_VALID
    } else {
        EXIT_INVALID
    }
}

/// A rendered validation report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Headline: success line or failure line.
    pub summary: String,
    /// One line per violation, in outcome order.
    pub lines: Vec<String>,
    pub exit_code: u8,
}

impl Report {
    pub fn from_outcome(outcome: &ValidationOutcome) -> Self {
        let summary = if outcome.is_valid() {
            "OK: contract is valid".to_string()
        } else {
            format!(
                "FAIL: validation failed ({} violation(s)):",
                outcome.len()
            )
        };
        Self {
            summary,
            lines: outcome.violations().iter().map(render_violation).collect(),
            exit_code: exit_code(outcome),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)?;
        for line in &self.lines {
            writeln!(f)?;
            write!(f, "{line}")?;
        }
        Ok(())
    }
}
