//! # Diagnostics
//!
//! One [`Diagnostic`] is produced for every rule a failing field was
//! checked against. Diagnostics are plain values: they are built fresh for
//! each evaluation and handed back to the caller, never stored on the
//! compiled schema.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single "field X did not pass rule Y" entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Name of the field that failed.
    pub field: String,
    /// String form of the value observed in the record.
    pub observed: String,
    /// Description of the rule that was tried, e.g. `numeric (0 - 100)`.
    pub rule: String,
}

impl Diagnostic {
    pub fn new(
        field: impl Into<String>,
        observed: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            observed: observed.into(),
            rule: rule.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' ({}) did not pass validator {}.",
            self.field, self.observed, self.rule
        )
    }
}

/// Render diagnostics one per line, in the order given.
pub fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(Diagnostic::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
