//! # Record Evaluator
//!
//! Applies a compiled [`Schema`] to a [`Record`].
//!
//! For every field in the schema the record's value is looked up (absence
//! counts as null) and the field passes if any of its rule alternatives
//! matches. The record passes if every field passes. Fields the record
//! carries but the schema does not declare are ignored.
//!
//! Diagnostics are returned inside the [`Verdict`]; nothing is written back
//! to the schema, so evaluations are independent of each other and may run
//! concurrently on one shared schema.

use serde::Serialize;
use serde_json::Value;
use typhaon_core::{render_diagnostics, Diagnostic, FieldValue, Record, ValidationError};

use crate::compile::Schema;

/// The outcome of validating one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    passed: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Verdict {
    /// Whether the record conforms.
    pub fn is_valid(&self) -> bool {
        self.passed
    }

    /// One entry per rule tried on each failing field. Empty when valid.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Names of the failing fields, in evaluation order, without repeats.
    pub fn failed_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for d in &self.diagnostics {
            if names.last() != Some(&d.field.as_str()) {
                names.push(&d.field);
            }
        }
        names
    }

    /// The full diagnostic text, one line per diagnostic.
    pub fn message(&self) -> String {
        render_diagnostics(&self.diagnostics)
    }

    /// Turn a failing verdict into [`ValidationError::Rejected`].
    pub fn into_result(self) -> Result<Self, ValidationError> {
        if self.passed {
            Ok(self)
        } else {
            Err(ValidationError::Rejected {
                diagnostics: self.diagnostics,
            })
        }
    }
}

impl From<Verdict> for bool {
    fn from(verdict: Verdict) -> bool {
        verdict.passed
    }
}

impl Schema {
    /// Validate a record. Never fails; inspect the verdict for the outcome.
    pub fn validate(&self, record: &Record) -> Verdict {
        let mut passed = true;
        let mut diagnostics = Vec::new();

        for spec in self.fields() {
            let value = record.get(spec.name());
            if spec.matches(value) {
                continue;
            }

            passed = false;
            let observed = value.map_or_else(|| FieldValue::Null.render(), FieldValue::render);
            tracing::trace!(field = spec.name(), observed = %observed, "field matched no rule");
            diagnostics.extend(
                spec.rules()
                    .iter()
                    .map(|rule| Diagnostic::new(spec.name(), observed.clone(), rule.to_string())),
            );
        }

        Verdict {
            passed,
            diagnostics,
        }
    }

    /// Validate a record, optionally turning failure into an error.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Rejected` when `raise_on_failure` is set
    /// and the record does not conform.
    pub fn validate_with(
        &self,
        record: &Record,
        raise_on_failure: bool,
    ) -> Result<Verdict, ValidationError> {
        let verdict = self.validate(record);
        if raise_on_failure {
            verdict.into_result()
        } else {
            Ok(verdict)
        }
    }

    /// Validate a record, failing loudly on a non-conforming record.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Rejected` carrying every diagnostic.
    pub fn validate_strict(&self, record: &Record) -> Result<Verdict, ValidationError> {
        self.validate_with(record, true)
    }

    /// Validate a JSON document holding one record.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotARecord` if the document is not an object.
    pub fn validate_json(&self, document: &Value) -> Result<Verdict, ValidationError> {
        let record = Record::try_from(document.clone())?;
        Ok(self.validate(&record))
    }

    /// Boolean shorthand for [`Schema::validate`].
    pub fn is_valid(&self, record: &Record) -> bool {
        self.validate(record).is_valid()
    }

    /// The schema as a plain predicate, e.g. for `Iterator::filter`.
    pub fn as_predicate(&self) -> impl Fn(&Record) -> bool + '_ {
        move |record| self.is_valid(record)
    }
}
