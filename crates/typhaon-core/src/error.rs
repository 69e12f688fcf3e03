//! # Error Types — Structured Error Hierarchy
//!
//! Defines the two error families used throughout Typhaon. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - [`SchemaError`] is raised while loading or compiling a schema
//!   definition. It is always fatal: no partially compiled schema exists.
//! - [`ValidationError`] is raised while evaluating a record, and only when
//!   the caller opted in to failing loudly. A record that merely does not
//!   conform is otherwise reported through the returned verdict.
//! - A malformed value inside a record (wrong type, unparsable date,
//!   non-numeric text) is a rule mismatch, never an error.

use thiserror::Error;

use crate::diagnostic::{render_diagnostics, Diagnostic};

/// Error while loading or compiling a schema definition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The definition declares no fields, or has no `fields` key at all.
    #[error("invalid schema specification: the definition declares no fields")]
    Empty,

    /// A type descriptor names a rule kind outside the recognized set.
    #[error(
        "invalid type '{kind}' specified for field '{field}' - valid types are: \
         string, numeric, date, boolean, null, nullable, list, array, enum, other"
    )]
    UnknownType {
        /// Field whose descriptor referenced the kind.
        field: String,
        /// The unrecognized kind name.
        kind: String,
    },

    /// A `string` rule's `format` is not a valid regular expression.
    #[error("invalid format pattern for field '{field}' ({pattern}): {reason}")]
    InvalidPattern {
        /// Field that declared the pattern.
        field: String,
        /// The pattern as written in the definition.
        pattern: String,
        /// Compiler message from the regex engine.
        reason: String,
    },

    /// The definition is structurally wrong (missing `name`/`type`, wrong
    /// JSON types, empty type list).
    #[error("malformed schema definition: {reason}")]
    Malformed {
        /// What was wrong with the definition.
        reason: String,
    },

    /// The definition could not be read or parsed from its source.
    #[error("schema load error for '{source_name}': {reason}")]
    Load {
        /// File path or a short label for inline text.
        source_name: String,
        /// Reason the definition could not be loaded.
        reason: String,
    },
}

impl SchemaError {
    /// Shorthand for a [`SchemaError::Malformed`] with the given reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// Error while evaluating a record against a compiled schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The record failed and the caller asked for failures to be raised.
    #[error("record does not conform to schema:\n{}", render_diagnostics(.diagnostics))]
    Rejected {
        /// Every failed field/rule pair, in evaluation order.
        diagnostics: Vec<Diagnostic>,
    },

    /// The input handed to a JSON entry point was not an object.
    #[error("expected a record (JSON object), found {found}")]
    NotARecord {
        /// JSON type name of the value that was supplied.
        found: &'static str,
    },
}

impl ValidationError {
    /// The diagnostics carried by a rejection; empty for other variants.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            ValidationError::Rejected { diagnostics } => diagnostics,
            ValidationError::NotARecord { .. } => &[],
        }
    }
}
