//! # typhaon-schema — Schema Compilation & Record Evaluation
//!
//! Compiles a declarative schema definition into an immutable rule table
//! and checks flat records against it.
//!
//! ## Rule Compiler (`compile`)
//!
//! [`Schema::compile`] reads a definition of the form
//! `{"fields": [{"name": ..., "type": ...}, ...]}` and builds, for every
//! field, one [`FieldRule`] per declared type alternative. Compilation fails
//! with [`SchemaError`] on an empty schema, an unknown type, a malformed
//! entry, or a bad `format` pattern.
//!
//! ## Record Evaluator (`evaluate`)
//!
//! [`Schema::validate`] checks every schema field against a [`Record`] and
//! returns a [`Verdict`]: pass/fail plus one [`Diagnostic`] per rule tried on
//! each failing field. [`Schema::validate_with`] and
//! [`Schema::validate_strict`] turn failure into [`ValidationError`].
//!
//! ## Schema Sources (`loader`)
//!
//! [`SchemaSource`] resolves a parsed value, JSON/YAML text, or a file path
//! into the definition value; [`Schema::load`] resolves and compiles.
//!
//! ## Crate Policy
//!
//! - Depends only on `typhaon-core` internally.
//! - Compiled schemas are immutable and `Send + Sync`.
//! - A non-conforming record is a verdict, not an error, unless the caller
//!   opts in.

pub mod compile;
pub mod definition;
pub mod evaluate;
pub mod loader;
pub mod rule;

pub use compile::{FieldSpec, Schema};
pub use definition::{FieldDefinition, SchemaDefinition, TypeDescriptor};
pub use evaluate::Verdict;
pub use loader::{is_yaml_path, yaml_to_json_value, SchemaSource};
pub use rule::{FieldRule, RuleKind, RuleParams, BOOLEAN_SYMBOLS, DEFAULT_MAX, DEFAULT_MIN};

pub use typhaon_core::{Diagnostic, FieldValue, Record, SchemaError, ValidationError};
