//! # typhaon-core — Foundational Types for Typhaon
//!
//! This crate defines the value model every other crate in the workspace
//! builds on. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed value enum.** [`FieldValue`] enumerates every kind of value a
//!    flat record field may hold, including structured dates and times. Rules
//!    match on it exhaustively; there is no runtime type inspection.
//!
//! 2. **Explicit falsiness.** The "empty value" notion used by the `null`
//!    and `enum` rules is spelled out per value kind in [`value`] and
//!    implemented once in [`FieldValue::is_truthy`].
//!
//! 3. **Diagnostics are values.** A [`Diagnostic`] is built per evaluation
//!    and returned to the caller. Nothing in this crate holds mutable state.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `typhaon-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod diagnostic;
pub mod error;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use diagnostic::{render_diagnostics, Diagnostic};
pub use error::{SchemaError, ValidationError};
pub use value::{is_falsy, json_type_name, FieldValue, Record};
