//! # typhaon-cli — CLI Tool for Typhaon
//!
//! Provides the `typhaon` command-line interface over the schema compiler
//! and record evaluator.
//!
//! ## Subcommands
//!
//! - `typhaon validate` — Validate record files against a schema.
//! - `typhaon check-schema` — Compile a schema and print its rules.
//!
//! ```bash
//! typhaon validate --schema people.json people.jsonl
//! typhaon validate --schema '{"fields": [{"name": "id", "type": "string"}]}' rows.yaml
//! typhaon check-schema people.yaml
//! ```
//!
//! ## Exit Codes
//!
//! `0` every record passed, `1` at least one record failed, `2` operational
//! error (unreadable input, invalid schema).

pub mod check;
pub mod records;
pub mod validate;

use anyhow::{Context, Result};
use typhaon_schema::{Schema, SchemaSource};

/// Exit code when every record conforms.
pub const EXIT_OK: u8 = 0;
/// Exit code when at least one record fails validation.
pub const EXIT_INVALID: u8 = 1;
/// Exit code for operational errors.
pub const EXIT_ERROR: u8 = 2;

/// Load a schema from a command-line argument: a file path or inline text.
pub fn load_schema(arg: &str) -> Result<Schema> {
    let source = SchemaSource::from_arg(arg);
    let name = source.name();
    let schema = Schema::load(source).with_context(|| format!("failed to load schema {name}"))?;
    tracing::info!(source = %name, field_count = schema.field_count(), "loaded schema");
    Ok(schema)
}
