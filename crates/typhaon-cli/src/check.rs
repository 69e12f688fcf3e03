//! # Check-Schema Subcommand
//!
//! Compiles a schema without validating anything and prints each field with
//! the rules it will apply. A schema that fails to compile is an
//! operational error.

use anyhow::Result;
use clap::Args;
use typhaon_schema::Schema;

use crate::{load_schema, EXIT_OK};

/// Arguments for the `typhaon check-schema` subcommand.
#[derive(Args, Debug)]
pub struct CheckSchemaArgs {
    /// Schema definition: a JSON/YAML file path or inline JSON text.
    #[arg(value_name = "SCHEMA")]
    pub schema: String,
}

/// Execute the check-schema subcommand.
pub fn run_check_schema(args: &CheckSchemaArgs) -> Result<u8> {
    let schema = load_schema(&args.schema)?;
    for line in describe_schema(&schema) {
        println!("{line}");
    }
    Ok(EXIT_OK)
}

/// One header line, then `  <field>: <rules>` per field in name order.
pub fn describe_schema(schema: &Schema) -> Vec<String> {
    let mut lines = Vec::with_capacity(schema.field_count() + 1);
    lines.push(format!("Schema: {} field(s)", schema.field_count()));
    lines.extend(
        schema
            .fields()
            .map(|spec| format!("  {}: {}", spec.name(), spec.describe())),
    );
    lines
}
