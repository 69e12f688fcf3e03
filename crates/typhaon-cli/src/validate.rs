//! # Validate Subcommand
//!
//! Compiles one schema and checks every record in the given files against
//! it, printing `OK`/`FAIL` per record and a `passed/total` summary.
//!
//! With `--strict` the first non-conforming record is raised as a
//! rejection and the run stops there.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use typhaon_core::Diagnostic;
use typhaon_schema::Schema;

use crate::records::{load_records, LoadedRecord};
use crate::{load_schema, EXIT_INVALID, EXIT_OK};

/// Arguments for the `typhaon validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema definition: a JSON/YAML file path or inline JSON text.
    #[arg(long, short = 's', value_name = "SCHEMA")]
    pub schema: String,

    /// Stop at the first record that fails validation.
    #[arg(long)]
    pub strict: bool,

    /// Only print failures and the summary.
    #[arg(long, short)]
    pub quiet: bool,

    /// Record files (.json, .jsonl, .ndjson, .yaml, .yml).
    #[arg(value_name = "RECORDS", required = true)]
    pub records: Vec<PathBuf>,
}

/// Result of checking one record.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub label: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl RecordOutcome {
    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Outcomes of a validate run, in file and record order.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub outcomes: Vec<RecordOutcome>,
    /// Set when `--strict` stopped the run early.
    pub aborted: bool,
}

impl ValidationReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn exit_code(&self) -> u8 {
        if self.failed() > 0 {
            EXIT_INVALID
        } else {
            EXIT_OK
        }
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every record passes, 1 when any fails.
/// Unreadable files and invalid schemas are returned as errors.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let schema = load_schema(&args.schema)?;
    let report = validate_files(&schema, &args.records, args.strict)?;

    for outcome in &report.outcomes {
        if outcome.passed() {
            if !args.quiet {
                println!("OK: {}", outcome.label);
            }
        } else {
            println!("FAIL: {}", outcome.label);
            for diagnostic in &outcome.diagnostics {
                println!("  {diagnostic}");
            }
        }
    }

    if report.aborted {
        println!("\nAborted at first failure (--strict).");
    }
    println!("Records: {}/{} passed", report.passed(), report.total());

    Ok(report.exit_code())
}

/// Validate every record in `paths`, reading each file in turn.
///
/// All files are read before anything is reported, so a bad file anywhere
/// fails the run without partial output.
pub fn validate_files(schema: &Schema, paths: &[PathBuf], strict: bool) -> Result<ValidationReport> {
    let mut loaded = Vec::new();
    for path in paths {
        loaded.extend(load_records(path)?);
    }
    tracing::info!(records = loaded.len(), files = paths.len(), "validating records");
    Ok(validate_records(schema, &loaded, strict))
}

/// Validate already-loaded records.
pub fn validate_records(schema: &Schema, records: &[LoadedRecord], strict: bool) -> ValidationReport {
    let mut report = ValidationReport::default();
    for loaded in records {
        match schema.validate_with(&loaded.record, strict) {
            Ok(verdict) => report.outcomes.push(RecordOutcome {
                label: loaded.label.clone(),
                diagnostics: verdict.diagnostics().to_vec(),
            }),
            Err(err) => {
                tracing::warn!(record = %loaded.label, "strict validation rejected record");
                report.outcomes.push(RecordOutcome {
                    label: loaded.label.clone(),
                    diagnostics: err.diagnostics().to_vec(),
                });
                report.aborted = true;
                break;
            }
        }
    }
    report
}
