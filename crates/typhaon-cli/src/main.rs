//! # typhaon CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use typhaon_cli::check::{run_check_schema, CheckSchemaArgs};
use typhaon_cli::validate::{run_validate, ValidateArgs};
use typhaon_cli::EXIT_ERROR;

/// Typhaon: validate data records against a declarative schema.
#[derive(Parser, Debug)]
#[command(name = "typhaon", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate record files against a schema.
    Validate(ValidateArgs),

    /// Compile a schema and print the rules of each field.
    CheckSchema(CheckSchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "typhaon CLI starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::CheckSchema(args) => run_check_schema(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_validate_flags() {
        let cli = Cli::parse_from([
            "typhaon", "-vv", "validate", "--schema", "s.json", "--strict", "-q", "a.json", "b.jsonl",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.schema, "s.json");
                assert!(args.strict);
                assert!(args.quiet);
                assert_eq!(args.records.len(), 2);
            }
            other => panic!("expected validate, got {other:?}"),
        }
    }

    #[test]
    fn validate_requires_records() {
        assert!(Cli::try_parse_from(["typhaon", "validate", "--schema", "s.json"]).is_err());
    }

    #[test]
    fn parses_check_schema() {
        let cli = Cli::parse_from(["typhaon", "check-schema", "s.yaml"]);
        assert!(matches!(cli.command, Commands::CheckSchema(ref a) if a.schema == "s.yaml"));
    }
}
