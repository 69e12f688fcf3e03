//! # Record Files
//!
//! Reads the record files handed to `typhaon validate`. The format is picked
//! by extension:
//!
//! - `.jsonl` / `.ndjson`: one JSON object per non-blank line.
//! - `.yaml` / `.yml`: a mapping, or a sequence of mappings.
//! - anything else: a JSON object, or a JSON array of objects.
//!
//! Every entry must be an object. Anything else is an operational error,
//! not a validation failure.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use typhaon_core::Record;
use typhaon_schema::{is_yaml_path, yaml_to_json_value};

/// On-disk layout of a record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    JsonLines,
    Yaml,
}

impl RecordFormat {
    pub fn of(path: &Path) -> Self {
        if is_yaml_path(path) {
            return RecordFormat::Yaml;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") | Some("ndjson") => RecordFormat::JsonLines,
            _ => RecordFormat::Json,
        }
    }
}

/// A record together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecord {
    /// `path` for a single-record file, `path[n]` (1-based) otherwise.
    pub label: String,
    pub record: Record,
}

/// Read every record in a file.
pub fn load_records(path: &Path) -> Result<Vec<LoadedRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read record file {}", path.display()))?;
    let format = RecordFormat::of(path);
    tracing::debug!(path = %path.display(), ?format, "reading records");

    let (documents, single) = match format {
        RecordFormat::JsonLines => (parse_lines(&content, path)?, false),
        RecordFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML in {}", path.display()))?;
            let value = yaml_to_json_value(&yaml)
                .map_err(|reason| anyhow!("cannot convert {}: {reason}", path.display()))?;
            split_documents(value)
        }
        RecordFormat::Json => {
            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON in {}", path.display()))?;
            split_documents(value)
        }
    };

    documents
        .into_iter()
        .enumerate()
        .map(|(i, document)| {
            let label = if single {
                path.display().to_string()
            } else {
                format!("{}[{}]", path.display(), i + 1)
            };
            let record = Record::try_from(document).with_context(|| label.clone())?;
            Ok(LoadedRecord { label, record })
        })
        .collect()
}

fn parse_lines(content: &str, path: &Path) -> Result<Vec<Value>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("invalid JSON on line {} of {}", n + 1, path.display()))
        })
        .collect()
}

/// A top-level array is a list of records; anything else is one record.
fn split_documents(value: Value) -> (Vec<Value>, bool) {
    match value {
        Value::Array(items) => (items, false),
        other => (vec![other], true),
    }
}
