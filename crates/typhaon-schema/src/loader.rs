//! # Schema Sources
//!
//! Resolves where a schema definition comes from into the parsed JSON value
//! the compiler consumes. This is plain I/O: no validation logic lives here.
//!
//! ## Formats
//!
//! - JSON text, or a file with any extension other than `.yaml`/`.yml`.
//! - YAML text, or a `.yaml`/`.yml` file. YAML is converted into the JSON
//!   value model before compilation.

use std::path::{Path, PathBuf};

use serde_json::Value;
use typhaon_core::SchemaError;

use crate::compile::Schema;

/// Label used in errors for inline definition text.
const INLINE_SOURCE: &str = "<inline>";

/// Where a schema definition comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaSource {
    /// Already parsed.
    Value(Value),
    /// Serialized JSON or YAML text.
    Text(String),
    /// A file holding the serialized form.
    Path(PathBuf),
}

impl SchemaSource {
    /// Interpret a command-line style argument: an existing file is a path,
    /// anything else is inline text.
    pub fn from_arg(arg: &str) -> Self {
        let path = Path::new(arg);
        if path.is_file() {
            SchemaSource::Path(path.to_path_buf())
        } else {
            SchemaSource::Text(arg.to_string())
        }
    }

    /// Short name of the source for logs and errors.
    pub fn name(&self) -> String {
        match self {
            SchemaSource::Value(_) => "<value>".to_string(),
            SchemaSource::Text(_) => INLINE_SOURCE.to_string(),
            SchemaSource::Path(path) => path.display().to_string(),
        }
    }

    /// Produce the parsed definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Load` if a file cannot be read or the text is
    /// neither valid JSON nor a YAML mapping.
    pub fn resolve(self) -> Result<Value, SchemaError> {
        tracing::debug!(source = %self.name(), "resolving schema definition");
        match self {
            SchemaSource::Value(value) => Ok(value),
            SchemaSource::Text(text) => parse_text(&text, INLINE_SOURCE),
            SchemaSource::Path(path) => {
                let name = path.display().to_string();
                let content = std::fs::read_to_string(&path).map_err(|e| SchemaError::Load {
                    source_name: name.clone(),
                    reason: format!("cannot read file: {e}"),
                })?;
                if is_yaml_path(&path) {
                    parse_yaml(&content, &name)
                } else {
                    serde_json::from_str(&content).map_err(|e| SchemaError::Load {
                        source_name: name,
                        reason: format!("invalid JSON: {e}"),
                    })
                }
            }
        }
    }
}

impl From<Value> for SchemaSource {
    fn from(value: Value) -> Self {
        SchemaSource::Value(value)
    }
}

impl From<PathBuf> for SchemaSource {
    fn from(path: PathBuf) -> Self {
        SchemaSource::Path(path)
    }
}

impl From<&Path> for SchemaSource {
    fn from(path: &Path) -> Self {
        SchemaSource::Path(path.to_path_buf())
    }
}

impl Schema {
    /// Resolve a source and compile it.
    ///
    /// # Errors
    ///
    /// Returns any load error from [`SchemaSource::resolve`] or compile error
    /// from [`Schema::compile`].
    pub fn load(source: impl Into<SchemaSource>) -> Result<Self, SchemaError> {
        let definition = source.into().resolve()?;
        Schema::compile(&definition)
    }

    /// Compile from serialized JSON or YAML text.
    ///
    /// # Errors
    ///
    /// Same as [`Schema::load`].
    pub fn from_text(text: &str) -> Result<Self, SchemaError> {
        Schema::load(SchemaSource::Text(text.to_string()))
    }
}

/// Whether the file extension selects YAML.
pub fn is_yaml_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// JSON first; YAML only if it yields a mapping, since almost any text is
/// a valid YAML scalar.
fn parse_text(text: &str, source_name: &str) -> Result<Value, SchemaError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(json_err) => match serde_yaml::from_str::<serde_yaml::Value>(text) {
            Ok(yaml @ serde_yaml::Value::Mapping(_)) => {
                yaml_to_json_value(&yaml).map_err(|reason| SchemaError::Load {
                    source_name: source_name.to_string(),
                    reason,
                })
            }
            _ => Err(SchemaError::Load {
                source_name: source_name.to_string(),
                reason: format!("invalid JSON: {json_err}"),
            }),
        },
    }
}

fn parse_yaml(text: &str, source_name: &str) -> Result<Value, SchemaError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| SchemaError::Load {
        source_name: source_name.to_string(),
        reason: format!("invalid YAML: {e}"),
    })?;
    yaml_to_json_value(&yaml).map_err(|reason| SchemaError::Load {
        source_name: source_name.to_string(),
        reason: format!("YAML-to-JSON conversion failed: {reason}"),
    })
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Schema and record documents only use the JSON-compatible subset of
/// YAML. Tags are dropped; non-string scalar keys are stringified.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
