//! # Schema Definitions
//!
//! The declarative, pre-compilation form of a schema, as it arrives from
//! JSON or YAML:
//!
//! ```json
//! {
//!   "name": "Table Name",
//!   "fields": [
//!     {"name": "id", "type": "string"},
//!     {"name": "country", "type": ["string", "nullable"]},
//!     {"name": "score", "type": "numeric", "min": 0, "max": 100}
//!   ]
//! }
//! ```
//!
//! Keys the validator does not use (`name` at the top level, `description`
//! on a field, ...) are ignored so richer schema documents load unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use typhaon_core::{json_type_name, SchemaError};

use crate::rule::{RuleKind, RuleParams};

/// A complete schema definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Field entries. Missing `fields` deserializes as empty and is rejected
    /// by the compiler.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl SchemaDefinition {
    /// Create an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field entry.
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Read a definition out of an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Malformed` if the value is not an object or a
    /// field entry does not have the expected shape.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        if !value.is_object() {
            return Err(SchemaError::malformed(format!(
                "schema definition must be an object, found {}",
                json_type_name(value)
            )));
        }
        SchemaDefinition::deserialize(value).map_err(|e| SchemaError::malformed(e.to_string()))
    }
}

/// One field entry of a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name looked up in each record.
    pub name: String,
    /// One kind name, or several alternatives.
    #[serde(rename = "type")]
    pub types: TypeDescriptor,
    /// Allowed values for `enum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<String>>,
    /// Inclusive lower bound for `numeric`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound for `numeric`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression for `string`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldDefinition {
    /// A field with a single kind.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::with_types(name, TypeDescriptor::One(kind.into()))
    }

    /// A field with an explicit descriptor.
    pub fn with_types(name: impl Into<String>, types: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            types,
            symbols: None,
            min: None,
            max: None,
            format: None,
        }
    }

    /// A field accepting any of several kinds.
    pub fn any_of<I, S>(name: impl Into<String>, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_types(
            name,
            TypeDescriptor::Many(kinds.into_iter().map(Into::into).collect()),
        )
    }

    pub fn symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn format(mut self, pattern: impl Into<String>) -> Self {
        self.format = Some(pattern.into());
        self
    }

    /// The parameters threaded to every rule of this field.
    pub fn params(&self) -> RuleParams {
        RuleParams {
            symbols: self.symbols.clone(),
            min: self.min,
            max: self.max,
            format: self.format.clone(),
        }
    }
}

/// The `type` of a field entry: a bare kind name or a list of alternatives.
///
/// A null in place of a kind name (YAML's unquoted `null`) names the `null`
/// kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDescriptor {
    One(#[serde(deserialize_with = "kind_or_null")] String),
    Many(#[serde(deserialize_with = "kinds_or_null")] Vec<String>),
}

fn null_kind(name: Option<String>) -> String {
    name.unwrap_or_else(|| RuleKind::Null.name().to_string())
}

fn kind_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(null_kind)
}

fn kinds_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let names = Vec::<Option<String>>::deserialize(deserializer)?;
    Ok(names.into_iter().map(null_kind).collect())
}

impl TypeDescriptor {
    /// Kind names in declaration order. A bare name is a one-element list.
    pub fn names(&self) -> &[String] {
        match self {
            TypeDescriptor::One(name) => std::slice::from_ref(name),
            TypeDescriptor::Many(names) => names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_and_list_descriptors() {
        let def = SchemaDefinition::from_value(&json!({
            "fields": [
                {"name": "a", "type": "string"},
                {"name": "b", "type": ["string", "null"]}
            ]
        }))
        .unwrap();
        assert_eq!(def.fields[0].types.names(), ["string"]);
        assert_eq!(def.fields[1].types.names(), ["string", "null"]);
    }

    #[test]
    fn test_null_in_type_list_names_null_kind() {
        let def = SchemaDefinition::from_value(&json!({
            "fields": [
                {"name": "a", "type": ["string", null]},
                {"name": "b", "type": null}
            ]
        }))
        .unwrap();
        assert_eq!(def.fields[0].types.names(), ["string", "null"]);
        assert_eq!(def.fields[1].types.names(), ["null"]);
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let def = SchemaDefinition::from_value(&json!({
            "table": "this is a test schema",
            "fields": [{
                "name": "string_field",
                "type": "string",
                "description": "character array",
                "last_updated": "2021-01-01"
            }]
        }))
        .unwrap();
        assert_eq!(def.fields.len(), 1);
        assert_eq!(def.fields[0].name, "string_field");
    }

    #[test]
    fn test_missing_fields_key_is_empty() {
        let def = SchemaDefinition::from_value(&json!({"name": "string"})).unwrap();
        assert!(def.fields.is_empty());
    }

    #[test]
    fn test_constraints_are_read() {
        let def = SchemaDefinition::from_value(&json!({
            "fields": [{
                "name": "score", "type": "numeric", "min": 0, "max": 99.5,
                "symbols": ["x"], "format": "^a"
            }]
        }))
        .unwrap();
        let params = def.fields[0].params();
        assert_eq!(params.min, Some(0.0));
        assert_eq!(params.max, Some(99.5));
        assert_eq!(params.symbols, Some(vec!["x".to_string()]));
        assert_eq!(params.format.as_deref(), Some("^a"));
    }

    #[test]
    fn test_shape_errors_are_malformed() {
        for bad in [
            json!([]),
            json!({"fields": [{"type": "string"}]}),
            json!({"fields": [{"name": "a"}]}),
            json!({"fields": [{"name": "a", "type": 5}]}),
            json!({"fields": [{"name": "a", "type": "numeric", "min": "low"}]}),
            json!({"fields": "a,b"}),
        ] {
            let err = SchemaDefinition::from_value(&bad).unwrap_err();
            assert!(
                matches!(err, SchemaError::Malformed { .. }),
                "expected Malformed for {bad}, got {err}"
            );
        }
    }

    #[test]
    fn test_builder_matches_parsed_form() {
        let built = SchemaDefinition::new()
            .field(FieldDefinition::new("colour", "enum").symbols(["RED", "GREEN"]))
            .field(FieldDefinition::any_of("note", ["string", "null"]));
        let parsed = SchemaDefinition::from_value(&json!({
            "fields": [
                {"name": "colour", "type": "enum", "symbols": ["RED", "GREEN"]},
                {"name": "note", "type": ["string", "null"]}
            ]
        }))
        .unwrap();
        assert_eq!(built, parsed);
    }
}
