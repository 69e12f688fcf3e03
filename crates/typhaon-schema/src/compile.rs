//! # Rule Compiler
//!
//! Turns a [`SchemaDefinition`] into a [`Schema`]: for each field, an
//! ordered list of [`FieldRule`]s, one per declared type alternative.
//!
//! ## Invariants
//!
//! - A compiled schema has at least one field.
//! - Every kind name in every descriptor is recognized.
//! - Compilation is all-or-nothing: on any error no schema is produced.
//!
//! ## Thread Safety
//!
//! `Schema` holds no interior mutability and is `Send + Sync`. Compile
//! once and share it (by reference or `Arc`) across any number of
//! concurrent evaluations.

use std::collections::BTreeMap;

use serde_json::Value;
use typhaon_core::{FieldValue, SchemaError};

use crate::definition::{FieldDefinition, SchemaDefinition};
use crate::rule::{FieldRule, RuleKind};

/// A field name bound to its rule alternatives.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    rules: Vec<FieldRule>,
}

impl FieldSpec {
    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rule alternatives, in declaration order. Never empty.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// The field passes if any alternative matches.
    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        self.rules.iter().any(|rule| rule.matches(value))
    }

    /// Rule descriptions joined with ` | `, e.g. `string | null`.
    pub fn describe(&self) -> String {
        self.rules
            .iter()
            .map(FieldRule::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// An immutable, compiled schema.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: BTreeMap<String, FieldSpec>,
}

impl Schema {
    /// Compile an already-parsed definition value.
    ///
    /// # Errors
    ///
    /// - `SchemaError::Malformed` if the value does not have the definition shape.
    /// - `SchemaError::Empty` if it declares no fields.
    /// - `SchemaError::UnknownType` if a descriptor names an unrecognized kind.
    /// - `SchemaError::InvalidPattern` if a `format` is not a valid regex.
    pub fn compile(definition: &Value) -> Result<Self, SchemaError> {
        let definition = SchemaDefinition::from_value(definition)?;
        Self::from_definition(&definition)
    }

    /// Compile a typed definition.
    ///
    /// # Errors
    ///
    /// Same as [`Schema::compile`], minus the shape errors the type system
    /// already rules out.
    pub fn from_definition(definition: &SchemaDefinition) -> Result<Self, SchemaError> {
        if definition.fields.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut fields = BTreeMap::new();
        for entry in &definition.fields {
            let spec = compile_field(entry)?;
            if fields.insert(spec.name.clone(), spec).is_some() {
                tracing::warn!(field = %entry.name, "duplicate field in schema definition; later entry wins");
            }
        }

        tracing::debug!(field_count = fields.len(), "compiled schema");
        Ok(Self { fields })
    }

    /// Number of fields in the schema.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// All fields, in name order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    /// All field names, in name order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}

impl TryFrom<&Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Schema::compile(value)
    }
}

impl TryFrom<&SchemaDefinition> for Schema {
    type Error = SchemaError;

    fn try_from(definition: &SchemaDefinition) -> Result<Self, Self::Error> {
        Schema::from_definition(definition)
    }
}

/// Build the rule list for one field entry.
fn compile_field(entry: &FieldDefinition) -> Result<FieldSpec, SchemaError> {
    let names = entry.types.names();
    if names.is_empty() {
        return Err(SchemaError::malformed(format!(
            "field '{}' declares an empty type list",
            entry.name
        )));
    }

    let params = entry.params();
    let mut rules = Vec::with_capacity(names.len());
    for name in names {
        let kind = RuleKind::parse(name).ok_or_else(|| SchemaError::UnknownType {
            field: entry.name.clone(),
            kind: name.clone(),
        })?;
        let rule = FieldRule::build(kind, &params).map_err(|e| SchemaError::InvalidPattern {
            field: entry.name.clone(),
            pattern: params.format.clone().unwrap_or_default(),
            reason: e.to_string(),
        })?;
        rules.push(rule);
    }

    Ok(FieldSpec {
        name: entry.name.clone(),
        rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compile_every_kind() {
        let schema = Schema::compile(&json!({
            "fields": [
                {"name": "string_field",   "type": "string"},
                {"name": "integer_field",  "type": "numeric"},
                {"name": "boolean_field",  "type": "boolean"},
                {"name": "date_field",     "type": "date"},
                {"name": "other_field",    "type": "other"},
                {"name": "nullable_field", "type": "nullable"},
                {"name": "list_field",     "type": "array"},
                {"name": "enum_field",     "type": "enum", "symbols": ["RED", "GREEN", "BLUE"]}
            ]
        }))
        .unwrap();
        assert_eq!(schema.field_count(), 8);
        assert_eq!(schema.field("list_field").unwrap().rules()[0].kind(), RuleKind::List);
        assert_eq!(
            schema.field("enum_field").unwrap().describe(),
            "enum (RED, GREEN, BLUE)"
        );
    }

    #[test]
    fn test_alternatives_keep_declaration_order() {
        let schema = Schema::compile(&json!({
            "fields": [{"name": "multi", "type": ["string", "boolean", "null"]}]
        }))
        .unwrap();
        let kinds: Vec<RuleKind> = schema
            .field("multi")
            .unwrap()
            .rules()
            .iter()
            .map(FieldRule::kind)
            .collect();
        assert_eq!(kinds, [RuleKind::String, RuleKind::Boolean, RuleKind::Null]);
        assert_eq!(schema.field("multi").unwrap().describe(), "string | boolean | null");
    }

    #[test]
    fn test_params_thread_to_every_rule() {
        let schema = Schema::compile(&json!({
            "fields": [{"name": "n", "type": ["numeric", "string"], "min": 0, "max": 100, "format": "^[0-9]+$"}]
        }))
        .unwrap();
        let spec = schema.field("n").unwrap();
        assert_eq!(spec.rules()[0].to_string(), "numeric (0 - 100)");
        assert_eq!(spec.rules()[1].to_string(), "string (^[0-9]+$)");
    }

    #[test]
    fn test_empty_schema_rejected() {
        assert_eq!(Schema::compile(&json!({"fields": []})).unwrap_err(), SchemaError::Empty);
        assert_eq!(Schema::compile(&json!({"name": "string"})).unwrap_err(), SchemaError::Empty);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = Schema::compile(&json!({
            "fields": [
                {"name": "ok", "type": "string"},
                {"name": "bad", "type": ["string", "not_a_real_type"]}
            ]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownType {
                field: "bad".into(),
                kind: "not_a_real_type".into()
            }
        );
    }

    #[test]
    fn test_empty_type_list_rejected() {
        let err = Schema::compile(&json!({"fields": [{"name": "a", "type": []}]})).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { .. }));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = Schema::compile(&json!({
            "fields": [{"name": "code", "type": "string", "format": "([a-z]"}]
        }))
        .unwrap_err();
        match err {
            SchemaError::InvalidPattern { field, pattern, .. } => {
                assert_eq!(field, "code");
                assert_eq!(pattern, "([a-z]");
            }
            other => panic!("expected InvalidPattern, got {other}"),
        }
    }

    #[test]
    fn test_duplicate_field_later_entry_wins() {
        let schema = Schema::compile(&json!({
            "fields": [
                {"name": "a", "type": "string"},
                {"name": "a", "type": "numeric"}
            ]
        }))
        .unwrap();
        assert_eq!(schema.field_count(), 1);
        assert_eq!(schema.field("a").unwrap().rules()[0].kind(), RuleKind::Numeric);
    }

    #[test]
    fn test_field_names_sorted() {
        let schema = Schema::compile(&json!({
            "fields": [{"name": "b", "type": "other"}, {"name": "a", "type": "other"}]
        }))
        .unwrap();
        assert_eq!(schema.field_names(), ["a", "b"]);
    }

    #[test]
    fn test_schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }
}
