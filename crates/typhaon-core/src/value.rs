//! # Record Values — The Flat Record Model
//!
//! Defines [`FieldValue`], the closed set of values a record field may
//! carry, and [`Record`], a mapping from field name to value.
//!
//! ## Falsy Semantics
//!
//! The `null` and `enum` rules depend on whether a value is "empty". The
//! complete definition, per value kind:
//!
//! | Value                          | Falsy when            |
//! |--------------------------------|-----------------------|
//! | absent (field not in record)   | always                |
//! | `Null`                         | always                |
//! | `Bool`                         | `false`               |
//! | `Integer`                      | `0`                   |
//! | `Float`                        | `0.0` or `-0.0`       |
//! | `Text`                         | empty string          |
//! | `List`                         | no elements           |
//! | `Map`                          | no entries            |
//! | `DateTime` / `Date` / `Time`   | never                 |
//!
//! `Float(NaN)` is truthy: it is not equal to zero.
//!
//! ## String Form
//!
//! [`FieldValue::render`] produces the textual form used by the boolean
//! rule and in diagnostics. Integral floats always keep a fractional part
//! (`1.0`), so a float never renders the same as an integer.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::error::ValidationError;

/// A single value carried by a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicit null.
    Null,
    /// Native boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Structured date and time of day, without offset.
    DateTime(NaiveDateTime),
    /// Structured calendar date.
    Date(NaiveDate),
    /// Structured time of day.
    Time(NaiveTime),
    /// Sequence container. Elements are never type-checked.
    List(Vec<FieldValue>),
    /// Nested mapping. Only inspected for emptiness.
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Returns the type name for log and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Text(_) => "text",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::Date(_) => "date",
            FieldValue::Time(_) => "time",
            FieldValue::List(_) => "list",
            FieldValue::Map(_) => "map",
        }
    }

    /// Whether the value is truthy. See the module table for the rules.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Integer(n) => *n != 0,
            FieldValue::Float(f) => *f != 0.0,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::DateTime(_) | FieldValue::Date(_) | FieldValue::Time(_) => true,
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Map(entries) => !entries.is_empty(),
        }
    }

    /// Whether the value is already a structured date/time.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            FieldValue::DateTime(_) | FieldValue::Date(_) | FieldValue::Time(_)
        )
    }

    /// The text, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The string form of the value.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Null => "null".to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Float(f) => render_float(*f),
            FieldValue::Text(s) => s.clone(),
            FieldValue::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Time(t) => t.format("%H:%M:%S%.f").to_string(),
            FieldValue::List(_) | FieldValue::Map(_) => self.to_json().to_string(),
        }
    }

    /// Convert into the JSON value model. Date/time values become ISO-8601
    /// strings; non-finite floats become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Integer(n) => Value::from(*n),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::DateTime(_) | FieldValue::Date(_) | FieldValue::Time(_) => {
                Value::String(self.render())
            }
            FieldValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            FieldValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Whether a possibly-absent value is falsy. Absence counts as falsy.
pub fn is_falsy(value: Option<&FieldValue>) -> bool {
    value.map_or(true, |v| !v.is_truthy())
}

/// Integral finite floats keep a `.0` suffix so `1.0` never reads as `1`.
fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                // u64 beyond i64::MAX, or a real float.
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            Value::Object(map) => FieldValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Integer(i64::from(n))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(dt: NaiveDateTime) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

impl From<NaiveTime> for FieldValue {
    fn from(t: NaiveTime) -> Self {
        FieldValue::Time(t)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// A flat record: field name to value.
///
/// Field names not present in the record are "absent", which every rule
/// treats the same as an explicit `Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    /// Builder-style [`Record::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a field. `None` means the field is absent.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Whether the record carries the named field.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields carried.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert back into a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<serde_json::Map<String, Value>> for Record {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl TryFrom<Value> for Record {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Record::from(map)),
            other => Err(ValidationError::NotARecord {
                found: json_type_name(&other),
            }),
        }
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Integers are falsy exactly when zero.
        #[test]
        fn integer_truthiness_matches_zero(n in any::<i64>()) {
            prop_assert_eq!(FieldValue::Integer(n).is_truthy(), n != 0);
        }

        /// Text is falsy exactly when empty.
        #[test]
        fn text_truthiness_matches_emptiness(s in ".{0,16}") {
            prop_assert_eq!(FieldValue::from(s.as_str()).is_truthy(), !s.is_empty());
        }

        /// A float never renders like an integer.
        #[test]
        fn float_render_is_not_integer_like(f in -1.0e12f64..1.0e12f64) {
            let text = FieldValue::Float(f).render();
            prop_assert!(text.parse::<i64>().is_err(), "{} rendered as {}", f, text);
        }
    }
}
