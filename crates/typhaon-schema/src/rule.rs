//! # Field Rules
//!
//! A [`FieldRule`] is one executable predicate over a single record value.
//! The set of rule kinds is closed: every kind is a variant of the enum,
//! carrying only the parameters it consumes, and [`FieldRule::matches`] is
//! the single dispatch point.
//!
//! ## Matching Policy
//!
//! - `numeric` converts rather than checks type identity: `"100"` is a
//!   number, `"one hundred"` is not.
//! - `boolean` is case-insensitive and accepts the textual spellings in
//!   [`BOOLEAN_SYMBOLS`], not just native booleans.
//! - `date` accepts structured date/time values and ISO-8601 text. Text that
//!   does not parse is a mismatch.
//! - `enum` never matches a falsy value, even one listed in its symbols.
//! - `list` checks container-ness only; elements are not inspected.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use typhaon_core::{is_falsy, FieldValue};

/// Lower-cased spellings accepted by the `boolean` rule.
pub const BOOLEAN_SYMBOLS: [&str; 8] = ["true", "false", "on", "off", "yes", "no", "0", "1"];

/// Default lower bound of the `numeric` rule (64-bit signed minimum).
pub const DEFAULT_MIN: f64 = i64::MIN as f64;

/// Default upper bound of the `numeric` rule (64-bit signed maximum).
pub const DEFAULT_MAX: f64 = i64::MAX as f64;

/// Naive date-time layouts accepted as ISO-8601 by the `date` rule.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying date-time layouts accepted in addition to RFC 3339.
const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// The recognized rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    String,
    Numeric,
    Boolean,
    Date,
    Enum,
    Null,
    List,
    Other,
}

impl RuleKind {
    /// Every kind, in documentation order.
    pub const ALL: [RuleKind; 8] = [
        RuleKind::String,
        RuleKind::Numeric,
        RuleKind::Boolean,
        RuleKind::Date,
        RuleKind::Enum,
        RuleKind::Null,
        RuleKind::List,
        RuleKind::Other,
    ];

    /// Resolve a kind name as written in a schema definition.
    ///
    /// `nullable` is an alias of `null`, `array` an alias of `list`.
    /// Names are case-sensitive.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(RuleKind::String),
            "numeric" => Some(RuleKind::Numeric),
            "boolean" => Some(RuleKind::Boolean),
            "date" => Some(RuleKind::Date),
            "enum" => Some(RuleKind::Enum),
            "null" | "nullable" => Some(RuleKind::Null),
            "list" | "array" => Some(RuleKind::List),
            "other" => Some(RuleKind::Other),
            _ => None,
        }
    }

    /// Canonical name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::String => "string",
            RuleKind::Numeric => "numeric",
            RuleKind::Boolean => "boolean",
            RuleKind::Date => "date",
            RuleKind::Enum => "enum",
            RuleKind::Null => "null",
            RuleKind::List => "list",
            RuleKind::Other => "other",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Construction parameters shared by every rule of one field.
///
/// The compiler hands the same parameters to each rule constructor; a kind
/// ignores the parameters it does not use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleParams {
    pub symbols: Option<Vec<String>>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub format: Option<String>,
}

/// A compiled `format` pattern, matched from the first character of the text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    /// The pattern as written in the definition.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern matches a prefix of `text` (the leftmost match
    /// starts at offset zero). The pattern need not consume the whole text.
    pub fn matches_start(&self, text: &str) -> bool {
        self.regex.find(text).is_some_and(|m| m.start() == 0)
    }
}

/// One executable predicate for one rule kind.
#[derive(Debug, Clone)]
pub enum FieldRule {
    String { pattern: Option<Pattern> },
    Numeric { min: Option<f64>, max: Option<f64> },
    Boolean,
    Date,
    Enum { symbols: Vec<String> },
    Null,
    List,
    Other,
}

impl FieldRule {
    /// Instantiate a rule of `kind` from the field's parameters.
    ///
    /// # Errors
    ///
    /// Returns the regex error if a `string` rule's `format` does not compile.
    pub fn build(kind: RuleKind, params: &RuleParams) -> Result<Self, regex::Error> {
        let rule = match kind {
            RuleKind::String => FieldRule::String {
                pattern: params
                    .format
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .map(Pattern::new)
                    .transpose()?,
            },
            RuleKind::Numeric => FieldRule::Numeric {
                // An explicit bound equal to the default is no bound at all.
                min: params.min.filter(|m| *m != DEFAULT_MIN),
                max: params.max.filter(|m| *m != DEFAULT_MAX),
            },
            RuleKind::Boolean => FieldRule::Boolean,
            RuleKind::Date => FieldRule::Date,
            RuleKind::Enum => FieldRule::Enum {
                symbols: params.symbols.clone().unwrap_or_default(),
            },
            RuleKind::Null => FieldRule::Null,
            RuleKind::List => FieldRule::List,
            RuleKind::Other => FieldRule::Other,
        };
        Ok(rule)
    }

    /// The kind this rule was built from.
    pub fn kind(&self) -> RuleKind {
        match self {
            FieldRule::String { .. } => RuleKind::String,
            FieldRule::Numeric { .. } => RuleKind::Numeric,
            FieldRule::Boolean => RuleKind::Boolean,
            FieldRule::Date => RuleKind::Date,
            FieldRule::Enum { .. } => RuleKind::Enum,
            FieldRule::Null => RuleKind::Null,
            FieldRule::List => RuleKind::List,
            FieldRule::Other => RuleKind::Other,
        }
    }

    /// Evaluate the rule. `None` is an absent field and behaves like `Null`.
    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        match self {
            FieldRule::Other => true,
            FieldRule::Null => is_falsy(value),
            FieldRule::String { pattern } => match value.and_then(FieldValue::as_text) {
                Some(text) => pattern.as_ref().map_or(true, |p| p.matches_start(text)),
                None => false,
            },
            FieldRule::Numeric { min, max } => value
                .and_then(numeric_value)
                .is_some_and(|n| n >= min.unwrap_or(DEFAULT_MIN) && n <= max.unwrap_or(DEFAULT_MAX)),
            FieldRule::Boolean => value.is_some_and(|v| {
                let lowered = v.render().to_lowercase();
                BOOLEAN_SYMBOLS.contains(&lowered.as_str())
            }),
            FieldRule::Date => value.is_some_and(|v| {
                v.is_temporal() || v.as_text().is_some_and(parses_as_iso8601)
            }),
            FieldRule::Enum { symbols } => value.is_some_and(|v| {
                v.is_truthy()
                    && v.as_text()
                        .is_some_and(|text| symbols.iter().any(|s| s == text))
            }),
            FieldRule::List => matches!(value, Some(FieldValue::List(_))),
        }
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRule::String { pattern: None } => write!(f, "string"),
            FieldRule::String { pattern: Some(p) } => write!(f, "string ({})", p.as_str()),
            FieldRule::Numeric { min, max } => match (min, max) {
                (None, None) => write!(f, "numeric"),
                (Some(lo), Some(hi)) => {
                    write!(f, "numeric ({} - {})", format_bound(*lo), format_bound(*hi))
                }
                (Some(lo), None) => write!(f, "numeric ({} - infinity)", format_bound(*lo)),
                (None, Some(hi)) => write!(f, "numeric (infinity - {})", format_bound(*hi)),
            },
            FieldRule::Enum { symbols } => write!(f, "enum ({})", symbols.join(", ")),
            other => f.write_str(other.kind().name()),
        }
    }
}

/// Lossless conversion to `f64`, the test applied by the `numeric` rule.
fn numeric_value(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Integer(n) => Some(*n as f64),
        FieldValue::Float(f) => Some(*f),
        FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Whether `text` is an ISO-8601 date or date-time.
///
/// Surrounding whitespace is not tolerated. A trailing `Z` is accepted on
/// any date-time layout.
fn parses_as_iso8601(text: &str) -> bool {
    if text.trim().len() != text.len() {
        return false;
    }
    if let Some(local) = text.strip_suffix('Z').filter(|local| local.len() > 10) {
        return parses_as_naive(local);
    }
    DateTime::parse_from_rfc3339(text).is_ok()
        || OFFSET_DATETIME_FORMATS
            .iter()
            .any(|fmt| DateTime::parse_from_str(text, fmt).is_ok())
        || parses_as_naive(text)
}

fn parses_as_naive(text: &str) -> bool {
    let parses = |text: &str| {
        NAIVE_DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(text, fmt).is_ok())
    };
    // `YYYY-MM-DDTHH` carries no minutes.
    let hour_only = text.len() == 13 && matches!(text.as_bytes().get(10), Some(b'T' | b' '));
    parses(text)
        || (hour_only && parses(&format!("{text}:00")))
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || parses_as_basic_date(text)
}

/// `YYYYMMDD`.
fn parses_as_basic_date(text: &str) -> bool {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let part = |range: std::ops::Range<usize>| text.get(range).and_then(|s| s.parse::<u32>().ok());
    match (part(0..4), part(4..6), part(6..8)) {
        (Some(year), Some(month), Some(day)) => {
            NaiveDate::from_ymd_opt(year as i32, month, day).is_some()
        }
        _ => false,
    }
}

/// Integral bounds print without a fractional part.
fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e16 {
        format!("{bound:.0}")
    } else {
        bound.to_string()
    }
}
