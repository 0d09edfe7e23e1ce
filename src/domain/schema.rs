//! Fixed schema for evaluation payloads returned by the model.
//!
//! The schema is a static table rather than derived from the payload struct so
//! that the validator can walk it in a deterministic order and report the
//! first violation it meets.

use serde_json::Value;

/// Declared kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Boolean,
    String,
    /// Integer with an inclusive `[min, max]` range.
    Integer { min: i64, max: i64 },
    /// Ordered sequence whose elements must all be strings.
    StringList,
}

impl FieldKind {
    /// Human-readable name used in diagnostics.
    #[must_use]
    pub const fn expected(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Integer { .. } => "integer",
            Self::StringList => "array of strings",
        }
    }
}

/// One entry of the schema table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Lowest accepted completeness score.
pub const COMPLETENESS_MIN: i64 = 1;

/// Highest accepted completeness score.
pub const COMPLETENESS_MAX: i64 = 10;

/// Evaluation schema in check order.
pub const EVALUATION_SCHEMA: [FieldSpec; 8] = [
    FieldSpec::new("ambiguity_detected", FieldKind::Boolean),
    FieldSpec::new("ambiguity_details", FieldKind::String),
    FieldSpec::new("testable", FieldKind::Boolean),
    FieldSpec::new("testability_details", FieldKind::String),
    FieldSpec::new(
        "completeness_score",
        FieldKind::Integer {
            min: COMPLETENESS_MIN,
            max: COMPLETENESS_MAX,
        },
    ),
    FieldSpec::new("completeness_details", FieldKind::String),
    FieldSpec::new("issues", FieldKind::StringList),
    FieldSpec::new("suggestions", FieldKind::StringList),
];

/// Kind name of an arbitrary JSON value, as reported in diagnostics.
#[must_use]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
