//! Response schema validation.
//!
//! Checks an untyped JSON value against [`EVALUATION_SCHEMA`] and produces a
//! typed [`EvaluationPayload`]. Checks run in a fixed order and stop at the
//! first violation:
//!
//! 1. the value is an object
//! 2. every schema field is present (schema order)
//! 3. no field outside the schema is present (document order)
//! 4. each field has the declared kind, or a lossless coercion to it

use serde_json::Value;

use crate::domain::schema::{value_kind, FieldKind, FieldSpec, EVALUATION_SCHEMA};
use crate::domain::EvaluationPayload;
use crate::error::SchemaError;

/// Validate `raw` against the evaluation schema.
///
/// Pure function: `raw` is never modified and no I/O is performed.
///
/// # Errors
///
/// Returns the first [`SchemaError`] encountered.
pub fn validate(raw: &Value) -> Result<EvaluationPayload, SchemaError> {
    ResponseValidator::new().validate(raw)
}

/// Schema-driven validator for model responses.
#[derive(Debug, Clone, Copy)]
pub struct ResponseValidator {
    schema: &'static [FieldSpec],
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Field value after kind checking and coercion.
enum Checked {
    Bool(bool),
    Str(String),
    Int(i64),
    List(Vec<String>),
}

/// Outcome of reading a value as a whole number.
enum Integral {
    Exact(i64),
    TooLarge,
    TooSmall,
}

impl ResponseValidator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            schema: &EVALUATION_SCHEMA,
        }
    }

    /// Validate `raw` and return the typed payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] encountered.
    pub fn validate(&self, raw: &Value) -> Result<EvaluationPayload, SchemaError> {
        let object = raw.as_object().ok_or(SchemaError::NotAnObject {
            actual: value_kind(raw),
        })?;

        for spec in self.schema {
            if !object.contains_key(spec.name) {
                return Err(SchemaError::MissingField { field: spec.name });
            }
        }

        if let Some(extra) = object
            .keys()
            .find(|key| !self.schema.iter().any(|spec| spec.name == key.as_str()))
        {
            return Err(SchemaError::UnexpectedField {
                field: extra.clone(),
            });
        }

        let mut payload = EvaluationPayload::default();
        for spec in self.schema {
            let checked = check_field(spec, &object[spec.name])?;
            payload.set(spec.name, checked);
        }
        Ok(payload)
    }
}

fn check_field(spec: &FieldSpec, value: &Value) -> Result<Checked, SchemaError> {
    let wrong_kind = || SchemaError::WrongKind {
        field: spec.name,
        expected: spec.kind.expected(),
        actual: value_kind(value),
    };

    match spec.kind {
        FieldKind::Boolean => coerce_bool(value).map(Checked::Bool).ok_or_else(wrong_kind),
        FieldKind::String => value
            .as_str()
            .map(|s| Checked::Str(s.to_string()))
            .ok_or_else(wrong_kind),
        FieldKind::Integer { min, max } => {
            let below = |actual: String| SchemaError::BelowMinimum {
                field: spec.name,
                min,
                actual,
            };
            let above = |actual: String| SchemaError::AboveMaximum {
                field: spec.name,
                max,
                actual,
            };
            match coerce_int(value).ok_or_else(wrong_kind)? {
                Integral::Exact(n) if n < min => Err(below(n.to_string())),
                Integral::Exact(n) if n > max => Err(above(n.to_string())),
                Integral::Exact(n) => Ok(Checked::Int(n)),
                Integral::TooSmall => Err(below(literal(value))),
                Integral::TooLarge => Err(above(literal(value))),
            }
        }
        FieldKind::StringList => {
            let items = value.as_array().ok_or_else(wrong_kind)?;
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    item.as_str()
                        .map(ToOwned::to_owned)
                        .ok_or(SchemaError::WrongItemKind {
                            field: spec.name,
                            index,
                            actual: value_kind(item),
                        })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Checked::List)
        }
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
            "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_int(value: &Value) -> Option<Integral> {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Some(Integral::Exact(i)),
            (None, Some(_)) => Some(Integral::TooLarge),
            (None, None) => n.as_f64().and_then(integral_float),
        },
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => Some(Integral::Exact(i)),
                // Whole numbers outside i64 are bound violations, not kind errors.
                Err(_) => s.parse::<i128>().ok().map(|i| {
                    if i > 0 {
                        Integral::TooLarge
                    } else {
                        Integral::TooSmall
                    }
                }),
            }
        }
        _ => None,
    }
}

fn integral_float(f: f64) -> Option<Integral> {
    // 2^63, the first float above i64::MAX.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    Some(if f >= LIMIT {
        Integral::TooLarge
    } else if f < -LIMIT {
        Integral::TooSmall
    } else {
        Integral::Exact(f as i64)
    })
}

/// The value as written, for bound diagnostics.
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_owned(),
        other => other.to_string(),
    }
}

impl EvaluationPayload {
    fn set(&mut self, field: &str, value: Checked) {
        match (field, value) {
            ("ambiguity_detected", Checked::Bool(b)) => self.ambiguity_detected = b,
            ("ambiguity_details", Checked::Str(s)) => self.ambiguity_details = s,
            ("testable", Checked::Bool(b)) => self.testable = b,
            ("testability_details", Checked::Str(s)) => self.testability_details = s,
            ("completeness_score", Checked::Int(n)) => self.completeness_score = n,
            ("completeness_details", Checked::Str(s)) => self.completeness_details = s,
            ("issues", Checked::List(items)) => self.issues = items,
            ("suggestions", Checked::List(items)) => self.suggestions = items,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::config::valid_payload;
    use serde_json::json;

    fn with(field: &str, value: Value) -> Value {
        let mut payload = valid_payload();
        payload[field] = value;
        payload
    }

    fn without(field: &str) -> Value {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove(field);
        payload
    }

    #[test]
    fn accepts_valid_payload() {
        let payload = validate(&valid_payload()).unwrap();
        assert!(payload.ambiguity_detected);
        assert_eq!(payload.completeness_score, 2);
        assert_eq!(payload.issues, vec!["Vague performance term".to_string()]);
    }

    #[test]
    fn rejects_each_missing_field_by_name() {
        for spec in EVALUATION_SCHEMA {
            let err = validate(&without(spec.name)).unwrap_err();
            assert_eq!(err, SchemaError::MissingField { field: spec.name });
            assert!(err.to_string().contains(spec.name));
        }
    }

    #[test]
    fn reports_first_missing_field_in_schema_order() {
        let err = validate(&json!({ "issues": [], "testable": true })).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: ambiguity_detected");
    }

    #[test]
    fn rejects_non_object() {
        let err = validate(&json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(err, SchemaError::NotAnObject { actual: "array" });
    }

    #[test]
    fn rejects_unknown_field() {
        let err = validate(&with("confidence", json!(0.9))).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnexpectedField {
                field: "confidence".into()
            }
        );
    }

    #[test]
    fn score_bounds_are_inclusive() {
        assert_eq!(validate(&with("completeness_score", json!(1))).unwrap().completeness_score, 1);
        assert_eq!(validate(&with("completeness_score", json!(10))).unwrap().completeness_score, 10);

        let low = validate(&with("completeness_score", json!(0))).unwrap_err();
        assert_eq!(low.to_string(), "Field 'completeness_score' must be >= 1, got 0");

        let high = validate(&with("completeness_score", json!(11))).unwrap_err();
        assert_eq!(high.to_string(), "Field 'completeness_score' must be <= 10, got 11");
    }

    #[test]
    fn coerces_numeric_strings_and_whole_floats_for_score() {
        assert_eq!(validate(&with("completeness_score", json!("7"))).unwrap().completeness_score, 7);
        assert_eq!(validate(&with("completeness_score", json!(8.0))).unwrap().completeness_score, 8);
    }

    #[test]
    fn rejects_uncoercible_score() {
        let err = validate(&with("completeness_score", json!(7.5))).unwrap_err();
        assert_eq!(err.to_string(), "Field 'completeness_score' must be integer, got number");

        let err = validate(&with("completeness_score", json!("seven"))).unwrap_err();
        assert_eq!(err.to_string(), "Field 'completeness_score' must be integer, got string");
    }

    #[test]
    fn coerces_boolean_spellings() {
        assert!(validate(&with("testable", json!("yes"))).unwrap().testable);
        assert!(!validate(&with("testable", json!(0))).unwrap().testable);
        assert!(validate(&with("testable", json!(" TRUE "))).unwrap().testable);

        let err = validate(&with("testable", json!("maybe"))).unwrap_err();
        assert_eq!(err.to_string(), "Field 'testable' must be boolean, got string");
        let err = validate(&with("testable", json!(null))).unwrap_err();
        assert_eq!(err.to_string(), "Field 'testable' must be boolean, got null");
    }

    #[test]
    fn string_fields_are_strict() {
        let err = validate(&with("ambiguity_details", json!(42))).unwrap_err();
        assert_eq!(
            err,
            SchemaError::WrongKind {
                field: "ambiguity_details",
                expected: "string",
                actual: "integer"
            }
        );
    }

    #[test]
    fn list_items_must_be_strings() {
        let err = validate(&with("issues", json!(["ok", "fine", 3]))).unwrap_err();
        assert_eq!(err.to_string(), "Field 'issues' item at index 2 must be string, got integer");

        let err = validate(&with("suggestions", json!([{"text": "x"}]))).unwrap_err();
        assert_eq!(
            err,
            SchemaError::WrongItemKind {
                field: "suggestions",
                index: 0,
                actual: "object"
            }
        );

        let err = validate(&with("issues", json!("not a list"))).unwrap_err();
        assert_eq!(err.to_string(), "Field 'issues' must be array of strings, got string");
    }

    #[test]
    fn empty_lists_are_accepted_and_order_preserved() {
        let payload = validate(&with("suggestions", json!(["b", "a", "c"]))).unwrap();
        assert_eq!(payload.suggestions, vec!["b", "a", "c"]);
        let payload = validate(&with("issues", json!([]))).unwrap();
        assert!(payload.issues.is_empty());
    }

    #[test]
    fn validation_does_not_mutate_input() {
        let raw = with("completeness_score", json!("4"));
        let before = raw.clone();
        let _ = validate(&raw);
        assert_eq!(raw, before);
    }

    #[test]
    fn accepted_payload_keeps_its_structure() {
        let raw = valid_payload();
        let payload = validate(&raw).unwrap();
        assert_eq!(serde_json::to_value(&payload).unwrap(), raw);
    }

    #[test]
    fn out_of_range_integers_are_bound_violations() {
        let err = validate(&with("completeness_score", json!(u64::MAX))).unwrap_err();
        assert_eq!(
            err,
            SchemaError::AboveMaximum {
                field: "completeness_score",
                max: 10,
                actual: "18446744073709551615".into()
            }
        );

        let err = validate(&with("completeness_score", json!(1.0e20))).unwrap_err();
        assert!(matches!(err, SchemaError::AboveMaximum { max: 10, .. }));

        let err = validate(&with("completeness_score", json!(-1.0e20))).unwrap_err();
        assert!(matches!(err, SchemaError::BelowMinimum { min: 1, .. }));

        let err = validate(&with("completeness_score", json!("-99999999999999999999"))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'completeness_score' must be >= 1, got -99999999999999999999"
        );
    }

    #[test]
    fn large_whole_floats_within_i64_are_exact() {
        let err = validate(&with("completeness_score", json!(1.0e16))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'completeness_score' must be <= 10, got 10000000000000000"
        );
    }
}
