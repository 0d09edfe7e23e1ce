//! Evaluation payload types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Placeholder written to every detail field when the model output is not JSON.
pub const PARSE_FAILURE_DETAIL: &str = "Failed to parse evaluation";

/// Structured evaluation of a single requirement.
///
/// Field order matches the evaluation schema so a validated payload
/// serializes back with the same keys it was read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationPayload {
    pub ambiguity_detected: bool,
    pub ambiguity_details: String,
    pub testable: bool,
    pub testability_details: String,
    pub completeness_score: i64,
    pub completeness_details: String,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Structurally complete body returned when the model output cannot be parsed.
#[must_use]
pub fn fallback_payload() -> Value {
    json!({
        "ambiguity_detected": null,
        "ambiguity_details": PARSE_FAILURE_DETAIL,
        "testable": null,
        "testability_details": PARSE_FAILURE_DETAIL,
        "completeness_score": 0,
        "completeness_details": PARSE_FAILURE_DETAIL,
        "issues": ["Evaluation parsing error"],
        "suggestions": ["Please try again"],
    })
}
