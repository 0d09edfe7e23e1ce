use serde_json::json;

use reqeval::application::{validate, ResponseValidator};
use reqeval::error::SchemaError;
use reqeval::testkit::config::valid_payload;

#[test]
fn model_output_with_loose_types_is_normalized() {
    let raw = json!({
        "ambiguity_detected": "yes",
        "ambiguity_details": "",
        "testable": 0,
        "testability_details": "",
        "completeness_score": "4",
        "completeness_details": "",
        "issues": [],
        "suggestions": ["Name the user role"]
    });

    let payload = validate(&raw).unwrap();
    assert!(payload.ambiguity_detected);
    assert!(!payload.testable);
    assert_eq!(payload.completeness_score, 4);
    assert_eq!(payload.suggestions, vec!["Name the user role".to_string()]);
}

#[test]
fn typical_reply_is_accepted() {
    let payload = validate(&valid_payload()).unwrap();
    assert_eq!(payload.issues, vec!["Vague performance term".to_string()]);
}

#[test]
fn first_problem_is_reported() {
    let mut raw = valid_payload();
    raw.as_object_mut().unwrap().remove("testable");
    raw["completeness_score"] = json!(9);

    let err = validate(&raw).unwrap_err();
    assert_eq!(err.field(), Some("testable"));
    assert!(matches!(err, SchemaError::MissingField { .. }));
}

#[test]
fn score_bounds_are_enforced() {
    for (score, ok) in [(0, false), (1, true), (5, true), (6, false)] {
        let mut raw = valid_payload();
        raw["completeness_score"] = json!(score);
        assert_eq!(validate(&raw).is_ok(), ok, "score {score}");
    }
}

#[test]
fn arrays_must_hold_strings() {
    let mut raw = valid_payload();
    raw["issues"] = json!(["ok", 3]);
    let err = validate(&raw).unwrap_err();
    assert_eq!(err.to_string(), "Field 'issues' item at index 1 must be string, got integer");
}

#[test]
fn extra_fields_are_rejected() {
    let mut raw = valid_payload();
    raw["confidence"] = json!(0.9);
    assert!(matches!(
        ResponseValidator::default().validate(&raw),
        Err(SchemaError::UnexpectedField { .. })
    ));
}

#[test]
fn non_objects_are_rejected() {
    for raw in [json!(null), json!([1, 2]), json!("text"), json!(3)] {
        assert!(validate(&raw).is_err(), "{raw} should be rejected");
    }
}
