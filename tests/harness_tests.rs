mod support;

use std::sync::Arc;

use serde_json::{json, Value};

use reqeval::application::harness::{dataset_path, output_path, DEFAULT_DATASET};
use reqeval::application::{Dataset, Harness, SampleResult};
use reqeval::infrastructure::config::llm::LlmConfig;
use reqeval::testkit::config::valid_payload;
use reqeval::testkit::llm::{FailingLlm, SequenceLlm};

use support::write_temp_file;

fn dataset_json() -> Value {
    json!({
        "samples": [
            {
                "requirement": "The system shall be fast.",
                "expected": { "ambiguity_detected": true, "testable": false, "completeness_score": 3 }
            },
            {
                "requirement": "The UI should be nice.",
                "expected": { "ambiguity_detected": true }
            },
            {
                "requirement": "The API shall return 404 for unknown ids.",
                "expected": { "ambiguity_detected": true, "testable": true, "completeness_score": 2 }
            }
        ]
    })
}

fn clear_reply() -> Value {
    json!({
        "ambiguity_detected": false,
        "ambiguity_details": "",
        "testable": true,
        "testability_details": "Status code is observable",
        "completeness_score": 5,
        "completeness_details": "",
        "issues": [],
        "suggestions": []
    })
}

fn harness(responses: Vec<String>) -> Harness {
    Harness::new(Arc::new(SequenceLlm::new(responses)), &LlmConfig::default())
}

#[tokio::test]
async fn run_scores_dataset_and_writes_report() {
    let (dir, path) = write_temp_file("dataset.json", &dataset_json().to_string());
    let dataset = Dataset::load(&path).unwrap();
    assert_eq!(dataset.samples.len(), 3);

    let harness = harness(vec![
        valid_payload().to_string(),
        "I cannot evaluate this.".to_string(),
        clear_reply().to_string(),
    ]);

    let mut progress = Vec::new();
    let report = harness
        .run(&dataset, |done, total, result| {
            progress.push((done, total, result.is_error()));
        })
        .await;
    assert_eq!(progress, vec![(1, 3, false), (2, 3, true), (3, 3, false)]);

    let m = &report.metrics;
    assert_eq!((m.total_samples, m.successful_evaluations, m.errors), (3, 2, 1));
    assert_eq!(m.schema_valid, 2);

    assert_eq!((m.ambiguity.tp, m.ambiguity.fn_, m.ambiguity.fp, m.ambiguity.tn), (1, 1, 0, 0));
    assert_eq!(m.ambiguity.accuracy, Some(0.5));
    assert_eq!(m.ambiguity.precision, Some(1.0));
    assert_eq!(m.ambiguity.recall, Some(0.5));

    assert_eq!((m.testability.tp, m.testability.tn), (1, 1));
    assert_eq!(m.testability.accuracy, Some(1.0));

    assert_eq!(m.completeness.within_threshold, 1);
    assert_eq!(m.completeness.outside_threshold, 1);
    assert_eq!(m.completeness.accuracy, Some(0.5));

    let SampleResult::Error { error, .. } = &report.results[1] else {
        panic!("second sample should fail");
    };
    assert_eq!(error, "Failed to parse AI response");

    let out = dir.path().join("report.json");
    report.write(&out).unwrap();
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["results"][0]["status"], "success");
    assert_eq!(written["results"][1]["status"], "error");
    assert_eq!(written["results"][0]["comparisons"]["ambiguity"]["match"], true);
    assert_eq!(written["results"][2]["comparisons"]["completeness"]["within_threshold"], false);
    assert_eq!(written["metrics"]["ambiguity"]["fn"], 1);
}

#[tokio::test]
async fn provider_failures_become_error_results() {
    let (_dir, path) = write_temp_file("dataset.json", &dataset_json().to_string());
    let dataset = Dataset::load(&path).unwrap();
    let harness = Harness::new(Arc::new(FailingLlm), &LlmConfig::default());

    let report = harness.run(&dataset, |_, _, _| {}).await;
    assert!(report.results.iter().all(SampleResult::is_error));
    assert_eq!(report.metrics.errors, 3);
    assert_eq!(report.metrics.ambiguity.accuracy, None);

    let serialized = serde_json::to_value(&report.metrics).unwrap();
    assert!(serialized["ambiguity"].get("accuracy").is_none());
}

#[tokio::test]
async fn empty_dataset_produces_empty_metrics() {
    let (_dir, path) = write_temp_file("dataset.json", r#"{"samples": []}"#);
    let dataset = Dataset::load(&path).unwrap();
    let report = harness(vec![]).run(&dataset, |_, _, _| {}).await;
    assert!(report.results.is_empty());
    assert_eq!(report.metrics.total_samples, 0);
    assert_eq!(report.metrics.completeness.accuracy, None);
}

#[test]
fn malformed_dataset_fails_to_load() {
    let (_dir, path) = write_temp_file("dataset.json", r#"{"samples": "nope"}"#);
    assert!(Dataset::load(&path).is_err());
}

#[test]
fn explicit_paths_take_precedence() {
    let flag = std::path::Path::new("custom.json");
    assert_eq!(dataset_path(Some(flag)), flag);
    assert_eq!(output_path(Some(flag)).as_deref(), Some(flag));
    assert_eq!(DEFAULT_DATASET, "eval_dataset.json");
}
