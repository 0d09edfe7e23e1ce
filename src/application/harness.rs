//! Offline accuracy harness.
//!
//! Runs every sample of a labelled dataset through the model, compares the
//! output with the expected labels and aggregates confusion counts. The
//! harness talks to the model directly; quota is never consulted.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::evaluator::complete_within;
use super::prompt::build_evaluation_prompt;
use super::validation::validate;
use crate::error::Result;
use crate::infrastructure::config::llm::LlmConfig;
use crate::port::outbound::Llm;

/// Completeness tolerance used when a sample does not set one.
pub const DEFAULT_COMPLETENESS_THRESHOLD: i64 = 2;

/// Labelled evaluation dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl Dataset {
    /// Read a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid dataset.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub requirement: String,
    #[serde(default)]
    pub expected: Expected,
}

/// Expected labels. Absent labels are not compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expected {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambiguity_detected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completeness_score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completeness_threshold: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoolComparison {
    pub ai: Value,
    pub expected: bool,
    #[serde(rename = "match")]
    pub matched: bool,
}

impl BoolComparison {
    fn new(ai: Value, expected: bool) -> Self {
        let matched = ai.as_bool() == Some(expected);
        Self {
            ai,
            expected,
            matched,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComparison {
    pub ai: Value,
    pub expected: i64,
    pub threshold: i64,
    pub within_threshold: bool,
}

impl ScoreComparison {
    /// A missing score reads as 0; a non-numeric one is outside any threshold.
    fn new(ai: Value, expected: i64, threshold: i64) -> Self {
        let ai = if ai.is_null() { Value::from(0) } else { ai };
        let within_threshold = ai
            .as_f64()
            .is_some_and(|score| (score - expected as f64).abs() <= threshold as f64);
        Self {
            ai,
            expected,
            threshold,
            within_threshold,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparisons {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambiguity: Option<BoolComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testability: Option<BoolComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completeness: Option<ScoreComparison>,
}

/// Outcome for one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SampleResult {
    Success {
        requirement: String,
        ai_output: Value,
        expected: Expected,
        schema_valid: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        schema_error: Option<String>,
        comparisons: Comparisons,
    },
    Error {
        requirement: String,
        error: String,
    },
}

impl SampleResult {
    /// Compare a parsed model output against the sample's labels.
    #[must_use]
    pub fn compare(sample: &Sample, ai_output: Value) -> Self {
        let expected = &sample.expected;
        let field = |name: &str| ai_output.get(name).cloned().unwrap_or(Value::Null);

        let comparisons = Comparisons {
            ambiguity: expected
                .ambiguity_detected
                .map(|e| BoolComparison::new(field("ambiguity_detected"), e)),
            testability: expected
                .testable
                .map(|e| BoolComparison::new(field("testable"), e)),
            completeness: expected.completeness_score.map(|e| {
                ScoreComparison::new(
                    field("completeness_score"),
                    e,
                    expected
                        .completeness_threshold
                        .unwrap_or(DEFAULT_COMPLETENESS_THRESHOLD),
                )
            }),
        };

        let schema_error = validate(&ai_output).err().map(|e| e.to_string());
        Self::Success {
            requirement: sample.requirement.clone(),
            ai_output,
            expected: expected.clone(),
            schema_valid: schema_error.is_none(),
            schema_error,
            comparisons,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Confusion counts for a boolean label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Confusion {
    pub tp: u32,
    pub tn: u32,
    pub fp: u32,
    #[serde(rename = "fn")]
    pub fn_: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recall: Option<f64>,
}

impl Confusion {
    /// Count one comparison. Model values that are not booleans are ignored.
    fn record(&mut self, comparison: &BoolComparison) {
        match (comparison.ai.as_bool(), comparison.expected) {
            (Some(true), true) => self.tp += 1,
            (Some(false), false) => self.tn += 1,
            (Some(true), false) => self.fp += 1,
            (Some(false), true) => self.fn_ += 1,
            (None, _) => {}
        }
    }

    fn finish(&mut self) {
        let total = self.tp + self.tn + self.fp + self.fn_;
        if total == 0 {
            return;
        }
        self.accuracy = Some(ratio(self.tp + self.tn, total));
        self.precision = Some(ratio(self.tp, self.tp + self.fp));
        self.recall = Some(ratio(self.tp, self.tp + self.fn_));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompletenessMetrics {
    pub within_threshold: u32,
    pub outside_threshold: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

/// Aggregate metrics over a harness run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub total_samples: u32,
    pub successful_evaluations: u32,
    pub errors: u32,
    pub schema_valid: u32,
    pub ambiguity: Confusion,
    pub testability: Confusion,
    pub completeness: CompletenessMetrics,
}

impl Metrics {
    /// Aggregate per-sample results.
    #[must_use]
    pub fn compute(results: &[SampleResult]) -> Self {
        let mut metrics = Self {
            total_samples: u32::try_from(results.len()).unwrap_or(u32::MAX),
            ..Self::default()
        };

        for result in results {
            let SampleResult::Success {
                schema_valid,
                comparisons,
                ..
            } = result
            else {
                metrics.errors += 1;
                continue;
            };

            metrics.successful_evaluations += 1;
            if *schema_valid {
                metrics.schema_valid += 1;
            }
            if let Some(c) = &comparisons.ambiguity {
                metrics.ambiguity.record(c);
            }
            if let Some(c) = &comparisons.testability {
                metrics.testability.record(c);
            }
            if let Some(c) = &comparisons.completeness {
                if c.within_threshold {
                    metrics.completeness.within_threshold += 1;
                } else {
                    metrics.completeness.outside_threshold += 1;
                }
            }
        }

        metrics.ambiguity.finish();
        metrics.testability.finish();
        let scored = metrics.completeness.within_threshold + metrics.completeness.outside_threshold;
        if scored > 0 {
            metrics.completeness.accuracy = Some(ratio(metrics.completeness.within_threshold, scored));
        }
        metrics
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}

/// Full harness output, written as `{"results": [...], "metrics": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct HarnessReport {
    pub results: Vec<SampleResult>,
    pub metrics: Metrics,
}

impl HarnessReport {
    /// Write the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Drives a dataset through the model.
pub struct Harness {
    llm: Arc<dyn Llm>,
    timeout: Duration,
}

impl Harness {
    #[must_use]
    pub fn new(llm: Arc<dyn Llm>, config: &LlmConfig) -> Self {
        Self {
            llm,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Evaluate one sample. Failures are captured in the result, never raised.
    pub async fn evaluate_sample(&self, sample: &Sample) -> SampleResult {
        let error = |error: String| SampleResult::Error {
            requirement: sample.requirement.clone(),
            error,
        };

        let prompt = build_evaluation_prompt(&sample.requirement);
        let content = match complete_within(self.llm.as_ref(), &prompt, self.timeout).await {
            Ok(content) => content,
            Err(e) => return error(e.to_string()),
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(ai_output) => {
                let result = SampleResult::compare(sample, ai_output);
                if let SampleResult::Success {
                    schema_error: Some(e),
                    ..
                } = &result
                {
                    warn!(error = %e, "Schema validation failed");
                }
                result
            }
            Err(_) => error("Failed to parse AI response".to_string()),
        }
    }

    /// Evaluate every sample in order, reporting progress after each one.
    pub async fn run<F>(&self, dataset: &Dataset, mut on_progress: F) -> HarnessReport
    where
        F: FnMut(usize, usize, &SampleResult),
    {
        let total = dataset.samples.len();
        info!(samples = total, model = self.llm.model(), "Starting harness run");

        let mut results = Vec::with_capacity(total);
        for (index, sample) in dataset.samples.iter().enumerate() {
            let result = self.evaluate_sample(sample).await;
            on_progress(index + 1, total, &result);
            results.push(result);
        }

        let metrics = Metrics::compute(&results);
        info!(
            successful = metrics.successful_evaluations,
            errors = metrics.errors,
            "Harness run complete"
        );
        HarnessReport { results, metrics }
    }
}

/// Dataset read when neither the flag nor `EVAL_DATASET` names one.
pub const DEFAULT_DATASET: &str = "eval_dataset.json";

/// Resolve the dataset path: flag, then `EVAL_DATASET`, then [`DEFAULT_DATASET`].
#[must_use]
pub fn dataset_path(flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| std::env::var_os("EVAL_DATASET").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET))
}

/// Resolve the report path: flag, then `EVAL_OUTPUT`. No report otherwise.
#[must_use]
pub fn output_path(flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| std::env::var_os("EVAL_OUTPUT").map(PathBuf::from))
}
