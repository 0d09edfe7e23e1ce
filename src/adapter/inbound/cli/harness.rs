//! Handler for the `harness` command.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::HarnessArgs;
use crate::adapter::inbound::cli::output;
use crate::application::harness::{dataset_path, output_path, Confusion};
use crate::application::{Dataset, HarnessReport, Metrics};
use crate::error::{ConfigError, Result};
use crate::infrastructure::bootstrap::build_harness;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct LabelRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "TP")]
    tp: u32,
    #[tabled(rename = "TN")]
    tn: u32,
    #[tabled(rename = "FP")]
    fp: u32,
    #[tabled(rename = "FN")]
    fn_: u32,
    #[tabled(rename = "Accuracy")]
    accuracy: String,
    #[tabled(rename = "Precision")]
    precision: String,
    #[tabled(rename = "Recall")]
    recall: String,
}

impl LabelRow {
    fn new(field: &'static str, c: &Confusion) -> Self {
        Self {
            field,
            tp: c.tp,
            tn: c.tn,
            fp: c.fp,
            fn_: c.fn_,
            accuracy: percent(c.accuracy),
            precision: percent(c.precision),
            recall: percent(c.recall),
        }
    }
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}%", v * 100.0))
}

/// Execute the harness command.
///
/// # Errors
///
/// Returns an error if the dataset is missing or malformed, the model
/// client cannot be built, or the report cannot be written.
pub async fn execute(config: &Config, args: &HarnessArgs) -> Result<()> {
    let path = dataset_path(args.dataset.as_deref());
    if !path.exists() {
        return Err(ConfigError::InvalidValue {
            field: "dataset",
            reason: format!("file not found: {}", path.display()),
        }
        .into());
    }
    let dataset = Dataset::load(&path)?;
    let harness = build_harness(config)?;

    output::section("Evaluation Harness");
    output::field("Dataset", path.display());
    output::field("Samples", dataset.samples.len());
    output::field("Model", &config.llm.model_id);

    let total = u64::try_from(dataset.samples.len()).unwrap_or(u64::MAX);
    let pb = output::progress(total);
    let report = harness
        .run(&dataset, |done, _, result| {
            pb.set_position(u64::try_from(done).unwrap_or(u64::MAX));
            if result.is_error() {
                pb.set_message("last sample failed");
            } else {
                pb.set_message("");
            }
        })
        .await;
    pb.finish_and_clear();

    let saved = match output_path(args.output.as_deref()) {
        Some(out) => {
            report.write(&out)?;
            Some(out)
        }
        None => None,
    };

    if output::is_json() {
        output::json_output(&json!({
            "command": "harness",
            "dataset": path.display().to_string(),
            "metrics": report.metrics,
            "output": saved.as_ref().map(|p| p.display().to_string()),
        }));
        return Ok(());
    }

    print_metrics(&report);
    if let Some(out) = saved {
        output::success(&format!("Detailed results saved to {}", out.display()));
    } else {
        output::hint("Pass --output or set EVAL_OUTPUT to save per-sample results");
    }
    Ok(())
}

fn print_metrics(report: &HarnessReport) {
    let Metrics {
        total_samples,
        successful_evaluations,
        errors,
        schema_valid,
        ambiguity,
        testability,
        completeness,
    } = &report.metrics;

    output::section("Results");
    output::field("Total", total_samples);
    output::field("Successful", successful_evaluations);
    output::field("Errors", errors);
    output::field("Schema valid", format!("{schema_valid}/{successful_evaluations}"));

    output::section("Label Agreement");
    let table = Table::new([
        LabelRow::new("ambiguity_detected", ambiguity),
        LabelRow::new("testable", testability),
    ])
    .to_string();
    output::lines(&table);

    output::section("Completeness");
    output::field("Within", completeness.within_threshold);
    output::field("Outside", completeness.outside_threshold);
    output::field("Accuracy", percent(completeness.accuracy));
}
