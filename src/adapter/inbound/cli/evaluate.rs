//! Handler for the `evaluate` command.
//!
//! Runs one requirement through the same pipeline the HTTP service uses,
//! quota included, so the outcome matches what a caller would see.

use serde_json::json;

use crate::adapter::inbound::cli::command::EvaluateArgs;
use crate::adapter::inbound::cli::output;
use crate::application::{ApiResponse, REQUIREMENT_FIELD};
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap::build_evaluator;
use crate::infrastructure::config::settings::Config;

/// Execute the evaluate command.
///
/// # Errors
///
/// Returns an error if the pipeline cannot be built, or
/// [`Error::Evaluation`] when the pipeline answers with a non-200 status.
pub async fn execute(config: &Config, args: &EvaluateArgs) -> Result<()> {
    let evaluator = build_evaluator(config)?;
    let body = json!({ REQUIREMENT_FIELD: args.text }).to_string();

    let pb = output::spinner(&format!("Evaluating with {}", evaluator.llm().model()));
    let response = evaluator.evaluate(Some(body.as_str()), &args.client).await;
    if response.status == 200 {
        output::spinner_success(&pb, "Evaluation complete");
    } else {
        output::spinner_fail(&pb, "Evaluation failed");
    }

    print_response(&response);

    match response.error_message() {
        Some(message) if response.status != 200 => Err(Error::Evaluation {
            status: response.status,
            message: message.to_string(),
        }),
        _ => Ok(()),
    }
}

fn print_response(response: &ApiResponse) {
    if output::is_json() {
        output::json_output(&json!({
            "command": "evaluate",
            "status": response.status,
            "body": response.body,
        }));
        return;
    }

    output::field("Status", output::status(response.status));
    if response.status != 200 {
        return;
    }
    output::section("Evaluation");
    let pretty =
        serde_json::to_string_pretty(&response.body).unwrap_or_else(|_| response.body.to_string());
    output::lines(&pretty);
}
