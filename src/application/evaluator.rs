//! Request orchestration.
//!
//! [`Evaluator`] runs one evaluation request end to end:
//!
//! ```text
//! method -> input checks -> quota -> prompt -> inference (bounded) -> parse -> validate -> response
//! ```
//!
//! It is transport-agnostic. Adapters hand it a method, an optional body and
//! a caller key, and serialize the returned [`ApiResponse`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use super::prompt::build_evaluation_prompt;
use super::quota::QuotaTracker;
use super::request::parse_requirement;
use super::validation::validate;
use crate::domain::{fallback_payload, QuotaDecision, UsageSnapshot};
use crate::error::{Error, Result};
use crate::infrastructure::config::input::InputConfig;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::{Clock, Llm, QuotaStore};

/// Body returned for upstream inference failures.
pub const SERVICE_ERROR: &str = "Evaluation service error";
/// Body returned for any other unexpected failure.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Status code and JSON body produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    #[must_use]
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    /// Error message carried by the body, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

/// Evaluation pipeline wired to a quota store, an LLM and a clock.
pub struct Evaluator<S> {
    quota: QuotaTracker<S>,
    llm: Arc<dyn Llm>,
    clock: Arc<dyn Clock>,
    daily_limit: u32,
    input: InputConfig,
    timeout: Duration,
}

impl<S: QuotaStore> Evaluator<S> {
    /// Build an evaluator from its collaborators and the loaded configuration.
    #[must_use]
    pub fn new(
        quota: QuotaTracker<S>,
        llm: Arc<dyn Llm>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        Self {
            quota,
            llm,
            clock,
            daily_limit: config.quota.daily_limit,
            input: config.input.clone(),
            timeout: Duration::from_secs(config.llm.timeout_secs),
        }
    }

    /// Override the inference timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    #[must_use]
    pub fn llm(&self) -> &Arc<dyn Llm> {
        &self.llm
    }

    /// Dispatch on the HTTP method.
    ///
    /// `OPTIONS` answers the CORS preflight, `POST` evaluates, anything else
    /// is rejected with 405.
    pub async fn handle(&self, method: &str, body: Option<&str>, client: &str) -> ApiResponse {
        match method {
            "OPTIONS" => ApiResponse::ok(json!({ "message": "OK" })),
            "POST" => self.evaluate(body, client).await,
            _ => ApiResponse::error(405, "Method not allowed"),
        }
    }

    /// Evaluate one request body on behalf of `client`.
    pub async fn evaluate(&self, body: Option<&str>, client: &str) -> ApiResponse {
        let text = match parse_requirement(body, &self.input) {
            Ok(text) => text,
            Err(e) => {
                warn!(client, error = %e, "Validation failed");
                return ApiResponse::error(400, e.to_string());
            }
        };

        let today = self.clock.today();
        if let QuotaDecision::Denied(message) = self
            .quota
            .check_and_increment(client, self.daily_limit, &today)
            .await
        {
            warn!(client, limit = self.daily_limit, "Rate limit exceeded");
            return ApiResponse::error(429, message);
        }

        let preview: String = text.chars().take(100).collect();
        info!(client, requirement = %preview, "Evaluating requirement");

        match self.assess(&text).await {
            Ok(evaluation) => {
                info!(client, "Evaluation completed successfully");
                ApiResponse::ok(evaluation)
            }
            Err(e) if e.is_upstream() => {
                error!(client, model = self.llm.model(), error = %e, "Inference call failed");
                ApiResponse::error(500, SERVICE_ERROR)
            }
            Err(e) => {
                error!(client, error = %e, "Unexpected error");
                ApiResponse::error(500, INTERNAL_ERROR)
            }
        }
    }

    /// Render the prompt for `text`, call the model and interpret the reply.
    ///
    /// Quota is not consulted. A reply that is not JSON yields the fallback
    /// payload; a reply that is JSON but breaks the schema is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the inference call fails or times out.
    pub async fn assess(&self, text: &str) -> Result<Value> {
        let content = self.complete(&build_evaluation_prompt(text)).await?;
        Ok(interpret(&content))
    }

    /// Call the model once under the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when the deadline passes, otherwise whatever
    /// the provider returned.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        complete_within(self.llm.as_ref(), prompt, self.timeout).await
    }

    /// Usage snapshot for `client` on the current day.
    pub async fn usage(&self, client: &str) -> UsageSnapshot {
        let today = self.clock.today();
        self.quota.current_usage(client, &today, self.daily_limit).await
    }
}

/// Single completion call bounded by `timeout`. No retries.
pub(crate) async fn complete_within(llm: &dyn Llm, prompt: &str, timeout: Duration) -> Result<String> {
    info!(provider = llm.name(), model = llm.model(), "Calling model");
    let content = tokio::time::timeout(timeout, llm.complete(prompt))
        .await
        .map_err(|_| Error::Timeout(timeout.as_secs()))??;
    debug!(content = %content, "Model response content");
    Ok(content)
}

/// Parse model output, logging schema violations without rejecting.
fn interpret(content: &str) -> Value {
    match serde_json::from_str::<Value>(content) {
        Ok(evaluation) => {
            if let Err(e) = validate(&evaluation) {
                warn!(error = %e, "Schema validation failed");
            }
            evaluation
        }
        Err(e) => {
            error!(error = %e, "Failed to parse model response as JSON");
            fallback_payload()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::clock::FixedClock;
    use crate::testkit::config::{config, valid_payload, with_limit};
    use crate::testkit::llm::{FailingLlm, SlowLlm, StubLlm};
    use crate::testkit::store::CountingStore;

    const CLIENT: &str = "203.0.113.7";
    const BODY: &str = r#"{"requirementText": "The system shall be fast."}"#;

    fn evaluator(llm: Arc<dyn Llm>, config: &Config) -> (Evaluator<CountingStore>, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::default());
        let tracker = QuotaTracker::new(Arc::clone(&store), &config.quota);
        let clock = Arc::new(FixedClock::new("2024-05-01"));
        (Evaluator::new(tracker, llm, clock, config), store)
    }

    #[tokio::test]
    async fn preflight_and_method_guard() {
        let (evaluator, store) = evaluator(Arc::new(StubLlm::default()), &config());
        let preflight = evaluator.handle("OPTIONS", None, CLIENT).await;
        assert_eq!(preflight, ApiResponse::ok(json!({ "message": "OK" })));

        let rejected = evaluator.handle("GET", Some(BODY), CLIENT).await;
        assert_eq!(rejected.status, 405);
        assert_eq!(rejected.error_message(), Some("Method not allowed"));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn returns_model_json_verbatim() {
        let llm = Arc::new(StubLlm::json(&valid_payload()));
        let (evaluator, store) = evaluator(llm.clone(), &config());

        let response = evaluator.handle("POST", Some(BODY), CLIENT).await;
        assert_eq!(response, ApiResponse::ok(valid_payload()));
        assert_eq!(store.record(CLIENT).map(|r| r.count), Some(1));
        assert!(llm
            .last_prompt()
            .is_some_and(|p| p.contains("\"The system shall be fast.\"")));
    }

    #[tokio::test]
    async fn invalid_input_skips_quota_and_model() {
        let llm = Arc::new(StubLlm::json(&valid_payload()));
        let (evaluator, store) = evaluator(llm.clone(), &config());

        let response = evaluator
            .handle("POST", Some(r#"{"requirementText": "short"}"#), CLIENT)
            .await;
        assert_eq!(response.status, 400);
        assert!(response.error_message().is_some_and(|m| m.contains("10")));
        assert_eq!(store.calls(), 0);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn denied_request_never_reaches_model() {
        let llm = Arc::new(StubLlm::json(&valid_payload()));
        let (evaluator, _) = evaluator(llm.clone(), &with_limit(2));

        for _ in 0..2 {
            assert_eq!(evaluator.handle("POST", Some(BODY), CLIENT).await.status, 200);
        }
        let denied = evaluator.handle("POST", Some(BODY), CLIENT).await;
        assert_eq!(denied.status, 429);
        assert!(denied.error_message().is_some_and(|m| m.contains('2')));
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn non_json_reply_yields_fallback() {
        let (evaluator, _) = evaluator(Arc::new(StubLlm::new("Sure! Here is my analysis.")), &config());
        let response = evaluator.handle("POST", Some(BODY), CLIENT).await;
        assert_eq!(response, ApiResponse::ok(fallback_payload()));
    }

    #[tokio::test]
    async fn schema_violation_is_passed_through() {
        let mut payload = valid_payload();
        payload["completeness_score"] = json!(42);
        let (evaluator, _) = evaluator(Arc::new(StubLlm::json(&payload)), &config());
        let response = evaluator.handle("POST", Some(BODY), CLIENT).await;
        assert_eq!(response, ApiResponse::ok(payload));
    }

    #[tokio::test]
    async fn provider_failure_is_service_error() {
        let (evaluator, _) = evaluator(Arc::new(FailingLlm), &config());
        let response = evaluator.handle("POST", Some(BODY), CLIENT).await;
        assert_eq!(response, ApiResponse::error(500, SERVICE_ERROR));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let llm = Arc::new(SlowLlm {
            delay: Duration::from_secs(5),
            response: valid_payload().to_string(),
        });
        let (evaluator, _) = evaluator(llm, &config());
        let evaluator = evaluator.with_timeout(Duration::from_millis(50));
        let response = evaluator.handle("POST", Some(BODY), CLIENT).await;
        assert_eq!(response, ApiResponse::error(500, SERVICE_ERROR));
    }

    #[tokio::test]
    async fn usage_reflects_allowed_requests() {
        let (evaluator, _) = evaluator(Arc::new(StubLlm::json(&valid_payload())), &with_limit(5));
        evaluator.handle("POST", Some(BODY), CLIENT).await;
        evaluator.handle("POST", Some(BODY), CLIENT).await;

        let usage = evaluator.usage(CLIENT).await;
        assert_eq!((usage.used, usage.remaining, usage.limit), (2, 3, 5));
        assert_eq!(usage.date, "2024-05-01");
    }
}
