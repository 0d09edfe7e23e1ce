//! LLM completion port.
//!
//! Defines a generic interface for large language model completion requests
//! made by the evaluator and the offline harness.

use async_trait::async_trait;

use crate::error::Result;

/// Client for large language model text completion.
///
/// Implementations wrap a provider wire format (OpenAI chat completions,
/// Anthropic messages) and handle authentication and response extraction.
/// Timeouts are applied by the caller, not by implementations.
///
/// # Errors
///
/// The [`complete`](Self::complete) method returns an error for transport
/// failures, non-success HTTP statuses, or undecodable responses.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Send a completion request and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response body cannot
    /// be decoded.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
