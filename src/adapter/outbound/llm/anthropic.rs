//! Anthropic Claude LLM client.
//!
//! Provides an implementation of the [`Llm`] trait for the Anthropic
//! Messages API. Only the first content block of a reply is read.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::infrastructure::config::llm::LlmConfig;
use crate::port::outbound::llm::Llm;

/// Anthropic Messages API endpoint.
pub const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// API version header value.
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude API client.
#[derive(Debug)]
pub struct Anthropic {
    client: Client,
    api_key: String,
    /// Model identifier (e.g., "claude-3-haiku-20240307").
    model: String,
    max_tokens: u32,
    /// Sampling temperature (0.0 to 1.0).
    temperature: f64,
    api_url: String,
}

impl Anthropic {
    /// Create a new Anthropic client with explicit configuration.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f64,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
            temperature,
            api_url: API_URL.to_string(),
        }
    }

    /// Create a client from inference settings.
    #[must_use]
    pub fn from_config(api_key: impl Into<String>, config: &LlmConfig) -> Self {
        let client = Self::new(api_key, &config.model_id, config.max_tokens, config.temperature);
        match &config.api_url {
            Some(url) => client.with_api_url(url),
            None => client,
        }
    }

    /// Send requests to `url` instead of the public endpoint.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<TextBlock<'a>>,
}

#[derive(Serialize)]
struct TextBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl Response {
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .next()
            .map(|block| block.text)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Llm for Anthropic {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = Request {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: vec![TextBlock {
                    kind: "text",
                    text: prompt,
                }],
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json::<Response>()
            .await?;

        Ok(response.into_text())
    }
}
