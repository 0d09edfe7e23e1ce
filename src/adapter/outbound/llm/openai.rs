//! OpenAI LLM client.
//!
//! Provides an implementation of the [`Llm`] trait for the OpenAI
//! Chat Completions API and compatible endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::infrastructure::config::llm::LlmConfig;
use crate::port::outbound::llm::Llm;

/// OpenAI Chat Completions API endpoint.
pub const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Routing prefix that selects this client but is not part of the wire model name.
const ROUTING_PREFIX: &str = "openai.";

/// OpenAI API client.
#[derive(Debug)]
pub struct OpenAi {
    client: Client,
    api_key: String,
    /// Model identifier as configured (e.g., "gpt-4o-mini").
    model: String,
    max_tokens: u32,
    temperature: f64,
    api_url: String,
}

impl OpenAi {
    /// Create a new OpenAI client with explicit configuration.
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

    fn wire_model(&self) -> &str {
        self.model
            .strip_prefix(ROUTING_PREFIX)
            .unwrap_or(&self.model)
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
    content: &'a str,
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Deserialize, Default)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<Content>,
}

/// Message content: a plain string or a list of typed blocks.
#[derive(Deserialize)]
#[serde(untagged)]
enum Content {
    Text(String),
    Blocks(Vec<Value>),
}

impl Content {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            // Blocks that are not objects or carry no text contribute nothing.
            Self::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| block.get("text").and_then(Value::as_str))
                .collect(),
        }
    }
}

impl Response {
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(Content::into_text)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Llm for OpenAi {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = Request {
            model: self.wire_model(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
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

#[cfg(test)]
mod tests {
    use super::*;

    fn text(json: &str) -> String {
        serde_json::from_str::<Response>(json).unwrap().into_text()
    }

    #[test]
    fn test_request_serialization() {
        let request = Request {
            model: "gpt-4o-mini",
            max_tokens: 1024,
            temperature: 0.2,
            messages: vec![Message {
                role: "user",
                content: "Hello, world!",
            }],
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hello, world!");
    }

    #[test]
    fn test_string_content() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "{\"testable\": false}"},
                "finish_reason": "stop"
            }]
        }"#;
        assert_eq!(text(json), r#"{"testable": false}"#);
    }

    #[test]
    fn test_block_content_is_concatenated() {
        let json = r#"{"choices": [{"message": {"content": [
            {"type": "text", "text": "{\"a\":"},
            "stray",
            {"type": "image"},
            {"type": "text", "text": " 1}"}
        ]}}]}"#;
        assert_eq!(text(json), r#"{"a": 1}"#);
    }

    #[test]
    fn test_first_choice_wins() {
        let json = r#"{"choices": [
            {"message": {"content": "first"}},
            {"message": {"content": "second"}}
        ]}"#;
        assert_eq!(text(json), "first");
    }

    #[test]
    fn test_empty_choices_returns_empty_string() {
        assert_eq!(text(r#"{"choices": []}"#), "");
        assert_eq!(text(r#"{"choices": [{"message": {"content": null}}]}"#), "");
        assert_eq!(text(r#"{}"#), "");
    }

    #[test]
    fn test_malformed_response_wrong_choices_type() {
        let result: std::result::Result<Response, _> =
            serde_json::from_str(r#"{"choices": "not an array"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_routing_prefix_is_stripped() {
        let client = OpenAi::new("key", "openai.gpt-oss-120b-1:0", 1024, 0.2);
        assert_eq!(client.wire_model(), "gpt-oss-120b-1:0");
        assert_eq!(client.model(), "openai.gpt-oss-120b-1:0");

        let client = OpenAi::new("key", "gpt-4o", 1024, 0.2);
        assert_eq!(client.wire_model(), "gpt-4o");
    }

    #[tokio::test]
    async fn test_completion_against_local_endpoint() {
        use axum::{http::HeaderMap, routing::post, Json, Router};

        let app = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(serde_json::json!({
                    "choices": [{ "message": { "content": format!("{} {}", body["model"].as_str().unwrap_or_default(), auth) } }]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let client = OpenAi::new("sk-test", "openai.gpt-4o", 256, 0.0)
            .with_api_url(format!("http://{addr}/v1/chat/completions"));
        assert_eq!(client.complete("ping").await.unwrap(), "gpt-4o Bearer sk-test");
    }
}
