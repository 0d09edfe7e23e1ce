//! LLM provider configuration.
//!
//! The provider is not chosen explicitly. It follows from the model
//! identifier: see [`ModelFamily`](crate::adapter::outbound::llm::ModelFamily).
//! API keys are read from environment variables (`ANTHROPIC_API_KEY` or
//! `OPENAI_API_KEY`) at runtime.

use serde::Deserialize;

/// Inference settings shared by every provider.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Model identifier.
    ///
    /// Defaults to "claude-3-haiku-20240307".
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Sampling temperature for generation.
    ///
    /// Lower values produce more deterministic output.
    /// Defaults to 0.2.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens in the response. Defaults to 1024.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on a single completion call, in seconds. Defaults to 30.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Override for the provider endpoint. Uses the family default when unset.
    #[serde(default)]
    pub api_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_url: None,
        }
    }
}

fn default_model_id() -> String {
    "claude-3-haiku-20240307".into()
}

fn default_temperature() -> f64 {
    0.2
}

const fn default_max_tokens() -> u32 {
    1024
}

const fn default_timeout_secs() -> u64 {
    30
}
