//! Provider selection from the model identifier.

/// Wire format family of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Chat completions: `choices[0].message.content`.
    OpenAi,
    /// Messages API: `content[0].text`.
    Anthropic,
}

impl ModelFamily {
    /// Classify a model id. `openai.` and `gpt-` prefixes select OpenAI;
    /// everything else is treated as Anthropic.
    #[must_use]
    pub fn from_model_id(model_id: &str) -> Self {
        if model_id.starts_with("openai.") || model_id.starts_with("gpt-") {
            Self::OpenAi
        } else {
            Self::Anthropic
        }
    }

    /// Environment variable holding the API key for this family.
    #[must_use]
    pub const fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}
