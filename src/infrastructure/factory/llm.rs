//! LLM client factory.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::llm::{Anthropic, ModelFamily, OpenAi};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::llm::Llm;

/// Build the LLM client for the configured model id.
///
/// The family is chosen from the model id; the matching API key is read from
/// the environment.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] naming the key variable when it is
/// unset or blank.
pub fn build_llm_client(config: &Config) -> Result<Arc<dyn Llm>> {
    let family = ModelFamily::from_model_id(&config.llm.model_id);
    let var = family.api_key_var();
    let api_key = std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::MissingField { field: var })?;

    let client: Arc<dyn Llm> = match family {
        ModelFamily::OpenAi => Arc::new(OpenAi::from_config(api_key, &config.llm)),
        ModelFamily::Anthropic => Arc::new(Anthropic::from_config(api_key, &config.llm)),
    };

    info!(provider = client.name(), model = client.model(), "LLM client initialized");
    Ok(client)
}
