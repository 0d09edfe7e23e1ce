//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::llm::ModelFamily;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::quota::QuotaBackend;
use crate::infrastructure::config::settings::Config;

/// Documented configuration template.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.example.toml");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::hint(&format!(
        "run {} to verify it",
        output::highlight(format!("reqeval config check -c {}", path.display()))
    ));
    Ok(())
}

/// Execute `config check` on an already loaded and validated configuration.
pub fn execute_check(path: &Path, config: &Config) {
    let family = ModelFamily::from_model_id(&config.llm.model_id);
    let key_var = family.api_key_var();
    let key_present = std::env::var(key_var).is_ok_and(|v| !v.trim().is_empty());

    if output::is_json() {
        output::json_output(&json!({
            "command": "config check",
            "path": path.display().to_string(),
            "file_found": path.exists(),
            "valid": true,
            "provider": family.as_str(),
            "api_key_var": key_var,
            "api_key_present": key_present,
        }));
        return;
    }

    output::section("Configuration");
    if path.exists() {
        output::field("Path", path.display());
    } else {
        output::field("Path", format!("{} (not found, using defaults)", path.display()));
    }
    output::success("Configuration is valid");

    output::section("Model");
    output::field("Model", &config.llm.model_id);
    output::field("Provider", family.as_str());
    output::field("Temperature", config.llm.temperature);
    output::field("Max tokens", config.llm.max_tokens);
    output::field("Timeout", format!("{}s", config.llm.timeout_secs));
    if let Some(url) = &config.llm.api_url {
        output::field("API URL", url);
    }
    if key_present {
        output::success(&format!("{key_var} is set"));
    } else {
        output::warning(&format!("{key_var} is not set"));
    }

    output::section("Quota");
    output::field("Daily limit", config.quota.daily_limit);
    output::field("Backend", config.quota.backend.as_str());
    if config.quota.backend == QuotaBackend::Sqlite {
        output::field("Database", &config.quota.database);
    }
    if config.quota.skip {
        output::warning("Quota enforcement is disabled");
    }

    output::section("Input");
    output::field(
        "Length",
        format!("{}..={} chars", config.input.min_length, config.input.max_length),
    );

    output::section("Server");
    output::field("Bind", &config.server.bind);
    output::field("Behind proxy", config.server.behind_proxy);
    output::field("Allowed origin", &config.server.allowed_origin);

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);
}
