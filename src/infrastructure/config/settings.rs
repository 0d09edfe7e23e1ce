//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for deployment-specific values like `DAILY_RATE_LIMIT`.
//!
//! # Example
//!
//! ```no_run
//! use reqeval::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_or_default("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::input::InputConfig;
use super::llm::LlmConfig;
use super::logging::{LoggingConfig, LEVELS};
use super::quota::{QuotaBackend, QuotaConfig};
use super::server::ServerConfig;
use crate::error::{ConfigError, Result};

/// Environment variable names recognised as overrides.
pub mod env {
    pub const MODEL_ID: &str = "REQEVAL_MODEL_ID";
    pub const LOG_LEVEL: &str = "REQEVAL_LOG_LEVEL";
    pub const DAILY_LIMIT: &str = "DAILY_RATE_LIMIT";
    pub const SKIP_QUOTA: &str = "SKIP_RATE_LIMIT";
    pub const DATABASE: &str = "RATE_LIMIT_DATABASE";
    pub const BIND: &str = "REQEVAL_BIND";
}

/// Main application configuration.
///
/// Every section is optional in the file; omitted sections take their
/// defaults. Load from a TOML file using [`Config::load`] or parse directly
/// with [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Model and provider settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Daily quota configuration.
    #[serde(default)]
    pub quota: QuotaConfig,

    /// Requirement text length bounds.
    #[serde(default)]
    pub input: InputConfig,
}

impl Config {
    /// Parse configuration from TOML content, apply environment overrides
    /// from the process environment and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - An environment override cannot be parsed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with(content, |key| std::env::var(key).ok())
    }

    /// Like [`parse_toml`](Self::parse_toml) but reads overrides through `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`parse_toml`](Self::parse_toml).
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    ///
    /// Environment overrides and validation apply either way.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), except a missing file is not an error.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    #[allow(clippy::result_large_err)]
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(model_id) = lookup(env::MODEL_ID) {
            self.llm.model_id = model_id;
        }
        if let Some(level) = lookup(env::LOG_LEVEL) {
            self.logging.level = level.trim().to_ascii_lowercase();
        }
        if let Some(limit) = lookup(env::DAILY_LIMIT) {
            self.quota.daily_limit =
                limit
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: "daily_limit",
                        reason: format!("{} is not a whole number: {limit}", env::DAILY_LIMIT),
                    })?;
        }
        if let Some(skip) = lookup(env::SKIP_QUOTA) {
            self.quota.skip = skip.trim().eq_ignore_ascii_case("true");
        }
        if let Some(database) = lookup(env::DATABASE) {
            self.quota.database = database;
        }
        if let Some(bind) = lookup(env::BIND) {
            self.server.bind = bind;
        }
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] or [`ConfigError::MissingField`]
    /// for the first offending value.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        let llm = &self.llm;
        if llm.model_id.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "model_id" }.into());
        }
        if !(0.0..=1.0).contains(&llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }
        if !(256..=4096).contains(&llm.max_tokens) {
            return Err(ConfigError::InvalidValue {
                field: "max_tokens",
                reason: "must be between 256 and 4096".to_string(),
            }
            .into());
        }
        if !(5..=120).contains(&llm.timeout_secs) {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be between 5 and 120".to_string(),
            }
            .into());
        }
        if let Some(api_url) = &llm.api_url {
            Url::parse(api_url).map_err(|e| ConfigError::InvalidValue {
                field: "api_url",
                reason: e.to_string(),
            })?;
        }

        let quota = &self.quota;
        if !(1..=10_000).contains(&quota.daily_limit) {
            return Err(ConfigError::InvalidValue {
                field: "daily_limit",
                reason: "must be between 1 and 10000".to_string(),
            }
            .into());
        }
        if quota.backend == QuotaBackend::Sqlite && quota.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        let input = &self.input;
        if input.min_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_length",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if input.max_length < 100 {
            return Err(ConfigError::InvalidValue {
                field: "max_length",
                reason: "must be at least 100".to_string(),
            }
            .into());
        }
        if input.max_length <= input.min_length {
            return Err(ConfigError::InvalidValue {
                field: "max_length",
                reason: "must be greater than min_length".to_string(),
            }
            .into());
        }

        if !LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "level",
                reason: format!("must be one of {}", LEVELS.join(", ")),
            }
            .into());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: "must be pretty or json".to_string(),
            }
            .into());
        }

        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "bind",
                reason: format!("not a socket address: {}", self.server.bind),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn parse(content: &str) -> Result<Config> {
        Config::parse_toml_with(content, no_env)
    }

    fn invalid_field(result: Result<Config>) -> &'static str {
        match result {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.llm.model_id, "claude-3-haiku-20240307");
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.quota.daily_limit, 50);
        assert_eq!(config.quota.backend, QuotaBackend::Sqlite);
        assert_eq!(config.input.min_length, 10);
        assert_eq!(config.input.max_length, 5000);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert!(!config.quota.skip);
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse(
            r#"
            [llm]
            model_id = "gpt-4o-mini"
            timeout_secs = 10

            [quota]
            daily_limit = 5
            backend = "memory"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.model_id, "gpt-4o-mini");
        assert_eq!(config.llm.timeout_secs, 10);
        assert_eq!(config.quota.daily_limit, 5);
        assert_eq!(config.quota.backend, QuotaBackend::Memory);
    }

    #[test]
    fn env_overrides_win() {
        let config = Config::parse_toml_with("[quota]\ndaily_limit = 5", |key| match key {
            env::DAILY_LIMIT => Some("7".into()),
            env::SKIP_QUOTA => Some("TRUE".into()),
            env::MODEL_ID => Some("openai.gpt-4o".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.quota.daily_limit, 7);
        assert!(config.quota.skip);
        assert_eq!(config.llm.model_id, "openai.gpt-4o");
    }

    #[test]
    fn malformed_env_limit_is_rejected() {
        let result = Config::parse_toml_with("", |key| {
            (key == env::DAILY_LIMIT).then(|| "fifty".to_string())
        });
        assert_eq!(invalid_field(result), "daily_limit");
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(invalid_field(parse("[llm]\ntemperature = 1.5")), "temperature");
        assert_eq!(invalid_field(parse("[llm]\nmax_tokens = 100")), "max_tokens");
        assert_eq!(invalid_field(parse("[llm]\ntimeout_secs = 1")), "timeout_secs");
        assert_eq!(invalid_field(parse("[quota]\ndaily_limit = 0")), "daily_limit");
        assert_eq!(invalid_field(parse("[input]\nmin_length = 0")), "min_length");
        assert_eq!(invalid_field(parse("[input]\nmax_length = 50")), "max_length");
        assert_eq!(
            invalid_field(parse("[input]\nmin_length = 200\nmax_length = 150")),
            "max_length"
        );
        assert_eq!(invalid_field(parse("[logging]\nlevel = \"loud\"")), "level");
        assert_eq!(invalid_field(parse("[logging]\nformat = \"xml\"")), "format");
        assert_eq!(invalid_field(parse("[server]\nbind = \"nowhere\"")), "bind");
        assert_eq!(invalid_field(parse("[llm]\napi_url = \"not a url\"")), "api_url");
    }

    #[test]
    fn empty_model_is_missing() {
        let result = parse("[llm]\nmodel_id = \"  \"");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField { field: "model_id" }))
        ));
    }

    #[test]
    fn unknown_backend_fails_to_parse() {
        let result = parse("[quota]\nbackend = \"redis\"");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default("/nonexistent/reqeval.toml").unwrap();
        assert_eq!(config.llm.temperature, 0.2);
    }
}
