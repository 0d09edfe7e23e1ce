//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::infrastructure::config::settings::Config;

/// Default configuration with the in-memory quota backend.
pub fn config() -> Config {
    let mut config = Config::default();
    config.quota.backend = crate::infrastructure::config::quota::QuotaBackend::Memory;
    config
}

/// Default configuration with a specific daily limit.
pub fn with_limit(daily_limit: u32) -> Config {
    let mut config = config();
    config.quota.daily_limit = daily_limit;
    config
}

/// A payload that satisfies the evaluation schema.
pub fn valid_payload() -> serde_json::Value {
    serde_json::json!({
        "ambiguity_detected": true,
        "ambiguity_details": "\"fast\" has no measurable threshold",
        "testable": false,
        "testability_details": "No acceptance criterion is given",
        "completeness_score": 2,
        "completeness_details": "Missing response-time target and load profile",
        "issues": ["Vague performance term"],
        "suggestions": ["State a p95 latency bound"]
    })
}
