//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::application::{Evaluator, Harness, QuotaTracker};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::llm::build_llm_client;
use crate::infrastructure::factory::persistence::{build_quota_store, ConfiguredQuotaStore};
use crate::port::outbound::SystemClock;

/// Evaluator over the store selected in configuration.
pub type AppEvaluator = Evaluator<ConfiguredQuotaStore>;

/// Wire the full evaluation pipeline from configuration.
///
/// # Errors
///
/// Returns an error if the quota store cannot be opened or the API key for
/// the configured model is missing.
pub fn build_evaluator(config: &Config) -> Result<AppEvaluator> {
    let store = Arc::new(build_quota_store(&config.quota)?);
    let llm = build_llm_client(config)?;
    let tracker = QuotaTracker::new(store, &config.quota);

    info!(
        model = %config.llm.model_id,
        daily_limit = config.quota.daily_limit,
        quota_skipped = config.quota.skip,
        "Evaluator ready"
    );
    Ok(Evaluator::new(tracker, llm, Arc::new(SystemClock), config))
}

/// Wire the offline harness. No quota store is opened.
///
/// # Errors
///
/// Returns an error if the API key for the configured model is missing.
pub fn build_harness(config: &Config) -> Result<Harness> {
    let llm = build_llm_client(config)?;
    Ok(Harness::new(llm, &config.llm))
}
