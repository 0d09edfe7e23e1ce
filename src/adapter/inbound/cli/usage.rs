//! Handler for the `usage` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::UsageArgs;
use crate::adapter::inbound::cli::output;
use crate::application::QuotaTracker;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::persistence::build_quota_store;
use crate::port::outbound::{Clock, SystemClock};

/// Execute the usage command. Only the quota store is opened.
pub async fn execute(config: &Config, args: &UsageArgs) -> Result<()> {
    let store = build_quota_store(&config.quota)?;
    let tracker = QuotaTracker::new(std::sync::Arc::new(store), &config.quota);
    let today = SystemClock.today();
    let snapshot = tracker
        .current_usage(&args.client, &today, config.quota.daily_limit)
        .await;

    if output::is_json() {
        output::json_output(&json!({ "command": "usage", "usage": snapshot }));
        return Ok(());
    }

    output::section("Quota Usage");
    output::field("Client", &snapshot.key);
    output::field("Date", &snapshot.date);
    output::field("Used", snapshot.used);
    output::field("Remaining", output::highlight(snapshot.remaining));
    output::field("Limit", snapshot.limit);
    if let Some(error) = &snapshot.error {
        output::warning(error);
    }
    Ok(())
}
