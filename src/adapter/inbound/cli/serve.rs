//! Handler for the `serve` command.

use std::sync::Arc;

use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::http;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_evaluator;
use crate::infrastructure::config::settings::Config;

/// Execute the serve command. Returns once the server shuts down.
pub async fn execute(config: &Config) -> Result<()> {
    let evaluator = Arc::new(build_evaluator(config)?);

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Bind", &config.server.bind);
    output::field("Model", evaluator.llm().model());
    output::field("Daily limit", evaluator.daily_limit());
    output::field("Quota store", config.quota.backend.as_str());
    if config.quota.skip {
        output::warning("Quota enforcement is disabled");
    }
    output::hint("Press Ctrl+C to stop");

    http::serve(&config.server, evaluator).await
}
