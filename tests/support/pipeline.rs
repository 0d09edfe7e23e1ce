use std::sync::Arc;

use reqeval::adapter::outbound::sqlite::SqliteQuotaStore;
use reqeval::application::{Evaluator, QuotaTracker};
use reqeval::infrastructure::config::settings::Config;
use reqeval::port::outbound::{Llm, QuotaStore};
use reqeval::testkit::clock::FixedClock;

pub const DAY: &str = "2024-05-01";

/// Evaluator under test plus handles to its collaborators.
pub struct Pipeline<S> {
    pub evaluator: Evaluator<S>,
    pub store: Arc<S>,
    pub clock: Arc<FixedClock>,
}

pub fn pipeline<S: QuotaStore>(store: Arc<S>, llm: Arc<dyn Llm>, config: &Config) -> Pipeline<S> {
    let clock = Arc::new(FixedClock::new(DAY));
    let tracker = QuotaTracker::new(Arc::clone(&store), &config.quota);
    let evaluator = Evaluator::new(tracker, llm, clock.clone(), config);
    Pipeline {
        evaluator,
        store,
        clock,
    }
}

pub fn sqlite_store(path: &str) -> Arc<SqliteQuotaStore> {
    Arc::new(SqliteQuotaStore::open(path).expect("open sqlite store"))
}

/// JSON request body carrying `text`.
pub fn body(text: &str) -> String {
    serde_json::json!({ "requirementText": text }).to_string()
}
