//! Persistence port for daily quota counters.

use std::future::Future;

use crate::domain::{ConditionalIncrement, QuotaRecord};
use crate::error::Result;

/// Durable key-value storage for [`QuotaRecord`]s.
///
/// The store is the only state shared between requests, so implementations
/// must make [`increment_if_current`](Self::increment_if_current) atomic.
pub trait QuotaStore: Send + Sync {
    /// Atomically add one to the counter for `key`, starting from zero when no
    /// record exists, and stamp it with `today`.
    ///
    /// Applies only if the record is absent or its date already equals
    /// `today`; otherwise nothing is written and
    /// [`ConditionalIncrement::StaleDate`] is returned.
    fn increment_if_current(
        &self,
        key: &str,
        today: &str,
    ) -> impl Future<Output = Result<ConditionalIncrement>> + Send;

    /// Replace the record for `record.key` unconditionally.
    fn overwrite(&self, record: &QuotaRecord) -> impl Future<Output = Result<()>> + Send;

    /// Point read by key.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<QuotaRecord>>> + Send;
}
