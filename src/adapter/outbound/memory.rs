//! In-memory quota store.
//!
//! Holds records in a process-local map. Suitable for single-process
//! deployments and tests; counters do not survive a restart.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::{ConditionalIncrement, QuotaRecord};
use crate::error::Result;
use crate::port::outbound::QuotaStore;

/// Quota store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryQuotaStore {
    records: Mutex<HashMap<String, QuotaRecord>>,
}

impl MemoryQuotaStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Synchronous point read.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<QuotaRecord> {
        self.records.lock().get(key).cloned()
    }

    /// Synchronous unconditional write.
    pub fn insert(&self, record: QuotaRecord) {
        self.records.lock().insert(record.key.clone(), record);
    }
}

impl QuotaStore for MemoryQuotaStore {
    async fn increment_if_current(&self, key: &str, today: &str) -> Result<ConditionalIncrement> {
        let mut records = self.records.lock();
        let record = records
            .entry(key.to_string())
            .or_insert_with(|| QuotaRecord::new(key, today, 0));

        if record.date != today {
            return Ok(ConditionalIncrement::StaleDate);
        }
        record.count = record.count.saturating_add(1);
        Ok(ConditionalIncrement::Applied(record.count))
    }

    async fn overwrite(&self, record: &QuotaRecord) -> Result<()> {
        self.insert(record.clone());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<QuotaRecord>> {
        Ok(self.peek(key))
    }
}
