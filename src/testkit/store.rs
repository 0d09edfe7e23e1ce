//! Quota store doubles.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::adapter::outbound::memory::MemoryQuotaStore;
use crate::domain::{ConditionalIncrement, QuotaRecord};
use crate::error::{Error, Result};
use crate::port::outbound::QuotaStore;

/// In-memory store that counts every call made through the port.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryQuotaStore,
    increments: AtomicUsize,
    overwrites: AtomicUsize,
    reads: AtomicUsize,
}

impl CountingStore {
    /// Total calls of any kind.
    pub fn calls(&self) -> usize {
        self.increments() + self.overwrites() + self.reads()
    }

    /// Calls that may mutate the store.
    pub fn writes(&self) -> usize {
        self.increments() + self.overwrites()
    }

    pub fn increments(&self) -> usize {
        self.increments.load(Ordering::SeqCst)
    }

    pub fn overwrites(&self) -> usize {
        self.overwrites.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Peek at a record without counting the read.
    pub fn record(&self, key: &str) -> Option<QuotaRecord> {
        self.inner.peek(key)
    }

    /// Seed a record without counting the write.
    pub fn seed(&self, record: QuotaRecord) {
        self.inner.insert(record);
    }
}

impl QuotaStore for CountingStore {
    async fn increment_if_current(&self, key: &str, today: &str) -> Result<ConditionalIncrement> {
        self.increments.fetch_add(1, Ordering::SeqCst);
        self.inner.increment_if_current(key, today).await
    }

    async fn overwrite(&self, record: &QuotaRecord) -> Result<()> {
        self.overwrites.fetch_add(1, Ordering::SeqCst);
        self.inner.overwrite(record).await
    }

    async fn get(&self, key: &str) -> Result<Option<QuotaRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }
}

/// Store whose every operation fails with a database error.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl QuotaStore for FailingStore {
    async fn increment_if_current(&self, _key: &str, _today: &str) -> Result<ConditionalIncrement> {
        Err(Error::Database("ProvisionedThroughputExceeded".into()))
    }

    async fn overwrite(&self, _record: &QuotaRecord) -> Result<()> {
        Err(Error::Database("AccessDenied".into()))
    }

    async fn get(&self, _key: &str) -> Result<Option<QuotaRecord>> {
        Err(Error::Connection("store unreachable".into()))
    }
}

/// Store that reports a stale date on every increment and rejects overwrites,
/// exercising the rollover failure path.
#[derive(Debug, Default)]
pub struct StaleRejectingStore {
    pub overwrite_attempts: AtomicUsize,
}

impl QuotaStore for StaleRejectingStore {
    async fn increment_if_current(&self, _key: &str, _today: &str) -> Result<ConditionalIncrement> {
        Ok(ConditionalIncrement::StaleDate)
    }

    async fn overwrite(&self, _record: &QuotaRecord) -> Result<()> {
        self.overwrite_attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::Database("ConditionalWriteConflict".into()))
    }

    async fn get(&self, _key: &str) -> Result<Option<QuotaRecord>> {
        Ok(None)
    }
}
