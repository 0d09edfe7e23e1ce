//! Persistence factory for the quota store.

use tracing::info;

use crate::adapter::outbound::memory::MemoryQuotaStore;
use crate::adapter::outbound::sqlite::SqliteQuotaStore;
use crate::domain::{ConditionalIncrement, QuotaRecord};
use crate::error::Result;
use crate::infrastructure::config::quota::{QuotaBackend, QuotaConfig};
use crate::port::outbound::QuotaStore;

/// Quota store chosen at startup from [`QuotaBackend`].
pub enum ConfiguredQuotaStore {
    Sqlite(SqliteQuotaStore),
    Memory(MemoryQuotaStore),
}

impl ConfiguredQuotaStore {
    #[must_use]
    pub const fn backend(&self) -> QuotaBackend {
        match self {
            Self::Sqlite(_) => QuotaBackend::Sqlite,
            Self::Memory(_) => QuotaBackend::Memory,
        }
    }
}

impl QuotaStore for ConfiguredQuotaStore {
    async fn increment_if_current(&self, key: &str, today: &str) -> Result<ConditionalIncrement> {
        match self {
            Self::Sqlite(store) => store.increment_if_current(key, today).await,
            Self::Memory(store) => store.increment_if_current(key, today).await,
        }
    }

    async fn overwrite(&self, record: &QuotaRecord) -> Result<()> {
        match self {
            Self::Sqlite(store) => store.overwrite(record).await,
            Self::Memory(store) => store.overwrite(record).await,
        }
    }

    async fn get(&self, key: &str) -> Result<Option<QuotaRecord>> {
        match self {
            Self::Sqlite(store) => store.get(key).await,
            Self::Memory(store) => store.get(key).await,
        }
    }
}

/// Open the configured quota store, applying migrations for SQLite.
///
/// # Errors
///
/// Returns an error if the SQLite database cannot be opened or migrated.
pub fn build_quota_store(config: &QuotaConfig) -> Result<ConfiguredQuotaStore> {
    let store = match config.backend {
        QuotaBackend::Sqlite => ConfiguredQuotaStore::Sqlite(SqliteQuotaStore::open(&config.database)?),
        QuotaBackend::Memory => ConfiguredQuotaStore::Memory(MemoryQuotaStore::new()),
    };
    info!(backend = store.backend().as_str(), "Quota store initialized");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_behaves_like_store() {
        let config = QuotaConfig {
            backend: QuotaBackend::Memory,
            ..QuotaConfig::default()
        };
        let store = build_quota_store(&config).unwrap();
        assert_eq!(store.backend(), QuotaBackend::Memory);
        assert_eq!(
            store.increment_if_current("k", "2024-05-01").await.unwrap(),
            ConditionalIncrement::Applied(1)
        );
    }

    #[tokio::test]
    async fn sqlite_backend_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.db");
        let config = QuotaConfig {
            database: path.to_string_lossy().into_owned(),
            ..QuotaConfig::default()
        };
        let store = build_quota_store(&config).unwrap();
        assert_eq!(store.backend(), QuotaBackend::Sqlite);
        store.increment_if_current("k", "2024-05-01").await.unwrap();
        assert!(path.exists());
        assert_eq!(store.get("k").await.unwrap().map(|r| r.count), Some(1));
    }
}
