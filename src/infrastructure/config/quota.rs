//! Quota store configuration.

use serde::Deserialize;

/// Durable store behind the quota tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaBackend {
    /// SQLite file shared by every process pointing at it.
    #[default]
    Sqlite,
    /// Process-local map; counters reset on restart.
    Memory,
}

impl QuotaBackend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

/// Daily request quota settings.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaConfig {
    /// Maximum allowed evaluations per caller per UTC day.
    ///
    /// Defaults to 50.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,

    /// Store backend. Defaults to [`QuotaBackend::Sqlite`].
    #[serde(default)]
    pub backend: QuotaBackend,

    /// Path to the SQLite database file.
    #[serde(default = "default_database")]
    pub database: String,

    /// Disable quota enforcement entirely.
    #[serde(default)]
    pub skip: bool,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
            backend: QuotaBackend::default(),
            database: default_database(),
            skip: false,
        }
    }
}

const fn default_daily_limit() -> u32 {
    50
}

fn default_database() -> String {
    "reqeval.db".into()
}
