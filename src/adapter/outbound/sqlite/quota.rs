//! SQLite quota store implementation.
//!
//! The conditional increment is a single upsert, so concurrent processes
//! sharing the database file never lose an increment within one day.

use diesel::prelude::*;
use diesel::sql_types::Text;

use super::database::connection::{create_pool, run_migrations, DbPool};
use super::database::model::{CountRow, QuotaUsageRow};
use super::database::schema::quota_usage;
use crate::domain::{ConditionalIncrement, QuotaRecord};
use crate::error::{Error, Result};
use crate::port::outbound::QuotaStore;

/// Create-or-increment guarded by the stored date.
///
/// A missing row is inserted with `count = 1`. An existing row is incremented
/// only when its date equals the requested day; otherwise the update is
/// skipped and `RETURNING` yields no row.
const INCREMENT_IF_CURRENT: &str = "\
INSERT INTO quota_usage (key, date, count) VALUES (?, ?, 1) \
ON CONFLICT(key) DO UPDATE SET count = quota_usage.count + 1 \
WHERE quota_usage.date = excluded.date \
RETURNING count";

/// SQLite-backed quota store.
pub struct SqliteQuotaStore {
    pool: DbPool,
}

impl SqliteQuotaStore {
    /// Create a store over an existing, migrated pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `path` and apply migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or migrations fail.
    pub fn open(path: &str) -> Result<Self> {
        let pool = create_pool(path)?;
        run_migrations(&pool)?;
        Ok(Self::new(pool))
    }

    fn connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }
}

impl QuotaStore for SqliteQuotaStore {
    async fn increment_if_current(&self, key: &str, today: &str) -> Result<ConditionalIncrement> {
        let mut conn = self.connection()?;

        let rows: Vec<CountRow> = diesel::sql_query(INCREMENT_IF_CURRENT)
            .bind::<Text, _>(key)
            .bind::<Text, _>(today)
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(match rows.first() {
            Some(row) => ConditionalIncrement::Applied(u32::try_from(row.count).unwrap_or(0)),
            None => ConditionalIncrement::StaleDate,
        })
    }

    async fn overwrite(&self, record: &QuotaRecord) -> Result<()> {
        let mut conn = self.connection()?;

        diesel::replace_into(quota_usage::table)
            .values(QuotaUsageRow::from(record))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<QuotaRecord>> {
        let mut conn = self.connection()?;

        let row: Option<QuotaUsageRow> = quota_usage::table
            .find(key)
            .select(QuotaUsageRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.map(QuotaRecord::from))
    }
}
